pub mod common;
pub mod error;
pub mod favorites;
pub mod gui;
pub mod launcher;
pub mod logging;
pub mod settings;
pub mod status;
pub mod watcher;

pub use error::FavError;
pub use favorites::{FavoriteEntry, FavoritesStore, MoveOutcome};
pub use watcher::{MoveDetector, MoveWatcher, WatchEvent};
