use std::path::PathBuf;

/// Errors produced by the favorites store, the move watcher and the
/// launcher helpers. None of these are fatal to the application.
#[derive(Debug, thiserror::Error)]
pub enum FavError {
    /// Bad user input such as an empty path.
    #[error("{0}")]
    Validation(String),
    #[error("no favorite at index {index} (list has {len})")]
    Index { index: usize, len: usize },
    /// The backing file exists but does not contain a favorites list.
    #[error("could not decode {}: {source}", file.display())]
    CorruptState {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
    /// A dialog's target was removed or changed while the dialog was open.
    #[error("'{}' is no longer in your favorites", .0.display())]
    Stale(PathBuf),
    #[error("file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to open file: {0}")]
    Open(#[source] std::io::Error),
}

impl FavError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::CorruptState { .. })
    }
}
