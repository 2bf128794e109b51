use crate::favorites::FavoriteEntry;

/// Display state of a favorite, derived when the list is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavStatus {
    Found,
    Missing,
    /// The file exists but its directory could not be watched, so moves
    /// will not be picked up.
    Unwatched(String),
}

impl FavStatus {
    pub fn of(entry: &FavoriteEntry, watch_error: Option<&str>) -> Self {
        if !entry.exists() {
            return FavStatus::Missing;
        }
        match watch_error {
            Some(err) => FavStatus::Unwatched(err.to_string()),
            None => FavStatus::Found,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FavStatus::Found => "✓",
            FavStatus::Missing => "✗",
            FavStatus::Unwatched(_) => "?",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FavStatus::Found => "Exists: Yes".into(),
            FavStatus::Missing => "Exists: No".into(),
            FavStatus::Unwatched(err) => format!("Exists: Yes (not tracking moves: {err})"),
        }
    }
}
