use crate::common::paths::{normalize_path, same_location};
use crate::error::FavError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const FAVORITES_FILE: &str = "favorites.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_on: Option<String>,
}

impl FavoriteEntry {
    pub fn new(path: impl Into<PathBuf>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            added_on: Some(chrono::Local::now().to_rfc3339()),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Result of applying one move event to the store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Indices whose path was rebound to the destination.
    pub moved: Vec<usize>,
    /// Indices of records that already pointed at the destination before the
    /// move was applied.
    pub collisions: Vec<usize>,
}

impl MoveOutcome {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }
}

pub fn load_favorites(file: &Path) -> Result<Vec<FavoriteEntry>, FavError> {
    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(FavError::io(file, e)),
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|source| FavError::CorruptState {
        file: file.to_path_buf(),
        source,
    })
}

/// Write `favs` to `file` through a sibling temp file and a rename so a
/// crash never leaves a half written list behind.
pub fn save_favorites(file: &Path, favs: &[FavoriteEntry]) -> Result<(), FavError> {
    let json = serde_json::to_string_pretty(favs)
        .map_err(|e| FavError::io(file, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FavError::io(parent, e))?;
    }
    let tmp = temp_sibling(file);
    std::fs::write(&tmp, json).map_err(|e| FavError::io(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, file) {
        let _ = std::fs::remove_file(&tmp);
        return Err(FavError::io(file, e));
    }
    Ok(())
}

fn temp_sibling(file: &Path) -> PathBuf {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FAVORITES_FILE.to_string());
    file.with_file_name(format!(".{name}.tmp"))
}

fn corrupt_backup(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

/// The owned list of favorites and the file it is persisted to.
///
/// Every mutating call rewrites the backing file. When a user edit (add,
/// remove, relocate, description) cannot be written it is rolled back and
/// the error returned. A tracked move is kept in memory even if its save
/// fails, because the file really is at the new path.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    file: PathBuf,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    /// Empty store backed by `file`. Nothing is read or written.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            entries: Vec::new(),
        }
    }

    pub fn load(file: impl Into<PathBuf>) -> Result<Self, FavError> {
        let file = file.into();
        let entries = load_favorites(&file)?;
        tracing::debug!(file = %file.display(), count = entries.len(), "favorites loaded");
        Ok(Self { file, entries })
    }

    /// Load `file`, falling back to an empty store if it cannot be read.
    ///
    /// A corrupt file is copied to `<file>.corrupt` first so the empty list
    /// written by the next mutation does not destroy it.
    pub fn open_or_empty(file: impl Into<PathBuf>) -> (Self, Option<FavError>) {
        let file = file.into();
        match Self::load(file.clone()) {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::warn!("using empty favorites list: {e}");
                if e.is_corrupt_state() {
                    let backup = corrupt_backup(&file);
                    match std::fs::copy(&file, &backup) {
                        Ok(_) => tracing::info!("kept corrupt favorites at {}", backup.display()),
                        Err(err) => tracing::error!("failed to back up {}: {err}", file.display()),
                    }
                }
                (Self::new(file), Some(e))
            }
        }
    }

    /// Re-read the backing file. On failure the current entries are kept.
    pub fn reload(&mut self) -> Result<(), FavError> {
        self.entries = load_favorites(&self.file)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), FavError> {
        save_favorites(&self.file, &self.entries)
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&FavoriteEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    /// Current index of the record that was at `hint` with `path` when it was
    /// picked. Rows shift when earlier records are removed or the list is
    /// reloaded, so the path decides.
    pub fn position_of(&self, hint: usize, path: &Path) -> Option<usize> {
        if self.entries.get(hint).is_some_and(|e| e.path == path) {
            return Some(hint);
        }
        self.entries.iter().position(|e| e.path == path)
    }

    /// Append a favorite and return its index.
    pub fn add(&mut self, path: &str, description: &str) -> Result<usize, FavError> {
        let path = normalize_path(path)
            .ok_or_else(|| FavError::Validation("Please enter a file path.".into()))?;
        if self.contains(&path) {
            return Err(FavError::Validation(format!(
                "'{}' is already in your favorites.",
                path.display()
            )));
        }
        tracing::info!(path = %path.display(), "adding favorite");
        let previous = self.entries.clone();
        self.entries
            .push(FavoriteEntry::new(path, description.trim().to_string()));
        self.save_or_restore(previous)?;
        Ok(self.entries.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Result<FavoriteEntry, FavError> {
        self.check_index(index)?;
        let previous = self.entries.clone();
        let removed = self.entries.remove(index);
        tracing::info!(path = %removed.path.display(), "removed favorite");
        self.save_or_restore(previous)?;
        Ok(removed)
    }

    /// Rebind the record at `index` to a path picked by the user.
    pub fn relocate(&mut self, index: usize, new_path: &str) -> Result<(), FavError> {
        self.check_index(index)?;
        let path = normalize_path(new_path)
            .ok_or_else(|| FavError::Validation("Please choose the file's new location.".into()))?;
        let previous = self.entries.clone();
        let entry = &mut self.entries[index];
        tracing::info!(
            from = %entry.path.display(),
            to = %path.display(),
            "favorite relocated manually"
        );
        entry.path = path;
        self.save_or_restore(previous)
    }

    pub fn set_description(&mut self, index: usize, description: &str) -> Result<(), FavError> {
        self.check_index(index)?;
        let previous = self.entries.clone();
        self.entries[index].description = description.trim().to_string();
        self.save_or_restore(previous)
    }

    /// Rebind every record at `from` to `to`.
    ///
    /// The file is only rewritten when at least one record changed.
    pub fn apply_move(&mut self, from: &Path, to: &Path) -> Result<MoveOutcome, FavError> {
        let mut outcome = MoveOutcome::default();
        for (idx, entry) in self.entries.iter().enumerate() {
            if same_location(&entry.path, from) {
                outcome.moved.push(idx);
            } else if same_location(&entry.path, to) {
                outcome.collisions.push(idx);
            }
        }
        if outcome.moved.is_empty() {
            return Ok(MoveOutcome::default());
        }
        for &idx in &outcome.moved {
            self.entries[idx].path = to.to_path_buf();
        }
        if !outcome.collisions.is_empty() {
            tracing::warn!(
                to = %to.display(),
                "moved favorite now shares its path with {} other record(s)",
                outcome.collisions.len()
            );
        }
        tracing::info!(from = %from.display(), to = %to.display(), "favorite moved");
        self.save()?;
        Ok(outcome)
    }

    fn save_or_restore(&mut self, previous: Vec<FavoriteEntry>) -> Result<(), FavError> {
        if let Err(e) = self.save() {
            tracing::warn!("rolling back unsaved change: {e}");
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), FavError> {
        if index >= self.entries.len() {
            return Err(FavError::Index {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}
