use crate::error::FavError;
use std::path::Path;

/// Open `path` with the system's default handler.
pub fn open_path(path: &Path) -> Result<(), FavError> {
    if !path.exists() {
        return Err(FavError::Missing(path.to_path_buf()));
    }
    tracing::debug!("opening {}", path.display());
    open::that(path).map_err(FavError::Open)
}

/// Open the directory that contains `path` in the file manager.
pub fn open_containing_folder(path: &Path) -> Result<(), FavError> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .ok_or_else(|| FavError::Missing(path.to_path_buf()))?;
    open_path(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_opened() {
        let err = open_path(Path::new("/no/such/favorite.txt")).unwrap_err();
        assert!(matches!(err, FavError::Missing(_)));
    }

    #[test]
    fn containing_folder_of_missing_dir_fails() {
        let err = open_containing_folder(Path::new("/no/such/dir/file.txt")).unwrap_err();
        assert!(matches!(err, FavError::Missing(_)));
    }
}
