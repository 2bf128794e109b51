pub use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Ask the user for a file, starting next to `near` when it has an existing
/// parent directory. `None` when the picker is cancelled.
pub fn pick_file(title: &str, near: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title(title);
    if let Some(dir) = near.and_then(Path::parent).filter(|d| d.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}
