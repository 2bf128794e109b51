use crate::common::file_dialog::pick_file;
use crate::common::paths::normalize_path;
use crate::error::FavError;
use crate::gui::{FavApp, RowRef};
use eframe::egui;

/// Rebinds a favorite whose file moved while it was not being watched.
#[derive(Default)]
pub struct LocateDialog {
    pub open: bool,
    row: RowRef,
    path: String,
    confirm_missing: bool,
    error: Option<String>,
}

impl LocateDialog {
    pub fn open_for(&mut self, row: RowRef) {
        self.open = true;
        self.path = row.path.display().to_string();
        self.row = row;
        self.confirm_missing = false;
        self.error = None;
    }

    /// Show the native picker starting next to the old location.
    pub fn browse(&mut self) {
        if let Some(p) = pick_file("Locate File", Some(self.row.path.as_path())) {
            self.path = p.display().to_string();
            self.confirm_missing = false;
            self.error = None;
        }
    }

    fn apply(&mut self, app: &mut FavApp) -> bool {
        match app.relocate_favorite(&self.row, &self.path) {
            Ok(()) => true,
            Err(e @ (FavError::Validation(_) | FavError::Index { .. } | FavError::Stale(_))) => {
                self.error = Some(e.to_string());
                false
            }
            Err(e) => {
                app.report_error("Failed to save favorites", &e);
                false
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context, app: &mut FavApp) {
        if !self.open {
            return;
        }
        let mut close = false;
        let mut open = self.open;
        egui::Window::new("Locate Favorite")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Was: {}", self.row.path.display()));
                ui.horizontal(|ui| {
                    ui.label("New location:");
                    if ui.text_edit_singleline(&mut self.path).changed() {
                        self.confirm_missing = false;
                        self.error = None;
                    }
                    if ui.button("Browse...").clicked() {
                        self.browse();
                    }
                });
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                if self.confirm_missing {
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("'{}' does not exist. Use it anyway?", self.path.trim()),
                    );
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() && self.apply(app) {
                            close = true;
                        }
                        if ui.button("No").clicked() {
                            self.confirm_missing = false;
                        }
                    });
                    return;
                }
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        match normalize_path(&self.path) {
                            None => {
                                self.error = Some("Please choose the file's new location.".into())
                            }
                            Some(p) if !p.exists() => self.confirm_missing = true,
                            Some(_) => close = self.apply(app),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });
        self.open = open && !close;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::tests::new_app;
    use tempfile::tempdir;

    #[test]
    fn locate_follows_its_row_after_an_earlier_remove() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        for name in ["a.txt", "b.txt", "c.txt"] {
            app.add_favorite(dir.path().join(name).to_str().unwrap(), name)
                .unwrap();
        }
        let c = dir.path().join("c.txt");
        let moved = dir.path().join("b-moved.txt");
        std::fs::write(&moved, "b").unwrap();

        let mut dlg = LocateDialog::default();
        dlg.open_for(app.row_ref(1).unwrap());
        app.remove_favorite(0).unwrap();
        dlg.path = moved.display().to_string();

        assert!(dlg.apply(&mut app));
        let entries = app.store().entries();
        assert_eq!(entries[0].path, moved);
        assert_eq!(entries[0].description, "b.txt");
        assert_eq!(entries[1].path, c);
    }

    #[test]
    fn locate_on_a_removed_row_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        for name in ["a.txt", "b.txt"] {
            app.add_favorite(dir.path().join(name).to_str().unwrap(), "")
                .unwrap();
        }
        let mut dlg = LocateDialog::default();
        dlg.open_for(app.row_ref(1).unwrap());
        app.remove_favorite(1).unwrap();
        let before = app.store().entries().to_vec();
        dlg.path = dir.path().join("elsewhere.txt").display().to_string();

        assert!(!dlg.apply(&mut app));
        assert!(dlg.error.as_deref().is_some_and(|e| e.contains("b.txt")));
        assert_eq!(app.store().entries(), before.as_slice());
    }
}
