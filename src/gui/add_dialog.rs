use crate::common::file_dialog::pick_file;
use crate::common::paths::normalize_path;
use crate::error::FavError;
use crate::gui::FavApp;
use eframe::egui;

#[derive(Default)]
pub struct AddFavoriteDialog {
    pub open: bool,
    path: String,
    description: String,
    /// Set once the user was told the path does not exist.
    confirm_missing: bool,
    error: Option<String>,
}

impl AddFavoriteDialog {
    pub fn open(&mut self) {
        self.open = true;
        self.path.clear();
        self.description.clear();
        self.confirm_missing = false;
        self.error = None;
    }

    fn try_add(&mut self, app: &mut FavApp) -> bool {
        match app.add_favorite(&self.path, &self.description) {
            Ok(_) => true,
            Err(FavError::Validation(msg)) => {
                self.error = Some(msg);
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
        egui::Window::new("Add Favorite")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("File Path:");
                    if ui.text_edit_singleline(&mut self.path).changed() {
                        self.confirm_missing = false;
                        self.error = None;
                    }
                    if ui.button("Browse...").clicked() {
                        if let Some(p) = pick_file("Select File", None) {
                            self.path = p.display().to_string();
                            self.confirm_missing = false;
                            self.error = None;
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Description:");
                    ui.text_edit_singleline(&mut self.description);
                });
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                if self.confirm_missing {
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("'{}' does not exist. Add anyway?", self.path.trim()),
                    );
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() && self.try_add(app) {
                            close = true;
                        }
                        if ui.button("No").clicked() {
                            self.confirm_missing = false;
                        }
                    });
                    return;
                }
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        match normalize_path(&self.path) {
                            None => self.error = Some("Please enter a file path.".into()),
                            Some(p) if !p.exists() => self.confirm_missing = true,
                            Some(_) => close = self.try_add(app),
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
