use crate::gui::{FavApp, RowRef};
use eframe::egui;

#[derive(Default)]
pub struct DescriptionDialog {
    pub open: bool,
    row: RowRef,
    text: String,
}

impl DescriptionDialog {
    pub fn open_for(&mut self, row: RowRef, current: &str) {
        self.open = true;
        self.row = row;
        self.text = current.to_string();
    }

    pub fn ui(&mut self, ctx: &egui::Context, app: &mut FavApp) {
        if !self.open {
            return;
        }
        let mut close = false;
        egui::Window::new("Edit Description")
            .open(&mut self.open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.text_edit_singleline(&mut self.text);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        if let Err(e) = app.describe_favorite(&self.row, &self.text) {
                            app.report_error("Failed to save description", &e);
                        }
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });
        if close {
            self.open = false;
        }
    }
}
