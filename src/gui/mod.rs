mod add_dialog;
mod confirmation_modal;
mod description_dialog;
mod locate_dialog;

pub use add_dialog::AddFavoriteDialog;
pub use confirmation_modal::{ConfirmationModal, ConfirmationResult};
pub use description_dialog::DescriptionDialog;
pub use locate_dialog::LocateDialog;

use crate::error::FavError;
use crate::favorites::{FavoritesStore, MoveOutcome};
use crate::launcher::{open_containing_folder, open_path};
use crate::settings::Settings;
use crate::status::FavStatus;
use crate::watcher::{apply_watch_event, MoveWatcher, WatchEvent};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// How often the list is redrawn while idle so existence checks stay fresh.
const IDLE_REFRESH: Duration = Duration::from_millis(500);

/// A list row as it was when a dialog or confirmation opened. The path is
/// checked again before the row is changed, since the list can shift under
/// an open dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRef {
    pub index: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Open(usize),
    OpenFolder(usize),
    Locate(usize),
    Describe(usize),
    Remove(usize),
}

pub struct FavApp {
    store: FavoritesStore,
    watcher: Option<MoveWatcher>,
    rx: Option<Receiver<WatchEvent>>,
    watch_failure: Option<String>,
    toasts: Toasts,
    pub enable_toasts: bool,
    pub toast_duration: f32,
    confirm_remove: bool,
    selected: Option<usize>,
    pending_remove: Option<RowRef>,
    add_dialog: AddFavoriteDialog,
    locate_dialog: LocateDialog,
    description_dialog: DescriptionDialog,
    confirm_modal: ConfirmationModal,
    settings_path: String,
    window_size: Option<(i32, i32)>,
}

impl FavApp {
    pub fn new(ctx: &egui::Context, settings: Settings, settings_path: String) -> Self {
        let file = settings.favorites_path(Path::new(&settings_path));
        let (store, load_err) = FavoritesStore::open_or_empty(file);
        let repaint = ctx.clone();
        let (watcher, rx, watch_failure) =
            match MoveWatcher::with_waker(move || repaint.request_repaint()) {
                Ok((w, rx)) => (Some(w), Some(rx), None),
                Err(e) => {
                    tracing::error!("live tracking unavailable: {e}");
                    (None, None, Some(e.to_string()))
                }
            };
        let mut app = Self {
            store,
            watcher,
            rx,
            watch_failure,
            toasts: Toasts::new()
                .anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0])
                .direction(egui::Direction::TopDown),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
            confirm_remove: settings.confirm_remove,
            selected: None,
            pending_remove: None,
            add_dialog: AddFavoriteDialog::default(),
            locate_dialog: LocateDialog::default(),
            description_dialog: DescriptionDialog::default(),
            confirm_modal: ConfirmationModal::default(),
            settings_path,
            window_size: settings.window_size,
        };
        if let Some(e) = load_err {
            app.notify(ToastKind::Warning, format!("{e}. Using empty favorites list."));
        }
        if let Some(e) = app.watch_failure.clone() {
            app.notify(ToastKind::Warning, format!("Moves will not be tracked: {e}"));
        }
        app.sync_watcher();
        app
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    pub fn add_toast(&mut self, toast: Toast) {
        if self.enable_toasts {
            self.toasts.add(toast);
        }
    }

    fn notify(&mut self, kind: ToastKind, text: String) {
        match kind {
            ToastKind::Error => tracing::error!("{text}"),
            ToastKind::Warning => tracing::warn!("{text}"),
            _ => tracing::info!("{text}"),
        }
        self.add_toast(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
        });
    }

    pub fn report_error(&mut self, context: &str, err: &FavError) {
        self.notify(ToastKind::Error, format!("{context}: {err}"));
    }

    /// Point the watcher at the directories of the current favorites.
    pub fn sync_watcher(&mut self) {
        if let Some(w) = self.watcher.as_mut() {
            w.sync(self.store.entries().iter().map(|e| e.path.as_path()));
        }
    }

    pub fn status_of(&self, index: usize) -> Option<FavStatus> {
        let entry = self.store.get(index)?;
        let err = self
            .watcher
            .as_ref()
            .and_then(|w| w.watch_error(&entry.path))
            .or(self.watch_failure.as_deref());
        Some(FavStatus::of(entry, err))
    }

    pub fn row_ref(&self, index: usize) -> Option<RowRef> {
        self.store.get(index).map(|e| RowRef {
            index,
            path: e.path.clone(),
        })
    }

    /// Current index of `row`, or `Stale` when its record is gone.
    fn resolve(&self, row: &RowRef) -> Result<usize, FavError> {
        self.store
            .position_of(row.index, &row.path)
            .ok_or_else(|| FavError::Stale(row.path.clone()))
    }

    pub fn add_favorite(&mut self, path: &str, description: &str) -> Result<usize, FavError> {
        let idx = self.store.add(path, description)?;
        self.sync_watcher();
        let shown = self.store.entries()[idx].path.display().to_string();
        self.notify(ToastKind::Success, format!("Added '{shown}' to favorites."));
        Ok(idx)
    }

    pub fn remove_favorite(&mut self, index: usize) -> Result<(), FavError> {
        let removed = self.store.remove(index)?;
        match self.selected {
            Some(sel) if sel == index => self.selected = None,
            Some(sel) if sel > index => self.selected = Some(sel - 1),
            _ => {}
        }
        self.sync_watcher();
        self.notify(
            ToastKind::Info,
            format!("Removed '{}' from favorites.", removed.path.display()),
        );
        Ok(())
    }

    pub fn remove_row(&mut self, row: &RowRef) -> Result<(), FavError> {
        let index = self.resolve(row)?;
        self.remove_favorite(index)
    }

    pub fn relocate_favorite(&mut self, row: &RowRef, new_path: &str) -> Result<(), FavError> {
        let index = self.resolve(row)?;
        self.store.relocate(index, new_path)?;
        self.sync_watcher();
        if let Some(entry) = self.store.get(index) {
            let shown = entry.path.display().to_string();
            self.notify(ToastKind::Success, format!("Favorite now points at '{shown}'."));
        }
        Ok(())
    }

    pub fn describe_favorite(&mut self, row: &RowRef, description: &str) -> Result<(), FavError> {
        let index = self.resolve(row)?;
        self.store.set_description(index, description)
    }

    pub fn refresh(&mut self) {
        if let Err(e) = self.store.reload() {
            self.report_error("Refresh failed", &e);
        }
        if self.selected.is_some_and(|s| s >= self.store.len()) {
            self.selected = None;
        }
        self.sync_watcher();
    }

    /// Apply one watcher event. Returns the store outcome so callers can tell
    /// whether anything changed.
    pub fn handle_watch_event(&mut self, event: WatchEvent) -> MoveOutcome {
        if let WatchEvent::Error(msg) = &event {
            tracing::warn!("watcher reported: {msg}");
        }
        match apply_watch_event(&mut self.store, &event) {
            Ok(outcome) => {
                if let WatchEvent::Moved { to, .. } = &event {
                    if !outcome.is_empty() {
                        self.announce_move(to, &outcome);
                    }
                }
                outcome
            }
            Err(e) => {
                self.report_error("Failed to save moved favorite", &e);
                MoveOutcome::default()
            }
        }
    }

    fn announce_move(&mut self, to: &Path, outcome: &MoveOutcome) {
        self.notify(ToastKind::Info, format!("Tracked move to '{}'.", to.display()));
        if !outcome.collisions.is_empty() {
            self.notify(
                ToastKind::Warning,
                format!(
                    "'{}' is now listed more than once; remove the stale entry if needed.",
                    to.display()
                ),
            );
        }
    }

    /// Drain queued watcher events on the UI thread.
    fn drain_watch_events(&mut self) {
        let Some(rx) = self.rx.as_ref() else {
            return;
        };
        let events: Vec<WatchEvent> = rx.try_iter().collect();
        if events.is_empty() {
            return;
        }
        let mut moved = false;
        for ev in events {
            moved |= !self.handle_watch_event(ev).is_empty();
        }
        // A changed favorite path or a deleted directory both need new watches.
        self.sync_watcher();
        if moved {
            tracing::debug!("favorites updated from watcher");
        }
    }

    fn open_entry(&mut self, index: usize, folder: bool) {
        let Some(path) = self.store.get(index).map(|e| e.path.clone()) else {
            return;
        };
        let res = if folder {
            open_containing_folder(&path)
        } else {
            open_path(&path)
        };
        if let Err(e) = res {
            self.report_error("Error opening file", &e);
        }
    }

    fn request_remove(&mut self, index: usize) {
        if !self.confirm_remove {
            if let Err(e) = self.remove_favorite(index) {
                self.report_error("Remove failed", &e);
            }
            return;
        }
        if let Some(row) = self.row_ref(index) {
            self.confirm_modal.open_for_remove(&row.path);
            self.pending_remove = Some(row);
        }
    }

    fn run_row_action(&mut self, action: RowAction) {
        match action {
            RowAction::Open(i) => self.open_entry(i, false),
            RowAction::OpenFolder(i) => self.open_entry(i, true),
            RowAction::Locate(i) => {
                if let Some(row) = self.row_ref(i) {
                    self.locate_dialog.open_for(row);
                    self.locate_dialog.browse();
                }
            }
            RowAction::Describe(i) => {
                if let (Some(row), Some(entry)) = (self.row_ref(i), self.store.get(i)) {
                    let current = entry.description.clone();
                    self.description_dialog.open_for(row, &current);
                }
            }
            RowAction::Remove(i) => self.request_remove(i),
        }
    }

    fn list_ui(&mut self, ui: &mut egui::Ui) -> Option<RowAction> {
        let mut action = None;
        let statuses: Vec<FavStatus> = (0..self.store.len())
            .filter_map(|i| self.status_of(i))
            .collect();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.store.is_empty() {
                    ui.weak("No favorites yet. Use \"Add Favorite\" to track a file.");
                }
                for (idx, (entry, status)) in
                    self.store.entries().iter().zip(statuses.iter()).enumerate()
                {
                    let desc = if entry.description.is_empty() {
                        "No description"
                    } else {
                        entry.description.as_str()
                    };
                    let color = match status {
                        FavStatus::Found => egui::Color32::from_rgb(80, 200, 120),
                        FavStatus::Missing => egui::Color32::from_rgb(220, 80, 80),
                        FavStatus::Unwatched(_) => egui::Color32::YELLOW,
                    };
                    let text = egui::RichText::new(format!(
                        "[{}] {} - {}",
                        status.symbol(),
                        entry.path.display(),
                        desc
                    ))
                    .color(color);
                    let resp = ui
                        .selectable_label(self.selected == Some(idx), text)
                        .on_hover_text(format!(
                            "Path: {}\nDescription: {}\n{}",
                            entry.path.display(),
                            desc,
                            status.describe()
                        ));
                    if resp.clicked() {
                        self.selected = Some(idx);
                    }
                    if resp.double_clicked() {
                        action = Some(RowAction::Open(idx));
                    }
                    resp.context_menu(|ui| {
                        if ui.button("Open").clicked() {
                            action = Some(RowAction::Open(idx));
                            ui.close_menu();
                        }
                        if ui.button("Open containing folder").clicked() {
                            action = Some(RowAction::OpenFolder(idx));
                            ui.close_menu();
                        }
                        if ui.button("Locate...").clicked() {
                            action = Some(RowAction::Locate(idx));
                            ui.close_menu();
                        }
                        if ui.button("Edit description").clicked() {
                            action = Some(RowAction::Describe(idx));
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui.button("Remove").clicked() {
                            action = Some(RowAction::Remove(idx));
                            ui.close_menu();
                        }
                    });
                }
            });
        action
    }

    fn status_line(&self) -> String {
        let watched = self
            .watcher
            .as_ref()
            .map(|w| w.watched_dirs().count())
            .unwrap_or(0);
        match &self.watch_failure {
            Some(e) => format!("{} favorites - live tracking unavailable: {e}", self.store.len()),
            None => format!(
                "{} favorites - watching {watched} folder(s)",
                self.store.len()
            ),
        }
    }

    fn settings_file(&self) -> PathBuf {
        PathBuf::from(&self.settings_path)
    }
}

impl eframe::App for FavApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_watch_events();

        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.window_size = Some((rect.width() as i32, rect.height() as i32));
        }

        let mut row_action = None;
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(self.status_line());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(self.store.file().display().to_string());
                });
            });
        });
        egui::TopBottomPanel::bottom("buttons").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Add Favorite").clicked() {
                    self.add_dialog.open();
                }
                if ui.button("Remove Selected").clicked() {
                    match self.selected {
                        Some(idx) => row_action = Some(RowAction::Remove(idx)),
                        None => self.notify(
                            ToastKind::Info,
                            "Please select a favorite to remove.".into(),
                        ),
                    }
                }
                if ui.button("Locate Selected").clicked() {
                    match self.selected {
                        Some(idx) => row_action = Some(RowAction::Locate(idx)),
                        None => self.notify(
                            ToastKind::Info,
                            "Please select a favorite to locate.".into(),
                        ),
                    }
                }
                if ui.button("Refresh List").clicked() {
                    self.refresh();
                }
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Your Favorite Files:");
            ui.separator();
            if let Some(a) = self.list_ui(ui) {
                row_action = Some(a);
            }
        });
        if let Some(a) = row_action {
            self.run_row_action(a);
        }

        let mut dlg = std::mem::take(&mut self.add_dialog);
        dlg.ui(ctx, self);
        self.add_dialog = dlg;
        let mut dlg = std::mem::take(&mut self.locate_dialog);
        dlg.ui(ctx, self);
        self.locate_dialog = dlg;
        let mut dlg = std::mem::take(&mut self.description_dialog);
        dlg.ui(ctx, self);
        self.description_dialog = dlg;

        match self.confirm_modal.ui(ctx) {
            ConfirmationResult::Confirmed => {
                if let Some(row) = self.pending_remove.take() {
                    if let Err(e) = self.remove_row(&row) {
                        self.report_error("Remove failed", &e);
                    }
                }
            }
            ConfirmationResult::Cancelled => self.pending_remove = None,
            ConfirmationResult::None => {}
        }

        if self.enable_toasts {
            self.toasts.show(ctx);
        }
        ctx.request_repaint_after(IDLE_REFRESH);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let path = self.settings_file();
        let path = path.to_string_lossy();
        if let Ok(mut settings) = Settings::load(&path) {
            settings.window_size = self.window_size;
            if let Err(e) = settings.save(&path) {
                tracing::error!("failed to save settings: {e}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::tempdir;

    fn app_with(dir: &Path, favorites_file: Option<String>) -> FavApp {
        let settings_path = dir.join("settings.json");
        let settings = Settings {
            favorites_file,
            enable_toasts: false,
            confirm_remove: false,
            ..Settings::default()
        };
        FavApp::new(
            &egui::Context::default(),
            settings,
            settings_path.to_string_lossy().into_owned(),
        )
    }

    pub(crate) fn new_app(dir: &Path) -> FavApp {
        app_with(dir, None)
    }

    #[test]
    fn favorites_file_lives_next_to_settings() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        let target = dir.path().join("a.txt");
        std::fs::write(&target, "x").unwrap();
        app.add_favorite(target.to_str().unwrap(), "first").unwrap();
        assert!(dir.path().join("favorites.json").exists());
        assert_eq!(app.status_of(0), Some(FavStatus::Found));
    }

    #[test]
    fn move_event_rebinds_and_refreshes_status() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "x").unwrap();
        app.add_favorite(a.to_str().unwrap(), "").unwrap();
        std::fs::rename(&a, &b).unwrap();
        assert_eq!(app.status_of(0), Some(FavStatus::Missing));

        let outcome = app.handle_watch_event(WatchEvent::Moved {
            from: a.clone(),
            to: b.clone(),
        });
        assert_eq!(outcome.moved, vec![0]);
        assert_eq!(app.store().get(0).unwrap().path, b);
        assert_eq!(app.status_of(0), Some(FavStatus::Found));
    }

    #[test]
    fn removing_selected_clears_selection() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        app.add_favorite(dir.path().join("a").to_str().unwrap(), "")
            .unwrap();
        app.add_favorite(dir.path().join("b").to_str().unwrap(), "")
            .unwrap();
        app.selected = Some(1);
        app.remove_favorite(0).unwrap();
        assert_eq!(app.selected, Some(0));
        app.remove_favorite(0).unwrap();
        assert_eq!(app.selected, None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("favorites.json"), "[{oops").unwrap();
        let app = new_app(dir.path());
        assert!(app.store().is_empty());
    }

    #[test]
    fn confirmed_remove_targets_the_row_that_was_asked_about() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        for name in ["a", "b", "c"] {
            app.add_favorite(dir.path().join(name).to_str().unwrap(), "")
                .unwrap();
        }
        let pending = app.row_ref(2).unwrap();
        app.remove_favorite(0).unwrap();
        app.remove_row(&pending).unwrap();
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().get(0).unwrap().path, dir.path().join("b"));

        assert!(matches!(app.remove_row(&pending), Err(FavError::Stale(_))));
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn description_of_a_removed_row_is_not_written_elsewhere() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        for name in ["a", "b"] {
            app.add_favorite(dir.path().join(name).to_str().unwrap(), name)
                .unwrap();
        }
        let row = app.row_ref(0).unwrap();
        app.remove_favorite(0).unwrap();
        let err = app.describe_favorite(&row, "meant for a").unwrap_err();
        assert!(matches!(err, FavError::Stale(_)));
        assert_eq!(app.store().get(0).unwrap().description, "b");
    }

    #[test]
    fn failed_add_leaves_no_phantom_entry() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let file = blocker.join("favorites.json");
        let mut app = app_with(dir.path(), Some(file.to_string_lossy().into_owned()));
        let target = dir.path().join("a.txt");
        std::fs::write(&target, "x").unwrap();

        let err = app.add_favorite(target.to_str().unwrap(), "").unwrap_err();
        assert!(matches!(err, FavError::Io { .. }));
        assert!(app.store().is_empty());
        assert_eq!(app.status_of(0), None);

        // A retry hits the same write failure instead of a duplicate error.
        let err = app.add_favorite(target.to_str().unwrap(), "").unwrap_err();
        assert!(matches!(err, FavError::Io { .. }));
    }

    #[test]
    fn drained_move_updates_store_and_watches() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::create_dir(&first).unwrap();
        std::fs::create_dir(&second).unwrap();
        let a = first.join("a.txt");
        let keep = second.join("keep.txt");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&keep, "keep").unwrap();

        let mut app = new_app(dir.path());
        app.add_favorite(a.to_str().unwrap(), "").unwrap();
        app.add_favorite(keep.to_str().unwrap(), "").unwrap();

        let moved = second.join("a.txt");
        std::fs::rename(&a, &moved).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.store().get(0).is_some_and(|e| e.path != moved) {
            if Instant::now() > deadline {
                break;
            }
            app.drain_watch_events();
            std::thread::sleep(Duration::from_millis(50));
        }

        assert_eq!(app.store().get(0).unwrap().path, moved);
        assert_eq!(app.status_of(0), Some(FavStatus::Found));
        let watched: Vec<PathBuf> = app
            .watcher
            .as_ref()
            .unwrap()
            .watched_dirs()
            .map(Path::to_path_buf)
            .collect();
        assert_eq!(watched, vec![second]);
    }
}
