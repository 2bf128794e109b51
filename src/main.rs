use eframe::egui;
use fav_files::common::paths::config_dir;
use fav_files::gui::FavApp;
use fav_files::logging;
use fav_files::settings::{Settings, SETTINGS_FILE};

fn main() -> anyhow::Result<()> {
    let settings_path = config_dir().join(SETTINGS_FILE);
    let settings_path = settings_path.to_string_lossy().into_owned();
    let settings = match Settings::load(&settings_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {settings_path}: {e}; using defaults");
            Settings::default()
        }
    };
    logging::init(
        settings.debug_logging,
        settings.log_path(std::path::Path::new(&settings_path)),
    );
    tracing::info!("settings loaded from {settings_path}");

    let (w, h) = settings.window_size.unwrap_or((800, 600));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w as f32, h as f32])
            .with_min_inner_size([400.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Favorite Files Manager",
        native_options,
        Box::new(move |cc| Box::new(FavApp::new(&cc.egui_ctx, settings, settings_path))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start window: {e}"))
}
