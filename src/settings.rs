use crate::common::paths::resolve_config_path;
use crate::favorites::FAVORITES_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Location of the favorites list. Relative paths are resolved against
    /// the directory holding the settings file. Defaults to `favorites.json`.
    #[serde(default)]
    pub favorites_file: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write log output to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Ask before removing a favorite.
    #[serde(default = "default_confirm_remove")]
    pub confirm_remove: bool,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(i32, i32)>,
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_confirm_remove() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            favorites_file: None,
            debug_logging: false,
            log_file: None,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            confirm_remove: default_confirm_remove(),
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(anyhow::Error::new(e).context(format!("reading {path}"))),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Absolute location of the favorites list for a settings file at
    /// `settings_path`.
    pub fn favorites_path(&self, settings_path: &Path) -> PathBuf {
        let name = self.favorites_file.as_deref().unwrap_or(FAVORITES_FILE);
        resolve_config_path(settings_path, name)
    }

    pub fn log_path(&self, settings_path: &Path) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(|f| resolve_config_path(settings_path, f))
    }
}
