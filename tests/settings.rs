use fav_files::settings::Settings;
use tempfile::tempdir;

#[test]
fn missing_settings_use_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let s = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(s, Settings::default());
    assert!(s.enable_toasts);
    assert!(s.confirm_remove);
    assert_eq!(s.toast_duration, 3.0);
}

#[test]
fn partial_settings_fill_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"debug_logging": true, "favorites_file": "lists/favs.json"}"#)
        .unwrap();
    let s = Settings::load(path.to_str().unwrap()).unwrap();
    assert!(s.debug_logging);
    assert!(s.enable_toasts);
    assert_eq!(s.favorites_path(&path), dir.path().join("lists").join("favs.json"));
    assert!(s.log_path(&path).is_none());
}

#[test]
fn default_favorites_file_sits_next_to_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let s = Settings::default();
    assert_eq!(s.favorites_path(&path), dir.path().join("favorites.json"));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let path = path.to_str().unwrap();
    let s = Settings {
        window_size: Some((640, 480)),
        log_file: Some("fav.log".into()),
        confirm_remove: false,
        ..Settings::default()
    };
    s.save(path).unwrap();
    assert_eq!(Settings::load(path).unwrap(), s);
}

#[test]
fn malformed_settings_are_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ nope").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}

#[test]
fn unreadable_settings_are_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::create_dir(&path).unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}
