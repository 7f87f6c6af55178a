//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` (by file name)
//! is used. If no RON files are found or none parse, default settings are used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;
use bevy::prelude::*;

/// Directory scanned for settings files.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher {
    watcher: RonWatcher,
    dir: String,
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher { watcher: RonWatcher::stub(), dir: SETTINGS_DIR.to_string() }
    }
}

/// Load settings from `path` (directory).
///
/// # Example
/// ```ignore
/// let settings = load_settings_from_dir("data/settings");
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        first
    } else {
        info!("no settings found in '{path}', using defaults");
        Settings::defaults()
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify::Error` if the directory cannot be watched; callers
/// fall back to `SettingsWatcher::stub()`.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(|watcher| SettingsWatcher { watcher, dir: path.to_string() })
}

/// Reload the `Settings` resource when files in the watched directory change.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.watcher.take_changed() {
        info!("Settings changed, reloading...");
        *settings = load_settings_from_dir(&watcher.dir);
    }
}
