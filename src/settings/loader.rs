//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first one (by file name) that parses is used.
//! If no RON files are found or none parse, default settings are used.
//!
//! On reload, a directory where no file parses and a file that fails
//! validation are both rejected; the running settings stay in place.
use bevy::prelude::*;

use crate::settings::Settings;
use crate::watch::{load_ron_files, setup_ron_watcher, RonWatcher};

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

    #[must_use]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Raise the reload flag without a filesystem event.
    pub fn request_reload(&self) {
        self.watcher.mark_changed();
    }
}

/// The first settings file in `path` that parses, if any.
#[must_use]
pub fn try_load_settings_from_dir(path: &str) -> Option<Settings> {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next()
}

/// Load settings from `path` (directory), falling back to defaults.
///
/// # Example
/// ```
/// let settings = stride::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.validate().is_ok());
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    try_load_settings_from_dir(path).unwrap_or_else(Settings::defaults)
}

/// Reload settings when the `reload_settings` key is pressed.
#[allow(clippy::needless_pass_by_value)]
pub fn reload_settings_on_key(
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    watcher: Res<SettingsWatcher>,
) {
    if input.just_pressed(settings.controls.key("reload_settings", KeyCode::F5)) {
        info!("settings reload requested");
        watcher.request_reload();
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the underlying `notify::Error` when the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(|watcher| SettingsWatcher { watcher, dir: path.to_string() })
}

/// Check for changes and reload the settings resource when files change.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, stride::settings::loader::check_settings_changes);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.watcher.take_changed() {
        return;
    }

    let Some(reloaded) = try_load_settings_from_dir(watcher.dir()) else {
        warn!("no settings file in {} parsed, keeping current settings", watcher.dir());
        return;
    };
    match reloaded.validate() {
        Ok(()) => {
            info!("settings changed, reloaded from {}", watcher.dir());
            *settings = reloaded;
        }
        Err(e) => warn!("rejected reloaded settings: {e}"),
    }
}
