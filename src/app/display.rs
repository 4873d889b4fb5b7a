//! Display-related systems, such as syncing vsync
//! settings from the main `Settings` resource to the primary window's present mode.
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use stride::settings::Settings;

/// Present mode for a vsync preference.
pub fn present_mode(vsync: bool) -> PresentMode {
    if vsync { PresentMode::Fifo } else { PresentMode::AutoNoVsync }
}

/// Sync `Settings.graphics.vsync` into the present mode of the primary window.
/// Allows the user to toggle vsync at runtime without restarting.
///
/// `last` caches the last applied value so the window is only touched when
/// the preference changes.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let desired = settings.graphics.vsync;
    if *last == Some(desired) { return; }

    for mut w in &mut windows {
        w.present_mode = present_mode(desired);
    }
    debug!("vsync {}", if desired { "on" } else { "off" });
    *last = Some(desired);
}
