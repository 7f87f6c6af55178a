//! Window and lighting preferences that can change while the game runs.
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use meteorfall::settings::Settings;

#[must_use]
pub fn present_mode(vsync: bool) -> PresentMode {
    if vsync { PresentMode::Fifo } else { PresentMode::AutoNoVsync }
}

/// Apply `graphics.vsync` to the primary window.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut applied: Local<Option<bool>>,
) {
    let vsync = settings.graphics.vsync;
    if *applied == Some(vsync) {
        return;
    }
    for mut window in &mut windows {
        window.present_mode = present_mode(vsync);
    }
    *applied = Some(vsync);
}

/// Apply `graphics.ambient_brightness` after a settings reload.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_ambient_settings(settings: Res<Settings>, mut ambient: ResMut<AmbientLight>) {
    if settings.is_changed() && !settings.is_added() {
        ambient.brightness = settings.graphics.ambient_brightness;
    }
}
