//! Procedural sky behind the panorama sphere.
//!
//! When the background texture is missing the arena still gets a sky from
//! `bevy_atmosphere`. Toggling `atmosphere.enabled` needs a restart; resolution
//! and dithering follow hot reloads.
use bevy::prelude::*;
use bevy_atmosphere::prelude::AtmosphereSettings as SkySettings;
use meteorfall::settings::Settings;

/// Push `Settings.atmosphere` into the running sky renderer.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_atmosphere_settings(
    settings: Res<Settings>,
    mut applied: Local<Option<(u32, bool)>>,
    mut sky: ResMut<SkySettings>,
) {
    let wanted = (settings.atmosphere.resolution, settings.atmosphere.dithering);
    if *applied == Some(wanted) {
        return;
    }
    sky.resolution = wanted.0;
    sky.dithering = wanted.1;
    *applied = Some(wanted);
}
