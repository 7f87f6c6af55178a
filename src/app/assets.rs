//! Post-load tweaks to textures requested at startup.

use bevy::prelude::*;
use bevy::render::texture::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use meteorfall::assets::GameAssets;

/// Switch the ground texture to a repeating sampler once it is in `Assets<Image>`.
///
/// The ground material scales its UVs by `graphics.ground_repeat`, which only
/// tiles when the sampler wraps instead of clamping.
#[allow(clippy::needless_pass_by_value)]
pub fn ensure_ground_sampler(
    assets: Option<Res<GameAssets>>,
    mut images: ResMut<Assets<Image>>,
    mut done: Local<bool>,
) {
    if *done {
        return;
    }
    let Some(assets) = assets else { return };

    if let Some(image) = images.get_mut(&assets.ground) {
        image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            mag_filter: ImageFilterMode::Linear,
            min_filter: ImageFilterMode::Linear,
            ..Default::default()
        });
        *done = true;
    }
}
