//! Third-person follow camera, end-of-round shake and viewport aspect.
//!
//! `follow_camera` places the camera behind the creature using the offset from
//! `Settings.camera`, rotated by the creature's yaw, and then adds the hazard
//! shake on top so the shake never accumulates between frames.

use bevy::prelude::*;

use crate::actor::{Actor, FollowCamera};
use crate::context::{GameContext, GameSignal};
use crate::hazard;

/// Where the camera should sit and what it should look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye).looking_at(self.target, Vec3::Y)
    }
}

/// Pose for a camera trailing `actor` by `offset` in the actor's local frame.
#[must_use]
pub fn follow_pose(actor: &Actor, offset: Vec3) -> CameraPose {
    CameraPose {
        eye: actor.position + actor.rotation() * offset,
        target: actor.position,
    }
}

/// Move the camera behind the creature.
///
/// The camera tracks every frame while a round runs, and once more when the
/// model becomes ready or a round starts; otherwise it stays where it is.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_camera(
    ctx: Res<GameContext>,
    mut signals: EventReader<GameSignal>,
    mut query: Query<&mut Transform, With<FollowCamera>>,
) {
    let snap = signals
        .read()
        .any(|s| matches!(s, GameSignal::ModelReady | GameSignal::SessionStarted));
    if !ctx.is_ready() || !(snap || ctx.session().is_active()) {
        return;
    }

    let pose = follow_pose(ctx.actor(), ctx.settings().camera.offset_vec());
    let mut transform = pose.transform();

    if ctx.session().is_active() {
        let h = &ctx.settings().hazard;
        #[allow(clippy::cast_precision_loss)]
        let remaining = ctx.session().remaining() as f32;
        if let Some(magnitude) = hazard::shake_magnitude(remaining, h.shake_threshold_secs, h.shake_max) {
            transform.translation += hazard::shake_offset(&mut rand::thread_rng(), magnitude, h.shake_bias);
        }
    }

    for mut cam in &mut query {
        *cam = transform;
    }
}

/// Keep the perspective aspect ratio in step with the last known viewport.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_viewport(ctx: Res<GameContext>, mut query: Query<&mut Projection, With<FollowCamera>>) {
    let Some(aspect) = ctx.viewport().aspect() else { return };
    for mut projection in &mut query {
        if let Projection::Perspective(p) = projection.as_mut()
            && (p.aspect_ratio - aspect).abs() > f32::EPSILON
        {
            p.aspect_ratio = aspect;
        }
    }
}
