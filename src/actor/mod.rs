//! The creature the player steers: pose, movement and the follow camera.
//!
//! The module provides the `Actor` pose used by the game core, the `ActorModel`
//! and `FollowCamera` marker components, and re-exports the movement and
//! camera helpers.
pub mod camera;
pub mod movement;

use bevy::prelude::*;

pub use camera::*;
pub use movement::*;

/// Pose of the creature in arena space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    /// Feet position; `y` stays on the ground plane.
    pub position: Vec3,
    /// Rotation about +Y in radians. Zero faces +Z.
    pub yaw: f32,
    /// Uniform model scale; fixed after creation.
    pub scale: f32,
}

impl Actor {
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self { position: Vec3::ZERO, yaw: 0.0, scale }
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit vector the creature is facing.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_rotation(self.rotation())
            .with_scale(Vec3::splat(self.scale))
    }
}

/// Root entity of the spawned creature scene.
#[derive(Component)]
pub struct ActorModel;

/// The camera that trails the creature.
#[derive(Component)]
pub struct FollowCamera;
