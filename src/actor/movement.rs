//! Per-frame steering and the arena clamp.
//!
//! Speeds are per rendered frame, so movement rate follows the display
//! refresh rate.

use bevy::prelude::*;

use crate::actor::{Actor, ActorModel};
use crate::context::GameContext;
use crate::input::InputState;

/// Per-frame movement constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub half_extent: f32,
}

/// Apply one frame of input to the actor.
///
/// The facing used for translation is captured before this frame's turn is
/// applied. Holding forward and back together cancels out.
pub fn step_actor(actor: &mut Actor, input: &InputState, steering: &Steering) {
    let forward = actor.forward();

    if input.left {
        actor.yaw += steering.rotation_speed;
    }
    if input.right {
        actor.yaw -= steering.rotation_speed;
    }

    let mut delta = Vec3::ZERO;
    if input.forward {
        delta += forward * steering.move_speed;
    }
    if input.back {
        delta -= forward * steering.move_speed;
    }
    actor.position += delta;
    actor.position = clamp_to_arena(actor.position, steering.half_extent);
}

/// Clamp the horizontal coordinates into `[-half_extent, half_extent]`.
#[must_use]
pub fn clamp_to_arena(position: Vec3, half_extent: f32) -> Vec3 {
    Vec3::new(
        position.x.clamp(-half_extent, half_extent),
        position.y,
        position.z.clamp(-half_extent, half_extent),
    )
}

/// Copy the actor pose from the game context onto the spawned model.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_actor_transform(
    ctx: Res<GameContext>,
    mut query: Query<&mut Transform, With<ActorModel>>,
) {
    if !ctx.is_ready() {
        return;
    }
    for mut transform in &mut query {
        *transform = ctx.actor().transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn steering() -> Steering {
        Steering { move_speed: 0.05, rotation_speed: 0.02, half_extent: 19.5 }
    }

    #[test]
    fn forward_moves_along_facing() {
        let mut a = Actor::new(0.3);
        let input = InputState { forward: true, ..Default::default() };
        step_actor(&mut a, &input, &steering());
        assert!((a.position.z - 0.05).abs() < 1e-6);
        assert!(a.position.x.abs() < 1e-6);
    }

    #[test]
    fn back_moves_opposite() {
        let mut a = Actor::new(0.3);
        let input = InputState { back: true, ..Default::default() };
        step_actor(&mut a, &input, &steering());
        assert!((a.position.z + 0.05).abs() < 1e-6);
    }

    #[test]
    fn turning_does_not_translate() {
        let mut a = Actor::new(0.3);
        let input = InputState { left: true, ..Default::default() };
        step_actor(&mut a, &input, &steering());
        assert_eq!(a.position, Vec3::ZERO);
        assert!((a.yaw - 0.02).abs() < 1e-6);
        let input = InputState { right: true, ..Default::default() };
        step_actor(&mut a, &input, &steering());
        step_actor(&mut a, &input, &steering());
        assert!((a.yaw + 0.02).abs() < 1e-6);
    }

    #[test]
    fn translation_uses_facing_before_turn() {
        let mut a = Actor::new(0.3);
        let input = InputState { forward: true, left: true, ..Default::default() };
        step_actor(&mut a, &input, &steering());
        // first frame still moves straight along +Z
        assert!(a.position.x.abs() < 1e-6);
        assert!((a.position.z - 0.05).abs() < 1e-6);
    }

    #[test]
    fn clamps_instead_of_bouncing() {
        let mut a = Actor::new(0.3);
        a.position = Vec3::new(19.49, 0.0, 19.49);
        let input = InputState { forward: true, ..Default::default() };
        step_actor(&mut a, &input, &steering());
        assert!((a.position.z - 19.5).abs() < 1e-6);
        assert!((a.position.x - 19.49).abs() < 1e-6);
    }

    #[test]
    fn random_input_never_leaves_arena() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut a = Actor::new(0.3);
        let fast = Steering { move_speed: 2.5, ..steering() };
        for _ in 0..5_000 {
            let input = InputState {
                forward: rng.gen_bool(0.6),
                back: rng.gen_bool(0.2),
                left: rng.gen_bool(0.3),
                right: rng.gen_bool(0.3),
            };
            step_actor(&mut a, &input, &fast);
            assert!(a.position.x.abs() <= 19.5);
            assert!(a.position.z.abs() <= 19.5);
        }
    }
}
