//! Creature animation: two named roles (movement, idle) switched on edges.
//!
//! Clips are resolved by name once the glTF file has loaded. A role whose
//! keywords match nothing falls back to the first clip; a model without
//! clips simply never animates.
use bevy::gltf::Gltf;
use bevy::prelude::*;
use thiserror::Error;

use crate::context::{AssetKind, GameContext, GameSignal};
use crate::settings::ActorSettings;

/// Which animation the creature should be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorClip {
    Movement,
    Idle,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipError {
    #[error("model has no animation clips")]
    NoClips,
}

/// Clip index for each role, validated against the loaded clip list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipSet {
    pub movement: usize,
    pub idle: usize,
}

fn find_by_keywords(names: &[String], keywords: &[String]) -> Option<usize> {
    names.iter().position(|name| {
        let name = name.to_lowercase();
        keywords.iter().any(|k| !k.is_empty() && name.contains(&k.to_lowercase()))
    })
}

impl ClipSet {
    /// Resolve roles from clip names (in file order).
    ///
    /// # Errors
    /// `ClipError::NoClips` if `names` is empty.
    pub fn resolve(names: &[String], actor: &ActorSettings) -> Result<Self, ClipError> {
        if names.is_empty() {
            return Err(ClipError::NoClips);
        }
        let movement = find_by_keywords(names, &actor.movement_clip_keywords).unwrap_or_else(|| {
            warn!("no movement clip matches {:?}; using '{}'", actor.movement_clip_keywords, names[0]);
            0
        });
        let idle = find_by_keywords(names, &actor.idle_clip_keywords).unwrap_or_else(|| {
            warn!("no idle clip matches {:?}; using '{}'", actor.idle_clip_keywords, names[0]);
            0
        });
        Ok(Self { movement, idle })
    }

    #[must_use]
    pub fn index(&self, clip: ActorClip) -> usize {
        match clip {
            ActorClip::Movement => self.movement,
            ActorClip::Idle => self.idle,
        }
    }
}

/// Edge detector over the moving/idle state.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionEdge {
    was_moving: bool,
}

impl MotionEdge {
    /// Report the clip to switch to when `moving` differs from last frame.
    pub fn observe(&mut self, moving: bool) -> Option<ActorClip> {
        if moving == self.was_moving {
            return None;
        }
        self.was_moving = moving;
        Some(if moving { ActorClip::Movement } else { ActorClip::Idle })
    }
}

/// Loaded animation graph for the creature.
#[derive(Resource)]
pub struct ActorAnimations {
    pub graph: Handle<AnimationGraph>,
    pub nodes: Vec<AnimationNodeIndex>,
    pub clips: ClipSet,
}

impl ActorAnimations {
    #[must_use]
    pub fn node(&self, clip: ActorClip) -> Option<AnimationNodeIndex> {
        self.nodes.get(self.clips.index(clip)).copied()
    }
}

/// Handle of the creature's glTF document, used to read clip names.
#[derive(Resource)]
pub struct ActorGltf(pub Handle<Gltf>);

/// Clip names aligned with `gltf.animations`.
fn clip_names(gltf: &Gltf) -> Vec<String> {
    gltf.animations
        .iter()
        .enumerate()
        .map(|(i, handle)| {
            gltf.named_animations
                .iter()
                .find(|(_, h)| *h == handle)
                .map_or_else(|| format!("clip{i}"), |(name, _)| name.to_string())
        })
        .collect()
}

/// Build the animation graph once the model is ready.
#[allow(clippy::needless_pass_by_value)]
pub fn prepare_actor_animations(
    mut commands: Commands,
    mut signals: EventReader<GameSignal>,
    ctx: Res<GameContext>,
    source: Option<Res<ActorGltf>>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    if !signals.read().any(|s| *s == GameSignal::ModelReady) {
        return;
    }
    let Some(gltf) = source.and_then(|s| gltfs.get(&s.0)) else {
        warn!("{:?} ready but glTF document missing; no animation", AssetKind::Model);
        return;
    };

    let names = clip_names(gltf);
    let clips = match ClipSet::resolve(&names, &ctx.settings().actor) {
        Ok(clips) => clips,
        Err(e) => {
            warn!("creature animation disabled: {e}");
            return;
        }
    };
    info!("creature clips: movement='{}' idle='{}'", names[clips.movement], names[clips.idle]);

    let (graph, nodes) = AnimationGraph::from_clips(gltf.animations.iter().cloned());
    commands.insert_resource(ActorAnimations { graph: graphs.add(graph), nodes, clips });
}

/// Give newly spawned animation players the graph and start the idle clip.
#[allow(clippy::needless_pass_by_value)]
pub fn attach_animation_graph(
    mut commands: Commands,
    animations: Option<Res<ActorAnimations>>,
    mut players: Query<(Entity, &mut AnimationPlayer), Without<Handle<AnimationGraph>>>,
) {
    let Some(animations) = animations else { return };
    for (entity, mut player) in &mut players {
        commands.entity(entity).insert(animations.graph.clone());
        if let Some(node) = animations.node(ActorClip::Idle) {
            player.play(node).repeat();
        }
    }
}

/// Stop everything and start the requested clip on each edge.
#[allow(clippy::needless_pass_by_value)]
pub fn play_actor_clip(
    mut signals: EventReader<GameSignal>,
    animations: Option<Res<ActorAnimations>>,
    mut players: Query<&mut AnimationPlayer, With<Handle<AnimationGraph>>>,
) {
    let latest = signals
        .read()
        .filter_map(|s| match s {
            GameSignal::ClipChanged(c) => Some(*c),
            _ => None,
        })
        .last();
    let Some(clip) = latest else {
        return;
    };

    for mut player in &mut players {
        player.stop_all();
        if let Some(node) = animations.as_ref().and_then(|a| a.node(clip)) {
            player.play(node).repeat();
        }
    }
    debug!("creature clip -> {clip:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn resolves_by_name_case_insensitive() {
        let actor = ActorSettings::default();
        let set = ClipSet::resolve(&names(&["Attack", "Idle_Breathe", "RUN_fast", "Walk"]), &actor)
            .expect("clips present");
        assert_eq!(set.idle, 1);
        assert_eq!(set.movement, 2);
    }

    #[test]
    fn unmatched_roles_fall_back_to_first_clip() {
        let actor = ActorSettings::default();
        let set = ClipSet::resolve(&names(&["Roar", "Bite"]), &actor).expect("clips present");
        assert_eq!(set, ClipSet { movement: 0, idle: 0 });
    }

    #[test]
    fn no_clips_is_an_error() {
        let actor = ActorSettings::default();
        assert_eq!(ClipSet::resolve(&[], &actor), Err(ClipError::NoClips));
    }

    #[test]
    fn edges_fire_only_on_change() {
        let mut edge = MotionEdge::default();
        assert_eq!(edge.observe(false), None);
        assert_eq!(edge.observe(true), Some(ActorClip::Movement));
        assert_eq!(edge.observe(true), None);
        assert_eq!(edge.observe(true), None);
        assert_eq!(edge.observe(false), Some(ActorClip::Idle));
        assert_eq!(edge.observe(false), None);
    }
}
