//! Asset handles and load tracking.
//!
//! Everything the game loads is requested once at startup and kept in
//! `GameAssets`. `watch_asset_loads` polls the asset server each frame and
//! reports each asset exactly once as ready or failed.
use bevy::asset::LoadState;
use bevy::audio::AudioSource;
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::context::GameEvent;

/// The assets the game cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Model,
    GroundTexture,
    PickupTexture,
    Background,
    Music,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Model,
        AssetKind::GroundTexture,
        AssetKind::PickupTexture,
        AssetKind::Background,
        AssetKind::Music,
    ];

    fn slot(self) -> usize {
        match self {
            AssetKind::Model => 0,
            AssetKind::GroundTexture => 1,
            AssetKind::PickupTexture => 2,
            AssetKind::Background => 3,
            AssetKind::Music => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Load status per asset kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReadiness {
    status: [AssetStatus; 5],
}

impl AssetReadiness {
    #[must_use]
    pub fn status(&self, kind: AssetKind) -> AssetStatus {
        self.status[kind.slot()]
    }

    /// Record a final status. Returns `false` if the kind was already settled.
    pub fn settle(&mut self, kind: AssetKind, status: AssetStatus) -> bool {
        let slot = &mut self.status[kind.slot()];
        if *slot != AssetStatus::Pending {
            return false;
        }
        *slot = status;
        true
    }
}

/// Handles for everything requested at startup.
#[derive(Resource)]
pub struct GameAssets {
    pub model: Handle<Gltf>,
    pub ground: Handle<Image>,
    pub pickup: Handle<Image>,
    pub background: Handle<Image>,
    pub music: Handle<AudioSource>,
}

impl GameAssets {
    #[must_use]
    pub fn id(&self, kind: AssetKind) -> UntypedAssetId {
        match kind {
            AssetKind::Model => self.model.id().untyped(),
            AssetKind::GroundTexture => self.ground.id().untyped(),
            AssetKind::PickupTexture => self.pickup.id().untyped(),
            AssetKind::Background => self.background.id().untyped(),
            AssetKind::Music => self.music.id().untyped(),
        }
    }
}

/// Report each asset once when it finishes loading or fails.
#[allow(clippy::needless_pass_by_value)]
pub fn watch_asset_loads(
    asset_server: Res<AssetServer>,
    assets: Option<Res<GameAssets>>,
    mut reported: Local<AssetReadiness>,
    mut events: EventWriter<GameEvent>,
) {
    let Some(assets) = assets else { return };

    for kind in AssetKind::ALL {
        if reported.status(kind) != AssetStatus::Pending {
            continue;
        }
        match asset_server.load_state(assets.id(kind)) {
            LoadState::Loaded => {
                reported.settle(kind, AssetStatus::Ready);
                events.send(GameEvent::AssetReady(kind));
            }
            LoadState::Failed(err) => {
                reported.settle(kind, AssetStatus::Failed);
                events.send(GameEvent::AssetFailed { kind, reason: err.to_string() });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_settle_once() {
        let mut r = AssetReadiness::default();
        assert_eq!(r.status(AssetKind::Model), AssetStatus::Pending);
        assert!(r.settle(AssetKind::Model, AssetStatus::Failed));
        assert!(!r.settle(AssetKind::Model, AssetStatus::Ready));
        assert_eq!(r.status(AssetKind::Model), AssetStatus::Failed);
        assert_eq!(r.status(AssetKind::Music), AssetStatus::Pending);
    }
}
