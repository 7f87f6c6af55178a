//! Collectible pickups: a fixed-size pool that refills itself one-for-one.
//!
//! The pool lives in the game core. `sync_pickup_entities` mirrors it into the
//! scene by id, so the renderer never has to know why a pickup moved.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;

use crate::context::GameContext;

/// Stable identity of a pickup; never reused within a run.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub id: PickupId,
    pub position: Vec3,
}

/// Active pickups in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PickupPool {
    items: Vec<Pickup>,
    next_id: u64,
}

/// Random ground position within `+-extent/2` on both axes.
pub fn random_ground_position(rng: &mut impl Rng, extent: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent,
        0.0,
        (rng.gen::<f32>() - 0.5) * extent,
    )
}

impl PickupPool {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.items.iter()
    }

    #[must_use]
    pub fn get(&self, id: PickupId) -> Option<&Pickup> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Throw away every pickup and scatter `count` fresh ones.
    pub fn repopulate(&mut self, count: usize, extent: f32, rng: &mut impl Rng) {
        self.items.clear();
        for _ in 0..count {
            self.spawn(extent, rng);
        }
    }

    /// Append one pickup at a random position and return its id.
    pub fn spawn(&mut self, extent: f32, rng: &mut impl Rng) -> PickupId {
        let id = PickupId(self.next_id);
        self.next_id += 1;
        self.items.push(Pickup { id, position: random_ground_position(rng, extent) });
        id
    }

    /// Collect every pickup closer than `radius` to `point`.
    ///
    /// Collected pickups are reported in insertion order. Each one is removed
    /// and replaced by exactly one new pickup, so the pool size never changes.
    pub fn collect_near(
        &mut self,
        point: Vec3,
        radius: f32,
        extent: f32,
        rng: &mut impl Rng,
    ) -> Vec<PickupId> {
        let collected: Vec<PickupId> = self
            .items
            .iter()
            .filter(|p| p.position.distance(point) < radius)
            .map(|p| p.id)
            .collect();

        if collected.is_empty() {
            return collected;
        }
        self.items.retain(|p| !collected.contains(&p.id));
        for _ in &collected {
            self.spawn(extent, rng);
        }
        collected
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, id: PickupId, position: Vec3) {
        if let Some(p) = self.items.iter_mut().find(|p| p.id == id) {
            p.position = position;
        }
    }
}

/// Mesh and material shared by every pickup entity.
#[derive(Resource, Clone)]
pub struct PickupAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Reconcile pickup entities with the pool: despawn the collected, spawn the new.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_pickup_entities(
    mut commands: Commands,
    ctx: Res<GameContext>,
    assets: Option<Res<PickupAssets>>,
    existing: Query<(Entity, &PickupId)>,
) {
    let Some(assets) = assets else { return };

    let mut present: HashMap<PickupId, Entity> = existing.iter().map(|(e, id)| (*id, e)).collect();

    for pickup in ctx.pickups().iter() {
        if present.remove(&pickup.id).is_some() {
            continue;
        }
        commands.spawn((
            PbrBundle {
                mesh: assets.mesh.clone(),
                material: assets.material.clone(),
                transform: Transform::from_translation(pickup.position),
                ..default()
            },
            pickup.id,
        ));
    }

    for (_, entity) in present {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn repopulate_fills_to_count_within_extent() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = PickupPool::default();
        pool.repopulate(50, 36.0, &mut rng);
        assert_eq!(pool.len(), 50);
        for p in pool.iter() {
            assert!(p.position.x.abs() <= 18.0);
            assert!(p.position.z.abs() <= 18.0);
            assert!(p.position.y.abs() < f32::EPSILON);
        }
        pool.repopulate(50, 36.0, &mut rng);
        assert_eq!(pool.len(), 50);
    }

    #[test]
    fn collect_replaces_one_for_one() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = PickupPool::default();
        pool.repopulate(50, 36.0, &mut rng);
        let ids: Vec<PickupId> = pool.iter().take(3).map(|p| p.id).collect();
        for id in &ids {
            pool.place(*id, Vec3::new(5.0, 0.0, 5.0));
        }

        let got = pool.collect_near(Vec3::new(5.0, 0.0, 5.1), 0.4, 36.0, &mut rng);
        assert_eq!(got, ids, "collected in insertion order");
        assert_eq!(pool.len(), 50);
        for id in &ids {
            assert!(pool.get(*id).is_none());
        }
    }

    #[test]
    fn radius_is_strict() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = PickupPool::default();
        pool.repopulate(1, 36.0, &mut rng);
        let id = pool.iter().next().map(|p| p.id).expect("one pickup");
        pool.place(id, Vec3::new(0.4, 0.0, 0.0));
        assert!(pool.collect_near(Vec3::ZERO, 0.4, 36.0, &mut rng).is_empty());
        pool.place(id, Vec3::new(0.39, 0.0, 0.0));
        assert_eq!(pool.collect_near(Vec3::ZERO, 0.4, 36.0, &mut rng), vec![id]);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = PickupPool::default();
        pool.repopulate(5, 36.0, &mut rng);
        let first_max = pool.iter().map(|p| p.id).max().expect("non-empty");
        pool.repopulate(5, 36.0, &mut rng);
        assert!(pool.iter().all(|p| p.id > first_max));
    }

    #[test]
    fn entities_follow_the_pool() {
        use crate::context::{AssetKind, GameEvent};

        let mut ctx = GameContext::new(crate::settings::Settings::default(), StdRng::seed_from_u64(9));
        ctx.dispatch(GameEvent::AssetReady(AssetKind::Model));
        ctx.dispatch(GameEvent::StartRequested);

        let mut app = App::new();
        app.insert_resource(ctx)
            .insert_resource(PickupAssets { mesh: Handle::default(), material: Handle::default() })
            .add_systems(Update, sync_pickup_entities);
        app.update();

        let mut spawned = app.world_mut().query::<&PickupId>();
        let before: Vec<PickupId> = spawned.iter(app.world()).copied().collect();
        assert_eq!(before.len(), 50);

        let target = {
            let mut ctx = app.world_mut().resource_mut::<GameContext>();
            let ids: Vec<PickupId> = ctx.pickups().iter().map(|p| p.id).collect();
            for id in &ids {
                ctx.pickups_mut().place(*id, Vec3::new(6.0, 0.0, -6.0));
            }
            ctx.pickups_mut().place(ids[0], Vec3::ZERO);
            ctx.dispatch(GameEvent::FrameRendered);
            assert_eq!(ctx.session().score(), 1);
            ids[0]
        };
        app.update();

        let after: Vec<PickupId> = spawned.iter(app.world()).copied().collect();
        assert_eq!(after.len(), 50);
        assert!(!after.contains(&target));
        let ctx = app.world().resource::<GameContext>();
        for id in &after {
            assert!(ctx.pickups().get(*id).is_some());
        }
    }
}
