use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bevy::math::Vec3;
use meteorfall::context::{AssetKind, GameContext, GameEvent};
use meteorfall::hazard::compute_escalation;
use meteorfall::input::{Direction, InputSource};
use meteorfall::pickup::PickupPool;
use meteorfall::settings::Settings;

/// A running round with the model loaded and forward + left held.
fn running_context() -> GameContext {
    let mut ctx = GameContext::new(Settings::default(), StdRng::seed_from_u64(7));
    ctx.dispatch(GameEvent::AssetReady(AssetKind::Model));
    ctx.dispatch(GameEvent::StartRequested);
    for direction in [Direction::Forward, Direction::Left] {
        ctx.dispatch(GameEvent::InputChanged { direction, pressed: true, source: InputSource::Keyboard });
    }
    ctx.drain_signals();
    ctx
}

/// Full per-frame update: steer, clamp, clip edge, pickup scan.
fn bench_frame_update(c: &mut Criterion) {
    c.bench_function("frame_update_1000", |b| {
        b.iter(|| {
            let mut ctx = running_context();
            for _ in 0..1_000 {
                ctx.dispatch(GameEvent::FrameRendered);
            }
            black_box(ctx.session().score());
        })
    });
}

/// Proximity scan over the default pool with nothing in range.
fn bench_collect_miss(c: &mut Criterion) {
    let settings = Settings::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut pool = PickupPool::default();
    pool.repopulate(settings.pickups.count, settings.arena.spawn_extent, &mut rng);
    let far = Vec3::new(1_000.0, 0.0, 1_000.0);

    c.bench_function("collect_near_miss", |b| {
        b.iter(|| {
            black_box(pool.collect_near(black_box(far), 0.4, 36.0, &mut rng));
        })
    });
}

/// Scan that hits: a large radius forces removal and respawn each iteration.
fn bench_collect_hit(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(13);
    let mut pool = PickupPool::default();
    pool.repopulate(500, 36.0, &mut rng);

    c.bench_function("collect_near_hit_500", |b| {
        b.iter(|| {
            let got = pool.collect_near(Vec3::ZERO, 4.0, 36.0, &mut rng);
            black_box(got.len());
        })
    });
}

/// Light escalation across a whole round.
fn bench_escalation(c: &mut Criterion) {
    let hazard = Settings::default().hazard;
    c.bench_function("compute_escalation_sweep", |b| {
        b.iter(|| {
            for step in 0..=600u32 {
                let p = step as f32 / 600.0;
                black_box(compute_escalation(black_box(p), &hazard));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_frame_update,
    bench_collect_miss,
    bench_collect_hit,
    bench_escalation,
);
criterion_main!(benches);
