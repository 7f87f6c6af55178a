//! Debug utilities: a key (F3 default) dumps diagnostics, entity and asset
//! counts, process memory and a snapshot of the game state to a timestamped
//! text file in `./debug-dumps/`.
//!
//! Handy for capturing what a round looked like without attaching a debugger.
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, ProcessExt, System, SystemExt};

use crate::context::{AssetKind, GameContext};
use crate::settings::Settings;

pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

fn kb_to_mb(kb: u64) -> String {
    format!("{:.2} MB", (kb as f64) / 1024.0)
}

/// Human-readable snapshot of the game core.
#[must_use]
pub fn game_snapshot(ctx: &GameContext) -> String {
    let mut out = String::new();
    let session = ctx.session();
    let actor = ctx.actor();
    writeln!(out, "Session: {:?} remaining={}s score={}", session.phase(), session.remaining(), session.score()).ok();
    writeln!(
        out,
        "Actor: pos=({:.2}, {:.2}, {:.2}) yaw={:.3} ready={}",
        actor.position.x, actor.position.y, actor.position.z, actor.yaw, ctx.is_ready()
    )
    .ok();
    writeln!(out, "Pickups: {}", ctx.pickups().len()).ok();
    let hazard = ctx.hazard();
    writeln!(
        out,
        "Hazard: intensity={:.2} color=({:.2}, {:.2}, {:.2})",
        hazard.intensity, hazard.color.x, hazard.color.y, hazard.color.z
    )
    .ok();
    writeln!(out, "Input: {:?} touch={}", ctx.input(), ctx.touch_detected()).ok();
    for kind in AssetKind::ALL {
        writeln!(out, "  {kind:?}: {:?}", ctx.assets().status(kind)).ok();
    }
    out
}

/// Write a debug dump when the `dump_debug` key is pressed.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    query_entities: Query<Entity>,
    meshes: Res<Assets<Mesh>>,
    materials: Res<Assets<StandardMaterial>>,
    images: Res<Assets<Image>>,
    ctx: Option<Res<GameContext>>,
) {
    if !keys.just_pressed(settings.controls.key_for("dump_debug", KeyCode::F3)) {
        return;
    }

    let now = SystemTime::now();
    let ts_secs = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let dt: DateTime<Utc> = DateTime::from(now);
    let human_ts = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    let fname = format!("{DUMP_DIR}/debug-{ts_secs}.txt");

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let mut sys = System::new_all();
    sys.refresh_all();
    let proc = sys.process(Pid::from(std::process::id() as usize));
    let proc_mem_kb = proc.map(|p| p.memory()).unwrap_or(0);

    let mut out = String::new();
    writeln!(out, "Timestamp: {human_ts} (epoch secs: {ts_secs})").ok();
    writeln!(out, "FPS: {fps:.1}, frame_time: {:.4} ms", frame_time * 1000.0).ok();
    writeln!(out, "Entities: {}", query_entities.iter().count()).ok();
    writeln!(
        out,
        "Assets: meshes={} materials={} images={}",
        meshes.len(),
        materials.len(),
        images.len()
    )
    .ok();
    writeln!(out, "Process memory: {}", kb_to_mb(proc_mem_kb)).ok();
    writeln!(out).ok();
    match ctx {
        Some(ctx) => out.push_str(&game_snapshot(&ctx)),
        None => out.push_str("(no game context)\n"),
    }

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GameEvent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn snapshot_mentions_session_and_assets() {
        let mut ctx = GameContext::new(Settings::default(), StdRng::seed_from_u64(3));
        ctx.dispatch(GameEvent::StartRequested);
        let text = game_snapshot(&ctx);
        assert!(text.contains("Session: Active remaining=60s score=0"));
        assert!(text.contains("Pickups: 50"));
        assert!(text.contains("Model: Pending"));
    }
}
