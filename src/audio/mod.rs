//! Background music: one looping track, restarted per round and paused at the end.
use bevy::audio::{AudioSinkPlayback, PlaybackMode, Volume};
use bevy::prelude::*;

use crate::assets::{AssetStatus, GameAssets};
use crate::context::{AssetKind, GameContext, GameSignal};

/// Marks the entity currently playing the music track.
#[derive(Component)]
pub struct Music;

/// Looping playback at the configured volume.
#[must_use]
pub fn music_playback(volume: f32) -> PlaybackSettings {
    PlaybackSettings {
        mode: PlaybackMode::Loop,
        volume: Volume::new(volume.clamp(0.0, 1.0)),
        ..default()
    }
}

/// React to session edges: restart on start, pause on end, resume on first touch.
#[allow(clippy::needless_pass_by_value)]
pub fn drive_music(
    mut commands: Commands,
    ctx: Res<GameContext>,
    assets: Option<Res<GameAssets>>,
    mut signals: EventReader<GameSignal>,
    playing: Query<Entity, With<Music>>,
    sinks: Query<&AudioSink, With<Music>>,
) {
    for signal in signals.read() {
        match signal {
            GameSignal::SessionStarted => {
                // Respawning is the only way to rewind a bevy sink.
                for entity in &playing {
                    commands.entity(entity).despawn_recursive();
                }
                let Some(assets) = assets.as_ref() else { continue };
                if ctx.assets().status(AssetKind::Music) == AssetStatus::Failed {
                    warn!("music unavailable, starting round without sound");
                    continue;
                }
                commands.spawn((
                    AudioBundle {
                        source: assets.music.clone(),
                        settings: music_playback(ctx.settings().audio.music_volume),
                    },
                    Music,
                ));
            }
            GameSignal::SessionEnded { .. } => {
                for sink in &sinks {
                    sink.pause();
                }
            }
            GameSignal::TouchDetected => {
                if ctx.session().is_active() {
                    for sink in sinks.iter().filter(|s| s.is_paused()) {
                        sink.play();
                    }
                }
            }
            GameSignal::ClipChanged(_) | GameSignal::ModelReady => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_loops_and_clamps_volume() {
        let s = music_playback(0.5);
        assert!(matches!(s.mode, PlaybackMode::Loop));
        assert!((s.volume.get() - 0.5).abs() < f32::EPSILON);
        assert!((music_playback(4.0).volume.get() - 1.0).abs() < f32::EPSILON);
        assert!(!s.paused);
    }

    #[test]
    fn new_round_drops_previous_track() {
        use crate::settings::Settings;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut app = App::new();
        app.add_event::<GameSignal>()
            .insert_resource(GameContext::new(Settings::default(), StdRng::seed_from_u64(4)))
            .add_systems(Update, drive_music);
        app.world_mut().spawn(Music);

        app.world_mut().send_event(GameSignal::SessionStarted);
        app.update();

        let mut music = app.world_mut().query_filtered::<Entity, With<Music>>();
        assert_eq!(music.iter(app.world()).count(), 0);
    }
}
