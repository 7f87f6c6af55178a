use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use bevy_atmosphere::prelude::*;
use meteorfall::actor::{apply_viewport, follow_camera, sync_actor_transform};
use meteorfall::animation::{attach_animation_graph, play_actor_clip, prepare_actor_animations};
use meteorfall::assets::watch_asset_loads;
use meteorfall::audio::drive_music;
use meteorfall::context::{
    countdown_clock, dispatch_game_events, frame_clock, sync_context_settings, CountdownClock,
    GameContext, GameEvent, GameSignal,
};
use meteorfall::debug::DebugDumpPlugin;
use meteorfall::hazard::sync_hazard_light;
use meteorfall::input::{
    capture_first_touch, capture_keyboard, capture_resize, capture_start_button,
    capture_touch_controls,
};
use meteorfall::pickup::sync_pickup_entities;
use meteorfall::settings::loader as settings_loader;
use meteorfall::ui::{update_hud, update_session_ui};

mod app;
use app::{
    ensure_ground_sampler, setup, sync_ambient_settings, sync_atmosphere_settings,
    sync_vsync_settings,
};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|e| {
            eprintln!("settings hot reload disabled: {e}");
            settings_loader::SettingsWatcher::stub()
        });

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Meteorfall".to_string(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: crate::app::display::present_mode(settings.graphics.vsync),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(FrameTimeDiagnosticsPlugin)
    .add_plugins(LogDiagnosticsPlugin::default())
    .add_plugins(DebugDumpPlugin);

    if settings.atmosphere.enabled {
        app.add_plugins(AtmospherePlugin)
            .insert_resource(AtmosphereModel::default())
            .insert_resource(AtmosphereSettings {
                resolution: settings.atmosphere.resolution,
                dithering: settings.atmosphere.dithering,
                ..Default::default()
            });
        app.add_systems(Update, sync_atmosphere_settings);
    }

    app.add_event::<GameEvent>();
    app.add_event::<GameSignal>();
    app.insert_resource(CountdownClock::new(settings.session.tick_seconds));
    app.insert_resource(GameContext::from_settings(settings.clone()));
    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, setup);

    // Producers feed the context; presentation reads it after dispatch.
    app.add_systems(
        Update,
        (
            (
                capture_keyboard,
                capture_touch_controls,
                capture_start_button,
                capture_first_touch,
                capture_resize,
                watch_asset_loads,
                countdown_clock,
                frame_clock,
            )
                .chain(),
            dispatch_game_events,
            (
                sync_actor_transform,
                follow_camera,
                apply_viewport,
                sync_pickup_entities,
                sync_hazard_light,
                update_hud,
                update_session_ui,
                prepare_actor_animations,
                attach_animation_graph,
                play_actor_clip,
                drive_music,
            )
                .chain(),
        )
            .chain(),
    );

    app.add_systems(
        Update,
        (
            settings_loader::check_settings_changes,
            sync_context_settings,
            sync_vsync_settings,
            sync_ambient_settings,
            ensure_ground_sampler,
        )
            .chain()
            .before(dispatch_game_events),
    );

    app.run();
}
