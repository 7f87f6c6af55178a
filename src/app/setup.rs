//! Startup system: requests every asset and spawns the static scene.
//!
//! Runs once at `Startup`. Nothing here waits for loads to finish; readiness is
//! reported later by `watch_asset_loads` and the scene fills in as handles resolve.
use bevy::asset::AssetServer;
use bevy::gltf::GltfAssetLabel;
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::camera::PerspectiveProjection;
use meteorfall::actor::{ActorModel, FollowCamera};
use meteorfall::animation::ActorGltf;
use meteorfall::assets::GameAssets;
use meteorfall::context::GameContext;
use meteorfall::hazard::HazardLamp;
use meteorfall::pickup::PickupAssets;
use meteorfall::settings::Settings;
use meteorfall::ui::spawn_hud;

/// Radius of the inside-out sphere carrying the panorama.
const BACKGROUND_RADIUS: f32 = 500.0;

/// Request assets and spawn ground, background, lights, camera, creature and HUD.
///
/// # Arguments
/// - `commands`: spawns entities and inserts `GameAssets`, `ActorGltf`, `PickupAssets`.
/// - `asset_server`: starts the background loads.
/// - `meshes` / `materials`: storage for the procedural meshes.
/// - `settings`: paths, sizes and camera parameters.
/// - `ctx`: initial creature pose and light level.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
    ctx: Res<GameContext>,
) {
    let assets = GameAssets {
        model: asset_server.load(settings.actor.model_path.clone()),
        ground: asset_server.load(settings.graphics.ground_texture.clone()),
        pickup: asset_server.load(settings.pickups.texture.clone()),
        background: asset_server.load(settings.graphics.background_texture.clone()),
        music: asset_server.load(settings.audio.music_path.clone()),
    };
    info!("requested assets: model='{}' music='{}'", settings.actor.model_path, settings.audio.music_path);

    // Ground
    let size = settings.arena.size;
    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(size, size)),
        material: materials.add(StandardMaterial {
            base_color_texture: Some(assets.ground.clone()),
            uv_transform: Affine2::from_scale(Vec2::splat(settings.graphics.ground_repeat)),
            perceptual_roughness: 0.9,
            ..default()
        }),
        transform: Transform::from_xyz(0.0, settings.arena.ground_offset, 0.0),
        ..default()
    });

    // Background panorama, seen from inside.
    commands.spawn(PbrBundle {
        mesh: meshes.add(Sphere::new(BACKGROUND_RADIUS).mesh().uv(60, 40)),
        material: materials.add(StandardMaterial {
            base_color_texture: Some(assets.background.clone()),
            unlit: true,
            cull_mode: None,
            ..default()
        }),
        transform: Transform::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
        ..default()
    });

    let [w, h, d] = settings.pickups.size;
    commands.insert_resource(PickupAssets {
        mesh: meshes.add(Cuboid::new(w, h, d)),
        material: materials.add(StandardMaterial {
            base_color_texture: Some(assets.pickup.clone()),
            ..default()
        }),
    });

    let hazard = ctx.hazard();
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: hazard.intensity * settings.hazard.lux_per_unit,
                color: Color::srgb(hazard.color.x, hazard.color.y, hazard.color.z),
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_xyz(0.0, settings.hazard.light_height, 0.0)
                .looking_at(Vec3::ZERO, Vec3::Z),
            ..default()
        },
        HazardLamp,
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: settings.graphics.ambient_brightness,
    });

    let cam = settings.camera.clone();
    let mut camera = commands.spawn((
        Camera3dBundle {
            projection: Projection::Perspective(PerspectiveProjection {
                fov: cam.fov_degrees.to_radians(),
                near: cam.near,
                far: cam.far,
                ..default()
            }),
            transform: meteorfall::actor::follow_pose(ctx.actor(), cam.offset_vec()).transform(),
            ..default()
        },
        FollowCamera,
    ));
    if settings.atmosphere.enabled {
        camera.insert(bevy_atmosphere::prelude::AtmosphereCamera::default());
    }

    commands.spawn((
        SceneBundle {
            scene: asset_server.load(GltfAssetLabel::Scene(0).from_asset(settings.actor.model_path.clone())),
            transform: ctx.actor().transform(),
            ..default()
        },
        ActorModel,
    ));

    spawn_hud(&mut commands, ctx.session().remaining());

    commands.insert_resource(ActorGltf(assets.model.clone()));
    commands.insert_resource(assets);
}
