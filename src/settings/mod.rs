//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`). Every section
//! and field has a default so a partial file only overrides what it names.
use bevy::prelude::{KeyCode, Resource, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Size of the playable ground and the ranges derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSettings {
    #[serde(default = "ArenaSettings::default_size")]
    pub size: f32, // Side length of the square ground plane.
    #[serde(default = "ArenaSettings::default_half_extent")]
    pub half_extent: f32, // Actor x/z are clamped into +-half_extent.
    #[serde(default = "ArenaSettings::default_spawn_extent")]
    pub spawn_extent: f32, // Pickups spawn within +-spawn_extent/2 on x and z.
    #[serde(default = "ArenaSettings::default_ground_offset")]
    pub ground_offset: f32, // Height of the ground plane below the actor's feet.
}

impl ArenaSettings {
    fn default_size() -> f32 { 40.0 }
    fn default_half_extent() -> f32 { 19.5 }
    fn default_spawn_extent() -> f32 { 36.0 }
    fn default_ground_offset() -> f32 { -0.15 }
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            half_extent: Self::default_half_extent(),
            spawn_extent: Self::default_spawn_extent(),
            ground_offset: Self::default_ground_offset(),
        }
    }
}

/// Creature tuning: speeds are per rendered frame, not per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSettings {
    #[serde(default = "ActorSettings::default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "ActorSettings::default_touch_move_speed")]
    pub touch_move_speed: f32, // Used once a touch has been seen.
    #[serde(default = "ActorSettings::default_rotation_speed")]
    pub rotation_speed: f32, // Radians per frame.
    #[serde(default = "ActorSettings::default_scale")]
    pub scale: f32,
    #[serde(default = "ActorSettings::default_model_path")]
    pub model_path: String,
    #[serde(default = "ActorSettings::default_movement_keywords")]
    pub movement_clip_keywords: Vec<String>,
    #[serde(default = "ActorSettings::default_idle_keywords")]
    pub idle_clip_keywords: Vec<String>,
}

impl ActorSettings {
    fn default_move_speed() -> f32 { 0.05 }
    fn default_touch_move_speed() -> f32 { 0.08 }
    fn default_rotation_speed() -> f32 { 0.02 }
    fn default_scale() -> f32 { 0.3 }
    fn default_model_path() -> String { "models/creature.glb".to_string() }
    fn default_movement_keywords() -> Vec<String> { vec!["walk".to_string(), "run".to_string()] }
    fn default_idle_keywords() -> Vec<String> { vec!["idle".to_string(), "rest".to_string()] }
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            move_speed: Self::default_move_speed(),
            touch_move_speed: Self::default_touch_move_speed(),
            rotation_speed: Self::default_rotation_speed(),
            scale: Self::default_scale(),
            model_path: Self::default_model_path(),
            movement_clip_keywords: Self::default_movement_keywords(),
            idle_clip_keywords: Self::default_idle_keywords(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupSettings {
    #[serde(default = "PickupSettings::default_count")]
    pub count: usize, // Size of the active pickup set.
    #[serde(default = "PickupSettings::default_collect_radius")]
    pub collect_radius: f32,
    #[serde(default = "PickupSettings::default_size")]
    pub size: [f32; 3],
    #[serde(default = "PickupSettings::default_texture")]
    pub texture: String,
}

impl PickupSettings {
    fn default_count() -> usize { 50 }
    fn default_collect_radius() -> f32 { 0.4 }
    fn default_size() -> [f32; 3] { [0.5, 0.1, 0.5] }
    fn default_texture() -> String { "textures/meat.jpg".to_string() }
}

impl Default for PickupSettings {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            collect_radius: Self::default_collect_radius(),
            size: Self::default_size(),
            texture: Self::default_texture(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "SessionSettings::default_duration")]
    pub duration_secs: u32, // Countdown length; changes apply at the next start.
    #[serde(default = "SessionSettings::default_tick")]
    pub tick_seconds: f32, // Wall-clock length of one countdown step.
}

impl SessionSettings {
    fn default_duration() -> u32 { 60 }
    fn default_tick() -> f32 { 1.0 }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: Self::default_duration(),
            tick_seconds: Self::default_tick(),
        }
    }
}

/// Escalating meteor light and end-of-round camera shake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardSettings {
    #[serde(default = "HazardSettings::default_base_intensity")]
    pub base_intensity: f32,
    #[serde(default = "HazardSettings::default_max_intensity")]
    pub max_intensity: f32,
    #[serde(default = "HazardSettings::default_lux_per_unit")]
    pub lux_per_unit: f32, // Converts intensity into directional light illuminance.
    #[serde(default = "HazardSettings::default_red_ramp")]
    pub red_ramp: f32,
    #[serde(default = "HazardSettings::default_red_cap")]
    pub red_cap: f32,
    #[serde(default = "HazardSettings::default_green_falloff")]
    pub green_falloff: f32,
    #[serde(default = "HazardSettings::default_blue_falloff")]
    pub blue_falloff: f32,
    #[serde(default = "HazardSettings::default_light_height")]
    pub light_height: f32,
    #[serde(default = "HazardSettings::default_shake_threshold")]
    pub shake_threshold_secs: f32, // Shake starts once fewer seconds than this remain.
    #[serde(default = "HazardSettings::default_shake_max")]
    pub shake_max: f32,
    #[serde(default = "HazardSettings::default_shake_bias")]
    pub shake_bias: f32, // Subtracted from a uniform [0,1) draw; 0.5 would be unbiased.
}

impl HazardSettings {
    fn default_base_intensity() -> f32 { 0.2 }
    fn default_max_intensity() -> f32 { 9.0 }
    fn default_lux_per_unit() -> f32 { 1_000.0 }
    fn default_red_ramp() -> f32 { 2.0 }
    fn default_red_cap() -> f32 { 1.5 }
    fn default_green_falloff() -> f32 { 0.7 }
    fn default_blue_falloff() -> f32 { 0.9 }
    fn default_light_height() -> f32 { 15.0 }
    fn default_shake_threshold() -> f32 { 15.0 }
    fn default_shake_max() -> f32 { 0.05 }
    fn default_shake_bias() -> f32 { 0.7 }
}

impl Default for HazardSettings {
    fn default() -> Self {
        Self {
            base_intensity: Self::default_base_intensity(),
            max_intensity: Self::default_max_intensity(),
            lux_per_unit: Self::default_lux_per_unit(),
            red_ramp: Self::default_red_ramp(),
            red_cap: Self::default_red_cap(),
            green_falloff: Self::default_green_falloff(),
            blue_falloff: Self::default_blue_falloff(),
            light_height: Self::default_light_height(),
            shake_threshold_secs: Self::default_shake_threshold(),
            shake_max: Self::default_shake_max(),
            shake_bias: Self::default_shake_bias(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_offset")]
    pub offset: [f32; 3], // Follow offset in the actor's local frame.
    #[serde(default = "CameraSettings::default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "CameraSettings::default_near")]
    pub near: f32,
    #[serde(default = "CameraSettings::default_far")]
    pub far: f32,
}

impl CameraSettings {
    fn default_offset() -> [f32; 3] { [0.0, 2.0, -2.0] }
    fn default_fov() -> f32 { 75.0 }
    fn default_near() -> f32 { 0.1 }
    fn default_far() -> f32 { 1_000.0 }

    #[must_use]
    pub fn offset_vec(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            offset: Self::default_offset(),
            fov_degrees: Self::default_fov(),
            near: Self::default_near(),
            far: Self::default_far(),
        }
    }
}

/// Background music settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    #[serde(default = "AudioSettings::default_music_path")]
    pub music_path: String,
    #[serde(default = "AudioSettings::default_music_volume")]
    pub music_volume: f32, // Fixed for the whole session.
}

impl AudioSettings {
    fn default_music_path() -> String { "audio/music.ogg".to_string() }
    fn default_music_volume() -> f32 { 0.5 }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_path: Self::default_music_path(),
            music_volume: Self::default_music_volume(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
    #[serde(default)]
    pub always_show_touch_controls: bool, // Show the on-screen arrows before any touch is seen.
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("forward".to_string(), "ArrowUp".to_string());
        m.insert("back".to_string(), "ArrowDown".to_string());
        m.insert("left".to_string(), "ArrowLeft".to_string());
        m.insert("right".to_string(), "ArrowRight".to_string());
        m.insert("dump_debug".to_string(), "F3".to_string());
        m
    }

    /// Resolve an action to its bound key, falling back to `default`.
    #[must_use]
    pub fn key_for(&self, action: &str, default: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            keybinds: Self::default_keybinds(),
            always_show_touch_controls: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Enable vertical sync to cap FPS to the display refresh rate.
    #[serde(default = "GraphicsSettings::default_ambient_brightness")]
    pub ambient_brightness: f32,
    #[serde(default = "GraphicsSettings::default_ground_texture")]
    pub ground_texture: String,
    #[serde(default = "GraphicsSettings::default_ground_repeat")]
    pub ground_repeat: f32, // How many times the ground texture tiles per side.
    #[serde(default = "GraphicsSettings::default_background")]
    pub background_texture: String, // Equirectangular panorama.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
    fn default_ambient_brightness() -> f32 { 400.0 }
    fn default_ground_texture() -> String { "textures/grass.jpg".to_string() }
    fn default_ground_repeat() -> f32 { 10.0 }
    fn default_background() -> String { "textures/background.jpg".to_string() }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            vsync: Self::default_vsync(),
            ambient_brightness: Self::default_ambient_brightness(),
            ground_texture: Self::default_ground_texture(),
            ground_repeat: Self::default_ground_repeat(),
            background_texture: Self::default_background(),
        }
    }
}

/// Procedural sky drawn behind the panorama (visible if the panorama fails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereSettings {
    #[serde(default = "AtmosphereSettings::default_enabled")]
    pub enabled: bool, // Requires a restart to take effect.
    #[serde(default = "AtmosphereSettings::default_resolution")]
    pub resolution: u32, // Resolution of each skybox face (Auto update at runtime)
    #[serde(default = "AtmosphereSettings::default_dithering")]
    pub dithering: bool,
}

impl AtmosphereSettings {
    fn default_enabled() -> bool { true }
    fn default_resolution() -> u32 { 256 }
    fn default_dithering() -> bool { true }
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            resolution: Self::default_resolution(),
            dithering: Self::default_dithering(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub arena: ArenaSettings,
    #[serde(default)]
    pub actor: ActorSettings,
    #[serde(default)]
    pub pickups: PickupSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub hazard: HazardSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub atmosphere: AtmosphereSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Parse a key identifier as written in the keybinds map.
    ///
    /// Accepts the browser-style names (`ArrowUp`, `KeyW`) as well as short
    /// forms (`UP`, `W`). Matching is case-insensitive.
    #[must_use]
    pub fn keycode_from_str(s: &str) -> Option<KeyCode> {
        let upper = s.trim().to_ascii_uppercase();
        let key = upper.strip_prefix("KEY").filter(|k| k.len() == 1).unwrap_or(upper.as_str());
        Some(match key {
            "ARROWUP" | "UP" => KeyCode::ArrowUp,
            "ARROWDOWN" | "DOWN" => KeyCode::ArrowDown,
            "ARROWLEFT" | "LEFT" => KeyCode::ArrowLeft,
            "ARROWRIGHT" | "RIGHT" => KeyCode::ArrowRight,
            "W" => KeyCode::KeyW,
            "A" => KeyCode::KeyA,
            "S" => KeyCode::KeyS,
            "D" => KeyCode::KeyD,
            "I" => KeyCode::KeyI,
            "J" => KeyCode::KeyJ,
            "K" => KeyCode::KeyK,
            "L" => KeyCode::KeyL,
            "SPACE" => KeyCode::Space,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "NUMPAD8" | "KP_8" => KeyCode::Numpad8,
            "NUMPAD2" | "KP_2" => KeyCode::Numpad2,
            "NUMPAD4" | "KP_4" => KeyCode::Numpad4,
            "NUMPAD6" | "KP_6" => KeyCode::Numpad6,
            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_settings_parse() {
        let s: Settings = ron::from_str(include_str!("../../data/settings/settings.ron"))
            .expect("parse data/settings/settings.ron");
        assert_eq!(s.pickups.count, 50);
        assert_eq!(s.session.duration_secs, 60);
        assert_eq!(s.controls.key_for("forward", KeyCode::KeyW), KeyCode::ArrowUp);
        assert!((s.hazard.shake_bias - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s: Settings = ron::from_str("(pickups: (count: 10), hazard: (shake_bias: 0.5))")
            .expect("parse partial settings");
        assert_eq!(s.pickups.count, 10);
        assert!((s.pickups.collect_radius - 0.4).abs() < f32::EPSILON);
        assert!((s.hazard.shake_bias - 0.5).abs() < f32::EPSILON);
        assert_eq!(s.session.duration_secs, 60);
        assert!((s.arena.half_extent - 19.5).abs() < f32::EPSILON);
    }

    #[test]
    fn keycode_names() {
        assert_eq!(Settings::keycode_from_str("ArrowUp"), Some(KeyCode::ArrowUp));
        assert_eq!(Settings::keycode_from_str("keyw"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("w"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("nonsense"), None);
    }

    #[test]
    fn missing_binding_uses_default() {
        let mut controls = ControlsSettings::default();
        controls.keybinds.remove("left");
        assert_eq!(controls.key_for("left", KeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(controls.key_for("forward", KeyCode::KeyW), KeyCode::ArrowUp);
    }
}
