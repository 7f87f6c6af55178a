//! Meteor hazard: escalating light and the end-of-round camera shake.
//!
//! Everything here is pure math so it can be tested and benchmarked without a
//! running app. `sync_hazard_light` pushes the current value into the scene.
use bevy::prelude::*;
use rand::Rng;

use crate::context::GameContext;
use crate::settings::HazardSettings;

/// Marks the directional light that represents the incoming meteor.
#[derive(Component)]
pub struct HazardLamp;

/// Light state derived from round progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardLight {
    /// Scene-unit intensity, `base_intensity..=max_intensity`.
    pub intensity: f32,
    /// Linear RGB, each channel in `0..=1`.
    pub color: Vec3,
}

/// Compute the hazard light for `progress` (0 at round start, 1 at impact).
///
/// Intensity is a straight lerp from base to max. The color starts white and
/// loses green and blue as the red factor ramps up; the red factor saturates
/// at `red_cap` so the tint keeps deepening past the halfway point.
#[must_use]
pub fn compute_escalation(progress: f32, h: &HazardSettings) -> HazardLight {
    let p = progress.clamp(0.0, 1.0);
    let intensity = h.base_intensity + (h.max_intensity - h.base_intensity) * p;

    let red = (p * h.red_ramp).min(h.red_cap);
    let color = Vec3::new(
        1.0,
        (1.0 - red * h.green_falloff).clamp(0.0, 1.0),
        (1.0 - red * h.blue_falloff).clamp(0.0, 1.0),
    );

    HazardLight { intensity, color }
}

/// Shake magnitude for the time left, or `None` before the threshold.
#[must_use]
pub fn shake_magnitude(remaining_secs: f32, threshold_secs: f32, max: f32) -> Option<f32> {
    if threshold_secs <= 0.0 || remaining_secs >= threshold_secs {
        return None;
    }
    let remaining = remaining_secs.max(0.0);
    Some(max * (1.0 - remaining / threshold_secs))
}

/// Random per-axis camera offset. Each axis is `(u - bias) * magnitude` with
/// `u` uniform in `[0, 1)`; a bias above 0.5 skews the shake negative.
pub fn shake_offset(rng: &mut impl Rng, magnitude: f32, bias: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - bias) * magnitude,
        (rng.gen::<f32>() - bias) * magnitude,
        (rng.gen::<f32>() - bias) * magnitude,
    )
}

/// Push the context's hazard light into the directional light.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_hazard_light(ctx: Res<GameContext>, mut lamps: Query<&mut DirectionalLight, With<HazardLamp>>) {
    let light = ctx.hazard();
    let lux = light.intensity * ctx.settings().hazard.lux_per_unit;
    let color = Color::srgb(light.color.x, light.color.y, light.color.z);
    for mut lamp in &mut lamps {
        if (lamp.illuminance - lux).abs() > f32::EPSILON {
            lamp.illuminance = lux;
        }
        if lamp.color != color {
            lamp.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn intensity_endpoints_match_configuration() {
        let h = HazardSettings::default();
        let start = compute_escalation(0.0, &h);
        let end = compute_escalation(1.0, &h);
        assert!((start.intensity - h.base_intensity).abs() < 1e-6);
        assert!((end.intensity - h.max_intensity).abs() < 1e-6);
        assert_eq!(start.color, Vec3::ONE);
    }

    #[test]
    fn intensity_is_monotonic() {
        let h = HazardSettings::default();
        let mut last = f32::MIN;
        for i in 0..=60 {
            let v = compute_escalation(i as f32 / 60.0, &h).intensity;
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn color_turns_red_and_stays_in_range() {
        let h = HazardSettings::default();
        let half = compute_escalation(0.5, &h);
        assert!((half.color.y - 0.3).abs() < 1e-5);
        assert!((half.color.z - 0.1).abs() < 1e-5);
        let end = compute_escalation(1.0, &h);
        assert_eq!(end.color.x, 1.0);
        assert_eq!(end.color.y, 0.0);
        assert_eq!(end.color.z, 0.0);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let h = HazardSettings::default();
        assert_eq!(compute_escalation(-1.0, &h), compute_escalation(0.0, &h));
        assert_eq!(compute_escalation(3.0, &h), compute_escalation(1.0, &h));
    }

    #[test]
    fn shake_starts_below_threshold_and_grows() {
        assert_eq!(shake_magnitude(15.0, 15.0, 0.05), None);
        assert_eq!(shake_magnitude(40.0, 15.0, 0.05), None);
        let early = shake_magnitude(14.0, 15.0, 0.05).expect("below threshold");
        let late = shake_magnitude(1.0, 15.0, 0.05).expect("below threshold");
        assert!(late > early);
        assert!((shake_magnitude(0.0, 15.0, 0.05).expect("zero") - 0.05).abs() < 1e-6);
    }

    #[test]
    fn shake_offset_is_bounded_and_skewed() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sum = Vec3::ZERO;
        for _ in 0..2_000 {
            let o = shake_offset(&mut rng, 0.05, 0.7);
            for c in o.to_array() {
                assert!(c >= -0.7 * 0.05 - 1e-6 && c < 0.3 * 0.05 + 1e-6);
            }
            sum += o;
        }
        assert!(sum.x < 0.0 && sum.y < 0.0 && sum.z < 0.0);
    }
}
