//! Ground and slope sensing from two downward rays.
use bevy::prelude::*;

use super::body::GroundCaster;
use super::config::LocomotionConfig;
use super::state::GroundSample;

/// Angle in degrees between `normal` and world up.
#[must_use]
pub fn slope_angle(normal: Vec3) -> f32 {
    normal.normalize_or_zero().dot(Vec3::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// A surface counts as a slope strictly between flat and `max_angle`.
#[must_use]
pub fn is_walkable_slope(angle: f32, max_angle: f32) -> bool {
    angle > 0.0 && angle < max_angle
}

/// Sample the ground under a body centred at `origin`.
///
/// The grounded ray reaches `half_height + ground_skin`. A second, slightly
/// longer ray (`half_height + slope_skin`) provides the surface normal for
/// the slope test. No hit on the slope ray means "not on a slope".
#[must_use]
pub fn sense_ground(caster: &impl GroundCaster, origin: Vec3, config: &LocomotionConfig) -> GroundSample {
    let half = config.half_height();
    let grounded = caster.cast_down(origin, half + config.ground_skin).is_some();

    match caster.cast_down(origin, half + config.slope_skin) {
        Some(hit) => GroundSample {
            grounded,
            on_slope: is_walkable_slope(slope_angle(hit.normal), config.max_slope_angle),
            slope_normal: hit.normal,
        },
        None => GroundSample { grounded, ..GroundSample::AIRBORNE },
    }
}
