//! Force and velocity-limit math for the physics step.
//!
//! Pure functions so benches and tests can exercise the exact numbers the
//! controller hands to the body.
use bevy::prelude::*;

use super::config::LocomotionConfig;

/// Horizontal move direction from a yaw-only orientation and the input axis.
/// Not normalised: diagonal input is longer than one until a force is built.
#[must_use]
pub fn move_direction(orientation: Quat, move_axis: Vec2) -> Vec3 {
    let forward = orientation * Vec3::NEG_Z;
    let right = orientation * Vec3::X;
    forward * move_axis.y + right * move_axis.x
}

/// Project `direction` onto the plane with `normal` and normalise.
#[must_use]
pub fn slope_move_direction(direction: Vec3, normal: Vec3) -> Vec3 {
    direction.reject_from_normalized(normal.normalize_or_zero()).normalize_or_zero()
}

/// Where the body is, as far as force selection is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footing {
    /// On a walkable slope and not leaving it through a jump.
    Slope,
    Ground,
    Air,
}

impl Footing {
    #[must_use]
    pub fn from_sample(grounded: bool, on_slope: bool, exiting_slope: bool) -> Self {
        if on_slope && !exiting_slope {
            Footing::Slope
        } else if grounded {
            Footing::Ground
        } else {
            Footing::Air
        }
    }
}

/// The drive force for one physics step.
#[must_use]
pub fn move_force(
    footing: Footing,
    direction: Vec3,
    slope_normal: Vec3,
    speed: f32,
    config: &LocomotionConfig,
) -> Vec3 {
    match footing {
        Footing::Slope => {
            slope_move_direction(direction, slope_normal) * speed * config.slope_force_multiplier
        }
        Footing::Ground => direction.normalize_or_zero() * speed * config.ground_force_multiplier,
        Footing::Air => {
            direction.normalize_or_zero()
                * speed
                * config.ground_force_multiplier
                * config.air_multiplier
        }
    }
}

/// Limit velocity to `speed`.
///
/// On a slope the whole vector is limited. Elsewhere only the horizontal
/// part is, so gravity and jumps keep their vertical component.
#[must_use]
pub fn clamp_velocity(footing: Footing, velocity: Vec3, speed: f32) -> Vec3 {
    if footing == Footing::Slope {
        if velocity.length() > speed {
            return velocity.normalize_or_zero() * speed;
        }
        return velocity;
    }

    let flat = Vec3::new(velocity.x, 0.0, velocity.z);
    if flat.length() > speed {
        let limited = flat.normalize_or_zero() * speed;
        Vec3::new(limited.x, velocity.y, limited.z)
    } else {
        velocity
    }
}
