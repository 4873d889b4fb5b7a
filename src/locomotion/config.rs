//! Tuning values for the locomotion controller.
//!
//! `LocomotionConfig` lives in the `movement` section of the settings RON file
//! and is hot-reloadable. Every field has a serde default so partial files
//! are fine. Call `validate` before handing a config to a controller: an
//! invalid config is a startup error, not something the per-frame code guards.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a `LocomotionConfig` is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("movement.{field} must be a finite positive number (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("movement.{field} must be finite and not negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("movement speeds must satisfy crouch < walk < sprint (got {crouch} / {walk} / {sprint})")]
    SpeedOrder { crouch: f32, walk: f32, sprint: f32 },
    #[error("movement.{field} must be in {range} (got {value})")]
    OutOfRange { field: &'static str, range: &'static str, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    #[serde(default = "LocomotionConfig::default_walk_speed")]
    pub walk_speed: f32, // Target speed while grounded with no modifier held.
    #[serde(default = "LocomotionConfig::default_sprint_speed")]
    pub sprint_speed: f32, // Target speed while grounded and sprint held.
    #[serde(default = "LocomotionConfig::default_slide_speed")]
    pub slide_speed: f32, // Target speed for the sliding state (no transition reaches it yet).
    #[serde(default = "LocomotionConfig::default_crouch_speed")]
    pub crouch_speed: f32, // Target speed while crouched.
    #[serde(default = "LocomotionConfig::default_air_multiplier")]
    pub air_multiplier: f32, // Fraction of the ground force applied while airborne.

    #[serde(default = "LocomotionConfig::default_jump_force")]
    pub jump_force: f32, // Upward impulse applied on jump.
    #[serde(default = "LocomotionConfig::default_jump_cooldown")]
    pub jump_cooldown: f32, // Seconds before another jump is allowed.
    #[serde(default = "LocomotionConfig::default_reset_y_velocity_on_jump")]
    pub reset_y_velocity_on_jump: bool, // Zero vertical velocity before the jump impulse.

    #[serde(default = "LocomotionConfig::default_crouch_height_fraction")]
    pub crouch_height_fraction: f32, // Crouch height as a fraction of the standing height scale.
    #[serde(default = "LocomotionConfig::default_crouch_stick_impulse")]
    pub crouch_stick_impulse: f32, // Downward impulse keeping the body grounded when it shrinks.

    #[serde(default = "LocomotionConfig::default_player_height")]
    pub player_height: f32, // Standing body height, used for ground ray lengths.
    #[serde(default = "LocomotionConfig::default_ground_skin")]
    pub ground_skin: f32, // Extra ray length past the feet for the grounded check.
    #[serde(default = "LocomotionConfig::default_slope_skin")]
    pub slope_skin: f32, // Extra ray length past the feet for the slope check.
    #[serde(default = "LocomotionConfig::default_ground_drag")]
    pub ground_drag: f32, // Linear damping while grounded.

    #[serde(default = "LocomotionConfig::default_max_slope_angle")]
    pub max_slope_angle: f32, // Degrees. Steeper surfaces are not treated as walkable slopes.

    #[serde(default = "LocomotionConfig::default_speed_smoothing_threshold")]
    pub speed_smoothing_threshold: f32, // Desired-speed jumps above this are interpolated.
    #[serde(default = "LocomotionConfig::default_ground_force_multiplier")]
    pub ground_force_multiplier: f32,
    #[serde(default = "LocomotionConfig::default_slope_force_multiplier")]
    pub slope_force_multiplier: f32,
    #[serde(default = "LocomotionConfig::default_slope_stick_force")]
    pub slope_stick_force: f32, // Downward force on a slope while moving upward.
}

impl LocomotionConfig {
    fn default_walk_speed() -> f32 { 7.0 }
    fn default_sprint_speed() -> f32 { 10.0 }
    fn default_slide_speed() -> f32 { 20.0 }
    fn default_crouch_speed() -> f32 { 3.5 }
    fn default_air_multiplier() -> f32 { 0.4 }
    fn default_jump_force() -> f32 { 12.0 }
    fn default_jump_cooldown() -> f32 { 0.25 }
    fn default_reset_y_velocity_on_jump() -> bool { true }
    fn default_crouch_height_fraction() -> f32 { 0.5 }
    fn default_crouch_stick_impulse() -> f32 { 5.0 }
    fn default_player_height() -> f32 { 2.0 }
    fn default_ground_skin() -> f32 { 0.2 }
    fn default_slope_skin() -> f32 { 0.3 }
    fn default_ground_drag() -> f32 { 5.0 }
    fn default_max_slope_angle() -> f32 { 40.0 }
    fn default_speed_smoothing_threshold() -> f32 { 4.0 }
    fn default_ground_force_multiplier() -> f32 { 10.0 }
    fn default_slope_force_multiplier() -> f32 { 20.0 }
    fn default_slope_stick_force() -> f32 { 80.0 }

    /// Half the standing height; ground rays start at the body centre.
    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.player_height * 0.5
    }

    /// Check every field for values the controller cannot work with.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found. Fields are checked in
    /// declaration order, then the speed ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("slide_speed", self.slide_speed),
            ("crouch_speed", self.crouch_speed),
            ("jump_force", self.jump_force),
            ("jump_cooldown", self.jump_cooldown),
            ("player_height", self.player_height),
            ("speed_smoothing_threshold", self.speed_smoothing_threshold),
            ("ground_force_multiplier", self.ground_force_multiplier),
            ("slope_force_multiplier", self.slope_force_multiplier),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("crouch_stick_impulse", self.crouch_stick_impulse),
            ("ground_skin", self.ground_skin),
            ("slope_skin", self.slope_skin),
            ("ground_drag", self.ground_drag),
            ("slope_stick_force", self.slope_stick_force),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !(self.air_multiplier > 0.0 && self.air_multiplier <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "air_multiplier",
                range: "(0, 1]",
                value: self.air_multiplier,
            });
        }
        if !(self.crouch_height_fraction > 0.0 && self.crouch_height_fraction <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "crouch_height_fraction",
                range: "(0, 1]",
                value: self.crouch_height_fraction,
            });
        }
        if !(self.max_slope_angle > 0.0 && self.max_slope_angle < 90.0) {
            return Err(ConfigError::OutOfRange {
                field: "max_slope_angle",
                range: "(0, 90)",
                value: self.max_slope_angle,
            });
        }

        if !(self.crouch_speed < self.walk_speed && self.walk_speed < self.sprint_speed) {
            return Err(ConfigError::SpeedOrder {
                crouch: self.crouch_speed,
                walk: self.walk_speed,
                sprint: self.sprint_speed,
            });
        }

        Ok(())
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: Self::default_walk_speed(),
            sprint_speed: Self::default_sprint_speed(),
            slide_speed: Self::default_slide_speed(),
            crouch_speed: Self::default_crouch_speed(),
            air_multiplier: Self::default_air_multiplier(),
            jump_force: Self::default_jump_force(),
            jump_cooldown: Self::default_jump_cooldown(),
            reset_y_velocity_on_jump: Self::default_reset_y_velocity_on_jump(),
            crouch_height_fraction: Self::default_crouch_height_fraction(),
            crouch_stick_impulse: Self::default_crouch_stick_impulse(),
            player_height: Self::default_player_height(),
            ground_skin: Self::default_ground_skin(),
            slope_skin: Self::default_slope_skin(),
            ground_drag: Self::default_ground_drag(),
            max_slope_angle: Self::default_max_slope_angle(),
            speed_smoothing_threshold: Self::default_speed_smoothing_threshold(),
            ground_force_multiplier: Self::default_ground_force_multiplier(),
            slope_force_multiplier: Self::default_slope_force_multiplier(),
            slope_stick_force: Self::default_slope_stick_force(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LocomotionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let cfg: LocomotionConfig = ron::from_str("(walk_speed: 6.0, sprint_speed: 12.0)").unwrap();
        assert_eq!(cfg.walk_speed, 6.0);
        assert_eq!(cfg.sprint_speed, 12.0);
        assert_eq!(cfg.crouch_speed, 3.5);
        assert_eq!(cfg.max_slope_angle, 40.0);
    }

    #[test]
    fn speed_order_is_enforced() {
        let cfg = LocomotionConfig { crouch_speed: 8.0, ..LocomotionConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::SpeedOrder { .. })));
    }

    #[test]
    fn nan_speed_is_rejected() {
        let cfg = LocomotionConfig { walk_speed: f32::NAN, ..LocomotionConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive { field: "walk_speed", .. })
        ));
    }

    #[test]
    fn slope_limit_must_be_below_vertical() {
        let cfg = LocomotionConfig { max_slope_angle: 90.0, ..LocomotionConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "max_slope_angle", .. })
        ));
    }

    #[test]
    fn air_multiplier_above_one_is_rejected() {
        let cfg = LocomotionConfig { air_multiplier: 1.5, ..LocomotionConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
