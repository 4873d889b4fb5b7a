//! Locomotion states and the per-frame inputs they are selected from.
use bevy::prelude::*;

use super::config::LocomotionConfig;

/// Mutually exclusive movement state, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum LocomotionState {
    #[default]
    Walking,
    Sprinting,
    Crouching,
    /// Declared with its own target speed, but `select_state` never returns it.
    Sliding,
    Airborne,
}

impl LocomotionState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LocomotionState::Walking => "walking",
            LocomotionState::Sprinting => "sprinting",
            LocomotionState::Crouching => "crouching",
            LocomotionState::Sliding => "sliding",
            LocomotionState::Airborne => "airborne",
        }
    }
}

/// One frame's worth of player intent, read-only to the controller.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionIntent {
    /// Strafe (x) and forward (y) axis, each in `[-1, 1]`.
    pub move_axis: Vec2,
    pub jump_held: bool,
    pub sprint_held: bool,
    pub crouch_held: bool,
}

impl MotionIntent {
    /// Build an intent, clamping the move axis into the unit square.
    #[must_use]
    pub fn new(move_axis: Vec2, jump_held: bool, sprint_held: bool, crouch_held: bool) -> Self {
        Self {
            move_axis: move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            jump_held,
            sprint_held,
            crouch_held,
        }
    }
}

/// Result of the downward ground and slope rays for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSample {
    pub grounded: bool,
    pub on_slope: bool,
    /// Surface normal under the body; `Vec3::Y` when nothing was hit.
    pub slope_normal: Vec3,
}

impl GroundSample {
    pub const AIRBORNE: GroundSample = GroundSample {
        grounded: false,
        on_slope: false,
        slope_normal: Vec3::Y,
    };

    pub const FLAT: GroundSample = GroundSample {
        grounded: true,
        on_slope: false,
        slope_normal: Vec3::Y,
    };
}

impl Default for GroundSample {
    fn default() -> Self {
        Self::AIRBORNE
    }
}

/// Pick the state for this frame. First match wins:
/// crouching, sprinting, walking, then airborne.
#[must_use]
pub fn select_state(intent: &MotionIntent, ground: &GroundSample) -> LocomotionState {
    if intent.crouch_held && ground.grounded {
        LocomotionState::Crouching
    } else if ground.grounded && intent.sprint_held {
        LocomotionState::Sprinting
    } else if ground.grounded {
        LocomotionState::Walking
    } else {
        LocomotionState::Airborne
    }
}

/// Target speed for `state`, or `None` when the state keeps the previous target.
#[must_use]
pub fn desired_speed(state: LocomotionState, config: &LocomotionConfig) -> Option<f32> {
    match state {
        LocomotionState::Walking => Some(config.walk_speed),
        LocomotionState::Sprinting => Some(config.sprint_speed),
        LocomotionState::Crouching => Some(config.crouch_speed),
        LocomotionState::Sliding => Some(config.slide_speed),
        LocomotionState::Airborne => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(sprint: bool, crouch: bool) -> MotionIntent {
        MotionIntent::new(Vec2::Y, false, sprint, crouch)
    }

    #[test]
    fn airborne_ignores_modifiers() {
        for (sprint, crouch) in [(false, false), (true, false), (false, true), (true, true)] {
            assert_eq!(
                select_state(&intent(sprint, crouch), &GroundSample::AIRBORNE),
                LocomotionState::Airborne
            );
        }
    }

    #[test]
    fn crouch_beats_sprint() {
        assert_eq!(
            select_state(&intent(true, true), &GroundSample::FLAT),
            LocomotionState::Crouching
        );
    }

    #[test]
    fn grounded_sprint_targets_sprint_speed() {
        let cfg = LocomotionConfig::default();
        let state = select_state(&intent(true, false), &GroundSample::FLAT);
        assert_eq!(state, LocomotionState::Sprinting);
        assert_eq!(desired_speed(state, &cfg), Some(cfg.sprint_speed));
    }

    #[test]
    fn grounded_without_modifiers_walks() {
        assert_eq!(
            select_state(&intent(false, false), &GroundSample::FLAT),
            LocomotionState::Walking
        );
    }

    #[test]
    fn airborne_keeps_previous_target() {
        assert_eq!(desired_speed(LocomotionState::Airborne, &LocomotionConfig::default()), None);
    }

    #[test]
    fn move_axis_is_clamped() {
        let i = MotionIntent::new(Vec2::new(3.0, -2.0), false, false, false);
        assert_eq!(i.move_axis, Vec2::new(1.0, -1.0));
    }
}
