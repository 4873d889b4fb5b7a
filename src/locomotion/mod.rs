//! Locomotion state machine for a physics-driven first-person body.
//!
//! The controller is engine independent: it reads a `MotionIntent` and a
//! `GroundSample` each tick and talks to the body through the `PhysicsBody`
//! trait. It is driven on two cadences by whatever hosts it:
//!
//! - `on_frame` once per rendered frame: cooldowns, speed smoothing, jump,
//!   crouch, state selection and drag.
//! - `on_physics_step` once per fixed physics step: drive forces, gravity
//!   toggle and the speed clamp.
//!
//! # Example:
//!
//! ```
//! use bevy::prelude::*;
//! use stride::locomotion::{GroundSample, LocomotionConfig, LocomotionController, MotionIntent};
//! # use stride::locomotion::PhysicsBody;
//! # #[derive(Default)] struct Body { v: Vec3, scale: f32 }
//! # impl PhysicsBody for Body {
//! #     fn linear_velocity(&self) -> Vec3 { self.v }
//! #     fn set_linear_velocity(&mut self, v: Vec3) { self.v = v; }
//! #     fn add_force(&mut self, _: Vec3) {}
//! #     fn add_impulse(&mut self, _: Vec3) {}
//! #     fn set_linear_damping(&mut self, _: f32) {}
//! #     fn set_gravity_enabled(&mut self, _: bool) {}
//! #     fn height_scale(&self) -> f32 { self.scale }
//! #     fn set_height_scale(&mut self, s: f32) { self.scale = s; }
//! # }
//! let mut body = Body { v: Vec3::ZERO, scale: 1.0 };
//! let mut controller = LocomotionController::new(LocomotionConfig::default(), 1.0);
//! let intent = MotionIntent::new(Vec2::Y, false, true, false);
//!
//! controller.on_frame(1.0 / 60.0, intent, GroundSample::FLAT, &mut body);
//! controller.on_physics_step(Quat::IDENTITY, GroundSample::FLAT, &mut body);
//! assert_eq!(controller.current_speed(), 10.0);
//! ```
pub mod body;
pub mod config;
pub mod crouch;
pub mod forces;
pub mod ground;
pub mod jump;
pub mod speed;
pub mod state;

use bevy::prelude::*;

pub use body::{GroundCaster, PhysicsBody, RayHit};
pub use config::{ConfigError, LocomotionConfig};
pub use crouch::CrouchScale;
pub use forces::{clamp_velocity, move_direction, move_force, Footing};
pub use ground::sense_ground;
pub use jump::JumpGate;
pub use speed::SpeedTarget;
pub use state::{desired_speed, select_state, GroundSample, LocomotionState, MotionIntent};

/// Per-body locomotion state.
#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: LocomotionState,
    speed: SpeedTarget,
    jump: JumpGate,
    crouch: CrouchScale,
    ground: GroundSample,
    intent: MotionIntent,
}

impl LocomotionController {
    /// `base_height` is the body's standing height scale.
    #[must_use]
    pub fn new(config: LocomotionConfig, base_height: f32) -> Self {
        Self {
            state: LocomotionState::default(),
            speed: SpeedTarget::default(),
            jump: JumpGate::new(config.jump_cooldown),
            crouch: CrouchScale::new(base_height, config.crouch_height_fraction),
            ground: GroundSample::default(),
            intent: MotionIntent::default(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> LocomotionState {
        self.state
    }

    #[must_use]
    pub fn current_speed(&self) -> f32 {
        self.speed.current()
    }

    #[must_use]
    pub fn desired_speed(&self) -> f32 {
        self.speed.desired()
    }

    #[must_use]
    pub fn ground(&self) -> GroundSample {
        self.ground
    }

    #[must_use]
    pub fn jump_gate(&self) -> &JumpGate {
        &self.jump
    }

    #[must_use]
    pub fn crouch(&self) -> &CrouchScale {
        &self.crouch
    }

    /// Swap tuning values while keeping runtime state (hot reload).
    ///
    /// A crouched body is rescaled to the new crouch height, and any speed
    /// interpolation toward a target from the old values is dropped; the next
    /// frame retargets from the current speed.
    pub fn apply_config(&mut self, config: LocomotionConfig, body: &mut impl PhysicsBody) {
        self.jump.set_cooldown(config.jump_cooldown);
        self.crouch.set_fraction(config.crouch_height_fraction, body);
        self.speed.cancel();
        self.config = config;
    }

    /// Return every runtime field to its initial value.
    pub fn reset(&mut self) {
        let base = self.crouch.base_height();
        *self = Self::new(self.config.clone(), base);
    }

    /// Frame-cadence update.
    pub fn on_frame(
        &mut self,
        dt: f32,
        intent: MotionIntent,
        ground: GroundSample,
        body: &mut impl PhysicsBody,
    ) {
        self.intent = intent;
        self.ground = ground;

        self.jump.tick(dt);
        self.speed.tick(dt);

        if self.jump.try_jump(intent.jump_held, ground.grounded) {
            self.jump_impulse(body);
        }

        self.crouch.update(
            intent.crouch_held,
            ground.grounded,
            self.config.crouch_stick_impulse,
            body,
        );

        let state = select_state(&intent, &ground);
        if state != self.state {
            debug!("locomotion: {} -> {}", self.state.label(), state.label());
            self.state = state;
        }

        let desired = desired_speed(state, &self.config).unwrap_or(self.speed.desired());
        self.speed.retarget(desired, self.config.speed_smoothing_threshold);

        body.set_linear_damping(if ground.grounded { self.config.ground_drag } else { 0.0 });
    }

    /// Physics-cadence update. `orientation` is the yaw-only facing used to
    /// turn the input axis into a world direction.
    pub fn on_physics_step(
        &mut self,
        orientation: Quat,
        ground: GroundSample,
        body: &mut impl PhysicsBody,
    ) {
        let footing = Footing::from_sample(ground.grounded, ground.on_slope, self.jump.exiting_slope());
        let direction = move_direction(orientation, self.intent.move_axis);
        let speed = self.speed.current();

        body.add_force(move_force(footing, direction, ground.slope_normal, speed, &self.config));
        if footing == Footing::Slope && body.linear_velocity().y > 0.0 {
            body.add_force(Vec3::NEG_Y * self.config.slope_stick_force);
        }

        body.set_gravity_enabled(!ground.on_slope);

        let velocity = body.linear_velocity();
        let clamped = clamp_velocity(footing, velocity, speed);
        if clamped != velocity {
            body.set_linear_velocity(clamped);
        }
    }

    fn jump_impulse(&mut self, body: &mut impl PhysicsBody) {
        if self.config.reset_y_velocity_on_jump {
            let v = body.linear_velocity();
            body.set_linear_velocity(Vec3::new(v.x, 0.0, v.z));
        }
        body.add_impulse(Vec3::Y * self.config.jump_force);
        debug!("locomotion: jump");
    }
}
