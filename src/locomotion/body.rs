//! Collaborator traits between the locomotion core and its host physics.
//!
//! The controller never owns a body's position or velocity. It issues
//! additive forces and impulses, overwrites velocity only to clamp it, and
//! toggles damping, gravity and height scale. Whatever integrates the body
//! implements `PhysicsBody`; whatever answers ray queries implements
//! `GroundCaster`.
use bevy::prelude::*;

pub trait PhysicsBody {
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    /// Continuous force for the current physics step.
    fn add_force(&mut self, force: Vec3);
    /// Instantaneous change of momentum.
    fn add_impulse(&mut self, impulse: Vec3);
    fn set_linear_damping(&mut self, damping: f32);
    fn set_gravity_enabled(&mut self, enabled: bool);
    /// Vertical scale of the body (and its collider).
    fn height_scale(&self) -> f32;
    fn set_height_scale(&mut self, scale: f32);
}

/// A ray hit as seen by the ground sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub normal: Vec3,
}

pub trait GroundCaster {
    /// Cast straight down from `origin`, up to `max_distance`.
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// In-memory body used by tests: records what the controller asked for.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct RecordingBody {
    pub velocity: Vec3,
    pub forces: Vec<Vec3>,
    pub impulses: Vec<Vec3>,
    pub damping: f32,
    pub gravity: bool,
    pub scale_y: f32,
}

#[cfg(test)]
impl Default for RecordingBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            forces: Vec::new(),
            impulses: Vec::new(),
            damping: 0.0,
            gravity: true,
            scale_y: 1.0,
        }
    }
}

#[cfg(test)]
impl RecordingBody {
    pub fn total_force(&self) -> Vec3 {
        self.forces.iter().copied().sum()
    }
}

#[cfg(test)]
impl PhysicsBody for RecordingBody {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
    fn add_force(&mut self, force: Vec3) {
        self.forces.push(force);
    }
    fn add_impulse(&mut self, impulse: Vec3) {
        self.impulses.push(impulse);
    }
    fn set_linear_damping(&mut self, damping: f32) {
        self.damping = damping;
    }
    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity = enabled;
    }
    fn height_scale(&self) -> f32 {
        self.scale_y
    }
    fn set_height_scale(&mut self, scale: f32) {
        self.scale_y = scale;
    }
}
