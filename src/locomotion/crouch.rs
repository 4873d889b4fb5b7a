//! Crouch height handling.
use bevy::prelude::*;

use super::body::PhysicsBody;

/// Standing and crouched vertical scale of the body.
///
/// Invariant: the body's height scale is `crouch_height` exactly while
/// `is_crouching`, and `base_height` after a release.
#[derive(Debug, Clone, PartialEq)]
pub struct CrouchScale {
    base_height: f32,
    crouch_height: f32,
    is_crouching: bool,
}

impl CrouchScale {
    #[must_use]
    pub fn new(base_height: f32, crouch_fraction: f32) -> Self {
        Self {
            base_height,
            crouch_height: base_height * crouch_fraction,
            is_crouching: false,
        }
    }

    #[must_use]
    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    #[must_use]
    pub fn crouch_height(&self) -> f32 {
        self.crouch_height
    }

    #[must_use]
    pub fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    /// Change the crouch fraction. A crouched body is rescaled at once so it
    /// always matches `crouch_height`.
    pub fn set_fraction(&mut self, crouch_fraction: f32, body: &mut impl PhysicsBody) {
        self.crouch_height = self.base_height * crouch_fraction;
        if self.is_crouching && body.height_scale() != self.crouch_height {
            body.set_height_scale(self.crouch_height);
        }
    }

    /// Shrink while crouch is held on the ground, restore when released.
    ///
    /// Entering the crouch pushes the body down with `stick_impulse` so it
    /// stays on the floor while the collider shrinks. Releasing restores the
    /// standing height without checking for headroom.
    pub fn update(
        &mut self,
        crouch_held: bool,
        grounded: bool,
        stick_impulse: f32,
        body: &mut impl PhysicsBody,
    ) {
        if crouch_held && grounded {
            if !self.is_crouching {
                self.is_crouching = true;
                body.set_height_scale(self.crouch_height);
                body.add_impulse(Vec3::NEG_Y * stick_impulse);
            }
        } else if !crouch_held && self.is_crouching {
            self.is_crouching = false;
            body.set_height_scale(self.base_height);
        }
    }
}
