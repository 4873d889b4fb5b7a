//! Player components and systems (input, camera, locomotion).
//!
//! The player is a rapier dynamic capsule carrying a `LocomotionController`.
//! Systems here translate between Bevy/rapier and the engine-independent
//! `crate::locomotion` core.
//!
//! # Example:
//!
//! ```ignore
//! let player = spawn_player(&mut commands, Vec3::new(0.0, 2.0, 0.0), &settings);
//! app.add_systems(Update, (sample_motion_intent, locomotion_frame).chain());
//! add_locomotion_physics_step(&mut app);
//! ```
pub mod camera;
pub mod input;
pub mod locomotion;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::locomotion::{LocomotionController, MotionIntent};
use crate::settings::Settings;

pub use camera::*;
pub use input::*;
pub use locomotion::*;

/// Marker for the locally controlled body.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Yaw-only facing of the body, written by the camera and read by the
/// locomotion physics step.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Orientation(pub Quat);

impl Default for Orientation {
    fn default() -> Self {
        Orientation(Quat::IDENTITY)
    }
}

/// Capsule radius of the player body.
pub const PLAYER_RADIUS: f32 = 0.5;

/// Spawn the player body at `position` and return its entity.
///
/// The capsule's total height matches `settings.movement.player_height` so the
/// ground rays (cast from the centre) reach just past the feet.
pub fn spawn_player(commands: &mut Commands, position: Vec3, settings: &Settings) -> Entity {
    let movement = settings.movement.clone();
    let half_segment = (movement.half_height() - PLAYER_RADIUS).max(0.0);

    commands
        .spawn((
            Player,
            Name::new("player"),
            TransformBundle::from_transform(Transform::from_translation(position)),
            Orientation::default(),
            MotionIntent::default(),
            LocomotionController::new(movement, 1.0),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::capsule_y(half_segment, PLAYER_RADIUS),
            ColliderMassProperties::Mass(1.0),
            LockedAxes::ROTATION_LOCKED,
            Velocity::default(),
            ExternalForce::default(),
            ExternalImpulse::default(),
            Damping::default(),
            GravityScale(1.0),
            Friction::coefficient(0.0),
        ))
        .id()
}

/// Names of the collaborators a player entity is missing.
#[must_use]
pub fn missing_rig_parts(has_orientation: bool, has_controller: bool, has_intent: bool) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !has_orientation {
        missing.push("Orientation");
    }
    if !has_controller {
        missing.push("LocomotionController");
    }
    if !has_intent {
        missing.push("MotionIntent");
    }
    missing
}

/// Abort at startup if no player exists or a player lacks a collaborator
/// the locomotion systems need. Run once after the scene is spawned.
#[allow(clippy::needless_pass_by_value)]
pub fn verify_player_rig(
    players: Query<
        (Entity, Has<Orientation>, Has<LocomotionController>, Has<MotionIntent>),
        With<Player>,
    >,
    mut exit: EventWriter<AppExit>,
) {
    if players.is_empty() {
        error!("no Player entity was spawned");
        exit.send(AppExit::error());
        return;
    }

    for (entity, orientation, controller, intent) in &players {
        let missing = missing_rig_parts(orientation, controller, intent);
        if !missing.is_empty() {
            error!("player {entity:?} is missing {}", missing.join(", "));
            exit.send(AppExit::error());
        }
    }
}
