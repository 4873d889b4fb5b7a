//! Camera control and cursor helpers.
//!
//! `camera_look` accumulates mouse motion into target angles and eases the
//! view toward them every frame. It writes the full rotation to the camera and
//! the yaw alone to the player's `Orientation`. `cursor_grab` toggles cursor
//! lock and visibility, and `camera_follow` keeps the camera at eye height.

use bevy::input::mouse::MouseMotion;
use bevy::math::EulerRot;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::player::{Orientation, Player};
use crate::settings::{CameraSettings, ControlsSettings, Settings};

/// Ease `current` toward `target` like a critically damped spring.
///
/// `velocity` carries the spring state between calls. The result never
/// overshoots `target`.
#[must_use]
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// Signed shortest difference `target - current` in degrees, in (-180, 180].
#[must_use]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let d = (target - current).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// `smooth_damp` for angles in degrees, taking the short way round.
#[must_use]
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Look orientation of the first-person camera, in degrees.
///
/// `target_*` follow the mouse directly. `yaw`/`pitch` are the smoothed
/// values actually shown.
#[derive(Component, Debug, Default, Clone)]
pub struct PlayerLook {
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub yaw: f32,
    pub pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl PlayerLook {
    /// Apply a raw mouse delta to the target angles and clamp pitch.
    ///
    /// Public so benchmarks and systems share the same logic.
    pub fn apply_delta(&mut self, delta: Vec2, controls: &ControlsSettings, camera: &CameraSettings) {
        let mut axis = delta * controls.mouse_sensitivity;
        if controls.invert_x {
            axis.x = -axis.x;
        }
        if controls.invert_y {
            axis.y = -axis.y;
        }

        let max_pitch = camera.max_pitch_deg;
        self.target_yaw -= axis.x;
        self.target_pitch = (self.target_pitch - axis.y).clamp(-max_pitch, max_pitch);
    }

    /// Ease the shown angles toward the targets.
    pub fn smooth(&mut self, dt: f32, smooth_time: f32) {
        if smooth_time <= 0.0 {
            self.yaw = self.target_yaw;
            self.pitch = self.target_pitch;
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            return;
        }
        self.yaw = smooth_damp_angle(self.yaw, self.target_yaw, &mut self.yaw_velocity, smooth_time, dt);
        self.pitch = smooth_damp_angle(self.pitch, self.target_pitch, &mut self.pitch_velocity, smooth_time, dt);
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw.to_radians(), self.pitch.to_radians(), 0.0)
    }

    /// Yaw only, for the body's facing.
    #[must_use]
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }
}

/// Apply mouse-look to cameras with a `PlayerLook` component.
///
/// Mouse motion only counts while the cursor is grabbed, but smoothing runs
/// every frame so the view settles after the mouse stops.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    motion_events: Res<Events<MouseMotion>>, // use Events iterator for current update (Bevy 0.14)
    settings: Res<Settings>,
    mut cameras: Query<(&mut Transform, &mut PlayerLook)>,
    mut orientations: Query<&mut Orientation, With<Player>>,
) {
    let grabbed = windows.get_single().is_ok_and(|w| !w.cursor.visible);

    let mut delta = Vec2::ZERO;
    if grabbed {
        for ev in motion_events.iter_current_update_events() {
            delta += ev.delta;
        }
    }

    let dt = time.delta_seconds();
    for (mut transform, mut look) in &mut cameras {
        if delta != Vec2::ZERO {
            look.apply_delta(delta, &settings.controls, &settings.camera);
        }
        look.smooth(dt, settings.camera.smooth_time);
        transform.rotation = look.rotation();

        for mut orientation in &mut orientations {
            orientation.0 = look.yaw_rotation();
        }
    }
}

/// Keep the camera at eye height above the player, scaled with crouching.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_follow(
    settings: Res<Settings>,
    players: Query<&Transform, With<Player>>,
    mut cameras: Query<&mut Transform, (With<PlayerLook>, Without<Player>)>,
) {
    let Ok(player) = players.get_single() else { return };
    let eye = player.translation + Vec3::Y * settings.camera.eye_height * player.scale.y;
    for mut transform in &mut cameras {
        transform.translation = eye;
    }
}

/// Toggle cursor grab and visibility.
///
/// Left click grabs; the pause key releases.
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut wq: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Ok(mut w) = wq.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    if kb.just_pressed(settings.controls.key("pause", KeyCode::Escape)) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}
