//! Keyboard sampling into `MotionIntent`.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::locomotion::MotionIntent;
use crate::player::Player;
use crate::settings::ControlsSettings;

/// Build the intent for this frame from held keys and the keybinds.
#[must_use]
pub fn intent_from_keys(kb: &ButtonInput<KeyCode>, controls: &ControlsSettings) -> MotionIntent {
    let held = |action: &str, default: KeyCode| kb.pressed(controls.key(action, default));

    let mut axis = Vec2::ZERO;
    if held("forward", KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if held("back", KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if held("right", KeyCode::KeyD) {
        axis.x += 1.0;
    }
    if held("left", KeyCode::KeyA) {
        axis.x -= 1.0;
    }

    MotionIntent::new(
        axis,
        held("jump", KeyCode::Space),
        held("sprint", KeyCode::ShiftLeft),
        held("crouch", KeyCode::KeyC),
    )
}

/// Write the player's `MotionIntent` for this frame.
///
/// Input is ignored while the cursor is released so typing into other
/// windows does not move the player.
#[allow(clippy::needless_pass_by_value)]
pub fn sample_motion_intent(
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<crate::settings::Settings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut players: Query<&mut MotionIntent, With<Player>>,
) {
    let active = windows.get_single().map_or(true, |w| !w.cursor.visible);
    let intent = if active { intent_from_keys(&kb, &settings.controls) } else { MotionIntent::default() };

    for mut current in &mut players {
        if *current != intent {
            *current = intent;
        }
    }
}
