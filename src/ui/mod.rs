//! User interface helpers: crosshair and debug overlay.
//!
//! The overlay periodically displays FPS, the locomotion state, current and
//! desired speed, ground contact and player position. The crosshair is a
//! centred dot driven by `Settings.crosshair`.

use crate::locomotion::LocomotionController;
use crate::player::Player;
use crate::settings::{CrosshairSettings, Settings};
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Component)]
pub struct DebugOverlayText;

#[derive(Component)]
pub struct Crosshair;

/// Insert debug overlay resources.
pub fn setup_debug_overlay(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(
        0.5,
        TimerMode::Repeating,
    )));
    commands.insert_resource(DebugOverlayState::default());
}

/// Toggle the debug overlay visibility when the `toggle_debug` key is pressed.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.controls.key("toggle_debug", KeyCode::F1)) {
        state.visible = !state.visible;
    }
}

/// Overlay body for one refresh.
#[must_use]
pub fn overlay_text(fps: f64, controller: Option<(&LocomotionController, Vec3)>) -> String {
    let Some((controller, pos)) = controller else {
        return format!("FPS: {fps:.1}\nPlayer: N/A");
    };

    let ground = controller.ground();
    format!(
        "FPS: {:.1}\nState: {}\nSpeed: {:.2} / {:.2}\nGrounded: {} | Slope: {}\nPos: ({:.1}, {:.1}, {:.1})",
        fps,
        controller.state().label(),
        controller.current_speed(),
        controller.desired_speed(),
        ground.grounded,
        ground.on_slope,
        pos.x,
        pos.y,
        pos.z
    )
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub state: Res<'w, DebugOverlayState>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub player_query: Query<'w, 's, (&'static Transform, &'static LocomotionController), With<Player>>,
}

/// Update the debug overlay text once every interval.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else { return };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let player = ctx.player_query.get_single().ok().map(|(t, c)| (c, t.translation));
    text.sections[0].value = overlay_text(fps, player);
}

pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font_size: 18.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                    ..default()
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

fn crosshair_color(settings: &CrosshairSettings) -> Color {
    let [r, g, b] = settings.color;
    Color::srgb(r, g, b)
}

fn crosshair_visibility(settings: &CrosshairSettings) -> Visibility {
    if settings.show { Visibility::Inherited } else { Visibility::Hidden }
}

/// Spawn a crosshair dot centred on the screen.
pub fn spawn_crosshair(commands: &mut Commands, settings: &CrosshairSettings) {
    commands
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|p| {
            p.spawn((
                NodeBundle {
                    style: Style {
                        position_type: PositionType::Absolute,
                        width: Val::Px(settings.size),
                        height: Val::Px(settings.size),
                        ..default()
                    },
                    background_color: crosshair_color(settings).into(),
                    visibility: crosshair_visibility(settings),
                    ..default()
                },
                Crosshair,
            ));
        });
}

/// Apply reloaded crosshair settings.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_crosshair(
    settings: Res<Settings>,
    mut crosshairs: Query<(&mut Style, &mut BackgroundColor, &mut Visibility), With<Crosshair>>,
) {
    if !settings.is_changed() {
        return;
    }

    let cfg = &settings.crosshair;
    for (mut style, mut color, mut visibility) in &mut crosshairs {
        style.width = Val::Px(cfg.size);
        style.height = Val::Px(cfg.size);
        *color = crosshair_color(cfg).into();
        *visibility = crosshair_visibility(cfg);
    }
}
