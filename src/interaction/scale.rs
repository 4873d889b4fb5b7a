//! Weighing pad: a sensor that sums the weight of props resting on it.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Weight a prop contributes to a scale.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Weight(pub f32);

/// Running total on a sensor pad.
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct WeightScale {
    total: f32,
}

impl WeightScale {
    #[must_use]
    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn on_enter(&mut self, weight: Weight) {
        self.total += weight.0;
    }

    pub fn on_exit(&mut self, weight: Weight) {
        self.total -= weight.0;
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("Total Weight: {}", self.total)
    }
}

/// Text showing a scale's total.
#[derive(Component, Debug)]
pub struct ScaleLabel;

/// Apply sensor enter/exit events to scales.
#[allow(clippy::needless_pass_by_value)]
pub fn weigh_props(
    mut events: EventReader<CollisionEvent>,
    mut scales: Query<&mut WeightScale>,
    weights: Query<&Weight>,
) {
    for event in events.read() {
        let (a, b, entered) = match *event {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };

        for (pad, prop) in [(a, b), (b, a)] {
            let (Ok(mut scale), Ok(weight)) = (scales.get_mut(pad), weights.get(prop)) else {
                continue;
            };
            if entered {
                scale.on_enter(*weight);
            } else {
                scale.on_exit(*weight);
            }
            debug!("{}", scale.label());
        }
    }
}

/// Refresh labels when any scale total changes.
#[allow(clippy::needless_pass_by_value)]
pub fn update_scale_label(
    scales: Query<&WeightScale, Changed<WeightScale>>,
    mut labels: Query<&mut Text, With<ScaleLabel>>,
) {
    let Some(scale) = scales.iter().last() else { return };
    for mut text in &mut labels {
        text.sections[0].value = scale.label();
    }
}

/// Spawn the on-screen weight readout.
pub fn spawn_scale_label(commands: &mut Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                WeightScale::default().label(),
                TextStyle { font_size: 22.0, color: Color::WHITE, ..default() },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                bottom: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        ScaleLabel,
    ));
}
