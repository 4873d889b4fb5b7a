//! Grab and drop props in front of the camera.
use bevy::prelude::*;
use bevy::transform::commands::BuildChildrenTransformExt;
use bevy_rapier3d::prelude::*;

use crate::player::{Player, PlayerLook};
use crate::settings::Settings;

/// Props that can be picked up.
#[derive(Component, Debug, Default)]
pub struct Pickup;

/// Where a held prop is carried; a child of the camera.
#[derive(Component, Debug, Default)]
pub struct HoldPoint;

/// Prop currently carried, if any.
#[derive(Resource, Debug, Default)]
pub struct Holder {
    pub held: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupAction {
    Nothing,
    Grab(Entity),
    Drop(Entity),
}

/// What a pickup key press does.
///
/// `hit` is the first body under the crosshair within range and whether it
/// is tagged `Pickup`. Holding something always drops it.
#[must_use]
pub fn decide_pickup(held: Option<Entity>, pressed: bool, hit: Option<(Entity, bool)>) -> PickupAction {
    if !pressed {
        return PickupAction::Nothing;
    }
    match (held, hit) {
        (Some(e), _) => PickupAction::Drop(e),
        (None, Some((e, true))) => PickupAction::Grab(e),
        _ => PickupAction::Nothing,
    }
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct PickupCtx<'w, 's> {
    pub input: Res<'w, ButtonInput<KeyCode>>,
    pub settings: Res<'w, Settings>,
    pub rapier: Res<'w, RapierContext>,
    pub holder: ResMut<'w, Holder>,
    pub cameras: Query<'w, 's, &'static GlobalTransform, With<PlayerLook>>,
    pub hold_points: Query<'w, 's, (Entity, &'static GlobalTransform), With<HoldPoint>>,
    pub players: Query<'w, 's, Entity, With<Player>>,
    pub pickups: Query<'w, 's, &'static GlobalTransform, With<Pickup>>,
}

/// Grab the prop under the crosshair or drop the held one.
pub fn pickup_system(mut ctx: PickupCtx<'_, '_>, mut commands: Commands) {
    let pressed = ctx.input.just_pressed(ctx.settings.controls.key("pickup", KeyCode::KeyE));
    if !pressed {
        return;
    }

    let hit = if ctx.holder.held.is_none() {
        ctx.cameras.get_single().ok().and_then(|camera| {
            let mut filter = QueryFilter::default().exclude_sensors();
            if let Ok(player) = ctx.players.get_single() {
                filter = filter.exclude_rigid_body(player);
            }
            ctx.rapier
                .cast_ray(
                    camera.translation(),
                    *camera.forward(),
                    ctx.settings.interaction.pickup_range,
                    true,
                    filter,
                )
                .map(|(entity, _)| (entity, ctx.pickups.contains(entity)))
        })
    } else {
        None
    };

    match decide_pickup(ctx.holder.held, pressed, hit) {
        PickupAction::Grab(entity) => {
            let Ok((hold, hold_tf)) = ctx.hold_points.get_single() else {
                warn!("no HoldPoint to carry {entity:?}");
                return;
            };
            let Ok(prop_tf) = ctx.pickups.get(entity) else { return };

            let (scale, rotation, _) = prop_tf.to_scale_rotation_translation();
            let local = Transform::from_rotation(hold_tf.compute_transform().rotation.inverse() * rotation)
                .with_scale(scale);

            commands
                .entity(entity)
                .insert((RigidBody::KinematicPositionBased, GravityScale(0.0), Velocity::zero(), local))
                .set_parent(hold);
            ctx.holder.held = Some(entity);
            debug!("picked up {entity:?}");
        }
        PickupAction::Drop(entity) => {
            if let Some(mut e) = commands.get_entity(entity) {
                e.insert((RigidBody::Dynamic, GravityScale(1.0))).remove_parent_in_place();
            }
            ctx.holder.held = None;
            debug!("dropped {entity:?}");
        }
        PickupAction::Nothing => {}
    }
}
