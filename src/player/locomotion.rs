//! Rapier-backed adapters and the systems that drive `LocomotionController`.
//!
//! `locomotion_frame` runs in `Update` and `locomotion_physics_step` in
//! `FixedUpdate`, ordered before `PhysicsSet::SyncBackend` so its forces and
//! clamped velocity reach the rapier step configured with
//! `in_fixed_schedule()`.
use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::locomotion::{
    sense_ground, GroundCaster, LocomotionConfig, LocomotionController, MotionIntent, PhysicsBody,
    RayHit,
};
use crate::player::{Orientation, Player};
use crate::settings::Settings;

/// The rapier components a locomotion body writes to.
#[derive(QueryData)]
#[query_data(mutable)]
pub struct RapierBody {
    pub velocity: &'static mut Velocity,
    pub force: &'static mut ExternalForce,
    pub impulse: &'static mut ExternalImpulse,
    pub damping: &'static mut Damping,
    pub gravity: &'static mut GravityScale,
    pub transform: &'static mut Transform,
}

impl PhysicsBody for RapierBodyItem<'_> {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity.linvel = velocity;
    }

    fn add_force(&mut self, force: Vec3) {
        self.force.force += force;
    }

    // ExternalImpulse is cleared by rapier after each step.
    fn add_impulse(&mut self, impulse: Vec3) {
        self.impulse.impulse += impulse;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        if self.damping.linear_damping != damping {
            self.damping.linear_damping = damping;
        }
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        let scale = if enabled { 1.0 } else { 0.0 };
        if self.gravity.0 != scale {
            self.gravity.0 = scale;
        }
    }

    fn height_scale(&self) -> f32 {
        self.transform.scale.y
    }

    fn set_height_scale(&mut self, scale: f32) {
        self.transform.scale.y = scale;
    }
}

/// Downward ray casts against the rapier world, ignoring the body itself
/// and sensors.
pub struct RapierGroundCaster<'a> {
    pub context: &'a RapierContext,
    pub body: Entity,
}

impl GroundCaster for RapierGroundCaster<'_> {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<RayHit> {
        let filter = QueryFilter::default().exclude_rigid_body(self.body).exclude_sensors();
        self.context
            .cast_ray_and_get_normal(origin, Vec3::NEG_Y, max_distance, true, filter)
            .map(|(_, hit)| RayHit { distance: (hit.point - origin).length(), normal: hit.normal })
    }
}

/// Frame-cadence locomotion: sense ground and run `on_frame`.
#[allow(clippy::needless_pass_by_value)]
pub fn locomotion_frame(
    time: Res<Time>,
    rapier: Res<RapierContext>,
    mut players: Query<(Entity, &MotionIntent, &mut LocomotionController, RapierBody), With<Player>>,
) {
    let dt = time.delta_seconds();
    for (entity, intent, mut controller, mut body) in &mut players {
        let caster = RapierGroundCaster { context: &rapier, body: entity };
        let ground = sense_ground(&caster, body.transform.translation, controller.config());
        controller.on_frame(dt, *intent, ground, &mut body);
    }
}

/// Physics-cadence locomotion: forces, gravity toggle and speed clamp.
///
/// `ExternalForce` persists across steps in rapier, so it is cleared here
/// before the controller adds this step's forces.
#[allow(clippy::needless_pass_by_value)]
pub fn locomotion_physics_step(
    rapier: Res<RapierContext>,
    mut players: Query<(Entity, &Orientation, &mut LocomotionController, RapierBody), With<Player>>,
) {
    for (entity, orientation, mut controller, mut body) in &mut players {
        body.force.force = Vec3::ZERO;
        let caster = RapierGroundCaster { context: &rapier, body: entity };
        let ground = sense_ground(&caster, body.transform.translation, controller.config());
        controller.on_physics_step(orientation.0, ground, &mut body);
    }
}

/// Schedule `locomotion_physics_step` on the fixed step, ahead of the
/// rapier backend sync that reads `Velocity`, `ExternalForce` and
/// `ExternalImpulse`.
pub fn add_locomotion_physics_step(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        locomotion_physics_step.before(bevy_rapier3d::plugin::PhysicsSet::SyncBackend),
    );
}

/// The config a live controller takes from reloaded settings.
///
/// The capsule collider is built from `player_height` at spawn, so a reload
/// cannot change it; the live height is kept and the change is reported.
#[must_use]
pub fn reloadable_config(live: &LocomotionConfig, incoming: &LocomotionConfig) -> LocomotionConfig {
    let mut config = incoming.clone();
    if config.player_height != live.player_height {
        warn!(
            "player_height {} -> {} needs a restart, keeping {}",
            live.player_height, incoming.player_height, live.player_height
        );
        config.player_height = live.player_height;
    }
    config
}

/// Push changed movement settings into every controller.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_movement_settings(
    settings: Res<Settings>,
    mut last: Local<Option<LocomotionConfig>>,
    mut controllers: Query<(&mut LocomotionController, RapierBody)>,
) {
    if last.as_ref() == Some(&settings.movement) {
        return;
    }

    for (mut controller, mut body) in &mut controllers {
        let config = reloadable_config(controller.config(), &settings.movement);
        if controller.config() != &config {
            controller.apply_config(config, &mut body);
        }
    }
    *last = Some(settings.movement.clone());
}

/// Return the player to `position` at rest with fresh locomotion state.
pub fn respawn(
    position: Vec3,
    controller: &mut LocomotionController,
    body: &mut RapierBodyItem<'_>,
) {
    controller.reset();
    body.transform.translation = position;
    body.transform.scale.y = controller.crouch().base_height();
    body.velocity.linvel = Vec3::ZERO;
    body.velocity.angvel = Vec3::ZERO;
    body.force.force = Vec3::ZERO;
    body.impulse.impulse = Vec3::ZERO;
}

/// Height below which the player is considered lost.
pub const KILL_PLANE_Y: f32 = -50.0;

/// Respawn players that fell off the world.
#[allow(clippy::needless_pass_by_value)]
pub fn respawn_fallen_players(
    spawn: Res<SpawnPoint>,
    mut players: Query<(&mut LocomotionController, RapierBody), With<Player>>,
) {
    for (mut controller, mut body) in &mut players {
        if body.transform.translation.y < KILL_PLANE_Y {
            warn!("player fell below {KILL_PLANE_Y}, respawning at {}", spawn.0);
            respawn(spawn.0, &mut controller, &mut body);
        }
    }
}

/// Where the player starts and respawns.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec3);

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn rapier_body_app() -> (App, Entity) {
        let mut app = App::new();
        let e = app
            .world_mut()
            .spawn((
                Player,
                Transform::default(),
                Velocity::default(),
                ExternalForce::default(),
                ExternalImpulse::default(),
                Damping::default(),
                GravityScale(1.0),
                LocomotionController::new(LocomotionConfig::default(), 1.0),
            ))
            .id();
        (app, e)
    }

    #[test]
    fn adapter_accumulates_and_toggles() {
        let (mut app, e) = rapier_body_app();
        app.add_systems(Update, |mut q: Query<RapierBody>| {
            for mut body in &mut q {
                body.add_force(Vec3::X);
                body.add_force(Vec3::X);
                body.add_impulse(Vec3::Y * 3.0);
                body.set_gravity_enabled(false);
                body.set_linear_damping(5.0);
                body.set_height_scale(0.5);
            }
        });
        app.update();

        let world = app.world();
        assert_eq!(world.get::<ExternalForce>(e).map(|f| f.force), Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(world.get::<ExternalImpulse>(e).map(|i| i.impulse), Some(Vec3::Y * 3.0));
        assert_eq!(world.get::<GravityScale>(e).map(|g| g.0), Some(0.0));
        assert_eq!(world.get::<Damping>(e).map(|d| d.linear_damping), Some(5.0));
        assert_eq!(world.get::<Transform>(e).map(|t| t.scale.y), Some(0.5));
    }

    #[test]
    fn settings_change_reaches_controller() {
        let (mut app, e) = rapier_body_app();
        let mut settings = Settings::default();
        settings.movement.walk_speed = 6.0;
        app.insert_resource(settings);
        app.add_systems(Update, sync_movement_settings);
        app.update();

        let walk = app.world().get::<LocomotionController>(e).map(|c| c.config().walk_speed);
        assert_eq!(walk, Some(6.0));
    }

    #[derive(Resource, Default)]
    struct SyncedVelocity(Option<Vec3>);

    #[test]
    fn rapier_sync_sees_clamped_velocity() {
        let (mut app, e) = rapier_body_app();
        app.insert_resource(RapierContext::default());
        app.init_resource::<SyncedVelocity>();
        if let Ok(mut entity) = app.world_mut().get_entity_mut(e) {
            entity.insert(Orientation::default());
        }
        if let Some(mut v) = app.world_mut().get_mut::<Velocity>(e) {
            v.linvel = Vec3::new(20.0, -3.0, 0.0);
        }

        add_locomotion_physics_step(&mut app);
        app.add_systems(
            FixedUpdate,
            (|bodies: Query<&Velocity>, mut seen: ResMut<SyncedVelocity>| {
                seen.0 = bodies.iter().next().map(|v| v.linvel);
            })
            .in_set(bevy_rapier3d::plugin::PhysicsSet::SyncBackend),
        );
        app.world_mut().run_schedule(FixedUpdate);

        // Airborne at zero speed: horizontal clamped away, vertical kept.
        assert_eq!(app.world().resource::<SyncedVelocity>().0, Some(Vec3::new(0.0, -3.0, 0.0)));
    }

    #[test]
    fn reload_keeps_collider_height() {
        let (mut app, e) = rapier_body_app();
        let mut settings = Settings::default();
        settings.movement.player_height = 3.0;
        settings.movement.jump_force = 9.0;
        app.insert_resource(settings);
        app.add_systems(Update, sync_movement_settings);
        app.update();

        let config = app.world().get::<LocomotionController>(e).map(|c| c.config().clone());
        assert_eq!(config.as_ref().map(|c| c.player_height), Some(2.0));
        assert_eq!(config.map(|c| c.jump_force), Some(9.0));
    }

    #[test]
    fn crouched_body_follows_reloaded_fraction() {
        let (mut app, e) = rapier_body_app();
        app.insert_resource(Settings::default());
        app.add_systems(Update, sync_movement_settings);
        app.update();

        app.world_mut().run_system_once(|mut q: Query<(&mut LocomotionController, RapierBody)>| {
            for (mut controller, mut body) in &mut q {
                let crouch = MotionIntent::new(Vec2::ZERO, false, false, true);
                controller.on_frame(1.0 / 60.0, crouch, crate::locomotion::GroundSample::FLAT, &mut body);
            }
        });
        assert_eq!(app.world().get::<Transform>(e).map(|t| t.scale.y), Some(0.5));

        app.world_mut().resource_mut::<Settings>().movement.crouch_height_fraction = 0.7;
        app.update();
        let scale = app.world().get::<Transform>(e).map(|t| t.scale.y).unwrap_or_default();
        assert!((scale - 0.7).abs() < 1e-6);
    }

    #[test]
    fn fallen_player_respawns_at_rest() {
        let (mut app, e) = rapier_body_app();
        app.insert_resource(SpawnPoint(Vec3::new(0.0, 3.0, 0.0)));
        if let Some(mut t) = app.world_mut().get_mut::<Transform>(e) {
            t.translation.y = KILL_PLANE_Y - 1.0;
        }
        if let Some(mut v) = app.world_mut().get_mut::<Velocity>(e) {
            v.linvel = Vec3::new(1.0, -30.0, 0.0);
        }
        app.add_systems(Update, respawn_fallen_players);
        app.update();

        let world = app.world();
        assert_eq!(world.get::<Transform>(e).map(|t| t.translation), Some(Vec3::new(0.0, 3.0, 0.0)));
        assert_eq!(world.get::<Velocity>(e).map(|v| v.linvel), Some(Vec3::ZERO));
    }
}
