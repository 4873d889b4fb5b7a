//! Startup scene: test course, props, player and camera.
//!
//! The course has a flat floor, a ramp below the walkable slope limit, one
//! above it, a low bar that can only be passed crouched, three weighted props
//! and a weighing pad.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use stride::interaction::{spawn_scale_label, HoldPoint, Pickup, Weight, WeightScale};
use stride::player::{spawn_player, PlayerLook, SpawnPoint};
use stride::settings::Settings;
use stride::ui::spawn_crosshair;

/// Half extent of the square floor.
const FLOOR_HALF: f32 = 30.0;

/// Distance of the hold point in front of the camera.
const HOLD_DISTANCE: f32 = 1.5;

/// Spawn a fixed box with a matching collider.
fn spawn_static_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    half_extents: Vec3,
    transform: Transform,
) -> Entity {
    commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::from_size(half_extents * 2.0)),
                material,
                transform,
                ..default()
            },
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        ))
        .id()
}

/// Build the test course and the player rig.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
    spawn: Res<SpawnPoint>,
) {
    commands.insert_resource(AmbientLight { color: Color::WHITE, brightness: 300.0 });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight { illuminance: 8000.0, shadows_enabled: true, ..default() },
        transform: Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let floor = materials.add(Color::srgb(0.35, 0.38, 0.35));
    let ramp = materials.add(Color::srgb(0.45, 0.55, 0.75));
    let steep = materials.add(Color::srgb(0.75, 0.4, 0.35));
    let bar = materials.add(Color::srgb(0.8, 0.7, 0.3));

    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(FLOOR_HALF * 2.0, FLOOR_HALF * 2.0)),
        material: floor,
        ..default()
    });
    // Top face flush with the visible plane.
    commands.spawn((
        RigidBody::Fixed,
        Collider::cuboid(FLOOR_HALF, 0.1, FLOOR_HALF),
        TransformBundle::from_transform(Transform::from_xyz(0.0, -0.1, 0.0)),
    ));

    // Walkable: 20 degrees. Too steep: 55 degrees.
    let ramp_half = Vec3::new(3.0, 0.25, 6.0);
    spawn_static_box(
        &mut commands,
        &mut meshes,
        ramp,
        ramp_half,
        Transform::from_xyz(-8.0, 1.8, -10.0).with_rotation(Quat::from_rotation_x(20f32.to_radians())),
    );
    spawn_static_box(
        &mut commands,
        &mut meshes,
        steep,
        ramp_half,
        Transform::from_xyz(8.0, 4.5, -12.0).with_rotation(Quat::from_rotation_x(55f32.to_radians())),
    );

    // Underside at 1.25: clears a crouched body, blocks a standing one.
    spawn_static_box(
        &mut commands,
        &mut meshes,
        bar,
        Vec3::new(3.0, 0.25, 0.5),
        Transform::from_xyz(0.0, 1.5, -14.0),
    );

    for (i, weight) in [1.0_f32, 2.5, 4.0].into_iter().enumerate() {
        let shade = 0.3 + 0.2 * i as f32;
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::from_length(0.5)),
                material: materials.add(Color::srgb(shade, 0.8, shade)),
                transform: Transform::from_xyz(-2.0 + 2.0 * i as f32, 0.5, -4.0),
                ..default()
            },
            Pickup,
            Weight(weight),
            RigidBody::Dynamic,
            Collider::cuboid(0.25, 0.25, 0.25),
            ColliderMassProperties::Mass(weight),
            Velocity::default(),
            GravityScale(1.0),
        ));
    }

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::new(2.0, 0.1, 2.0)),
            material: materials.add(Color::srgb(0.2, 0.2, 0.25)),
            transform: Transform::from_xyz(4.0, 0.05, -4.0),
            ..default()
        },
        WeightScale::default(),
        Collider::cuboid(1.0, 0.5, 1.0),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_FIXED,
    ));

    spawn_player(&mut commands, spawn.0, &settings);

    commands
        .spawn((
            Camera3dBundle {
                transform: Transform::from_translation(spawn.0 + Vec3::Y * settings.camera.eye_height),
                ..default()
            },
            PlayerLook::default(),
        ))
        .with_children(|p| {
            p.spawn((HoldPoint, TransformBundle::from_transform(Transform::from_xyz(0.0, 0.0, -HOLD_DISTANCE))));
        });

    spawn_crosshair(&mut commands, &settings.crosshair);
    spawn_scale_label(&mut commands);
    info!("scene ready, player at {}", spawn.0);
}
