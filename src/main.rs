use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use bevy_rapier3d::prelude::*;
use stride::interaction::{pickup_system, update_scale_label, weigh_props, Holder};
use stride::player::{
    add_locomotion_physics_step, camera_follow, camera_look, cursor_grab, locomotion_frame,
    respawn_fallen_players, sample_motion_intent, sync_movement_settings, verify_player_rig,
    SpawnPoint,
};
use stride::settings::loader as settings_loader;
use stride::ui::{
    setup_debug_overlay, spawn_debug_overlay, sync_crosshair, toggle_debug_overlay,
    update_debug_overlay,
};

mod app;
use app::{present_mode, setup, sync_vsync_settings};

const SPAWN_POINT: Vec3 = Vec3::new(0.0, 1.5, 5.0);

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    if let Err(e) = settings.validate() {
        eprintln!("invalid settings in {}: {e}", settings_loader::SETTINGS_DIR);
        std::process::exit(1);
    }
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "stride".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: present_mode(settings.graphics.vsync),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(FrameTimeDiagnosticsPlugin);

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.insert_resource(SpawnPoint(SPAWN_POINT));
    app.insert_resource(Holder::default());

    app.add_systems(Startup, setup_debug_overlay);
    app.add_systems(Startup, spawn_debug_overlay);
    app.add_systems(Startup, setup);
    app.add_systems(PostStartup, verify_player_rig);

    app.add_systems(
        Update,
        (settings_loader::reload_settings_on_key, settings_loader::check_settings_changes).chain(),
    );
    app.add_systems(
        Update,
        (sync_movement_settings, sync_vsync_settings, sync_crosshair)
            .after(settings_loader::check_settings_changes),
    );
    app.add_systems(Update, cursor_grab);
    app.add_systems(
        Update,
        (
            camera_look,
            sample_motion_intent,
            locomotion_frame.after(sync_movement_settings),
            camera_follow,
            respawn_fallen_players,
        )
            .chain(),
    );
    app.add_systems(Update, pickup_system.after(camera_follow));
    app.add_systems(Update, (weigh_props, update_scale_label).chain());
    app.add_systems(Update, toggle_debug_overlay);
    app.add_systems(Update, update_debug_overlay);
    add_locomotion_physics_step(&mut app);

    app.run();
}
