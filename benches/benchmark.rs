use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::{Quat, Vec2, Vec3};
use stride::locomotion::{
    select_state, sense_ground, GroundCaster, GroundSample, LocomotionConfig, LocomotionController,
    MotionIntent, PhysicsBody, RayHit,
};
use stride::player::camera::{smooth_damp_angle, PlayerLook};
use stride::settings::{CameraSettings, ControlsSettings};

/// Point-mass body with naive Euler integration.
struct SimBody {
    position: Vec3,
    velocity: Vec3,
    force: Vec3,
    damping: f32,
    gravity: bool,
    scale: f32,
}

impl SimBody {
    fn new() -> Self {
        Self { position: Vec3::new(0.0, 1.0, 0.0), velocity: Vec3::ZERO, force: Vec3::ZERO, damping: 0.0, gravity: true, scale: 1.0 }
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = if self.gravity { Vec3::NEG_Y * 9.81 } else { Vec3::ZERO };
        self.velocity += (self.force + gravity) * dt;
        self.velocity *= 1.0 / (1.0 + dt * self.damping);
        self.position += self.velocity * dt;
        if self.position.y < 1.0 {
            self.position.y = 1.0;
            self.velocity.y = self.velocity.y.max(0.0);
        }
        self.force = Vec3::ZERO;
    }
}

impl PhysicsBody for SimBody {
    fn linear_velocity(&self) -> Vec3 { self.velocity }
    fn set_linear_velocity(&mut self, velocity: Vec3) { self.velocity = velocity; }
    fn add_force(&mut self, force: Vec3) { self.force += force; }
    fn add_impulse(&mut self, impulse: Vec3) { self.velocity += impulse; }
    fn set_linear_damping(&mut self, damping: f32) { self.damping = damping; }
    fn set_gravity_enabled(&mut self, enabled: bool) { self.gravity = enabled; }
    fn height_scale(&self) -> f32 { self.scale }
    fn set_height_scale(&mut self, scale: f32) { self.scale = scale; }
}

/// Flat floor at y = 0.
struct Floor;

impl GroundCaster for Floor {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<RayHit> {
        (origin.y >= 0.0 && origin.y <= max_distance).then_some(RayHit { distance: origin.y, normal: Vec3::Y })
    }
}

/// Test out small camera movement deltas
fn bench_camera_look_clamp(c: &mut Criterion) {
    let controls = ControlsSettings::default();
    let camera = CameraSettings::default();
    c.bench_function("camera_look_clamp", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            // simulate many small mouse moves
            for i in 0..1_000usize {
                let dx = ((i * 13) % 17) as f32 * 0.1;
                let dy = ((i * 7) % 23) as f32 * 0.2 - 5.0;
                look.apply_delta(black_box(Vec2::new(dx, dy)), &controls, &camera);
                look.smooth(1.0 / 144.0, camera.smooth_time);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

/// Randomized camera movement deltas (deterministic LCG) to approximate variable input
fn bench_camera_look_random(c: &mut Criterion) {
    let controls = ControlsSettings::default();
    let camera = CameraSettings::default();
    c.bench_function("camera_look_random", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            let mut state: u32 = 0x12345678;
            for _ in 0..1_000usize {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let dx = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 200.0 - 100.0;
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let dy = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 200.0 - 100.0;
                look.apply_delta(black_box(Vec2::new(dx, dy)), &controls, &camera);
                look.smooth(1.0 / 144.0, camera.smooth_time);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

fn bench_smooth_damp_angle(c: &mut Criterion) {
    c.bench_function("smooth_damp_angle", |b| {
        b.iter(|| {
            let mut v = 0.0;
            let mut a = 350.0;
            for _ in 0..1_000usize {
                a = smooth_damp_angle(a, black_box(10.0), &mut v, 0.05, 1.0 / 144.0);
            }
            black_box(a);
        })
    });
}

fn bench_select_state(c: &mut Criterion) {
    let grounds = [GroundSample::FLAT, GroundSample::AIRBORNE];
    c.bench_function("select_state", |b| {
        b.iter(|| {
            for i in 0..1_000usize {
                let intent = MotionIntent::new(Vec2::Y, false, i % 3 == 0, i % 5 == 0);
                black_box(select_state(&intent, &grounds[i & 1]));
            }
        })
    });
}

/// One second of frames and physics steps against a flat floor.
fn bench_locomotion_sim(c: &mut Criterion) {
    let config = LocomotionConfig::default();
    c.bench_function("locomotion_sim", |b| {
        b.iter(|| {
            let mut controller = LocomotionController::new(config.clone(), 1.0);
            let mut body = SimBody::new();
            let frame_dt = 1.0 / 144.0;
            let step_dt = 1.0 / 64.0;
            let mut accumulator = 0.0;
            for i in 0..144usize {
                let intent = MotionIntent::new(Vec2::new(0.3, 1.0), i == 40, i > 20, false);
                let ground = sense_ground(&Floor, body.position, &config);
                controller.on_frame(frame_dt, intent, ground, &mut body);

                accumulator += frame_dt;
                while accumulator >= step_dt {
                    let ground = sense_ground(&Floor, body.position, &config);
                    controller.on_physics_step(Quat::IDENTITY, ground, &mut body);
                    body.integrate(step_dt);
                    accumulator -= step_dt;
                }
            }
            black_box((body.position, controller.state()));
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_camera_look_clamp,
        bench_camera_look_random,
        bench_smooth_damp_angle,
        bench_select_state,
        bench_locomotion_sim
}
criterion_main!(benches);
