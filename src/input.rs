use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::input::{mouse::MouseMotion, keyboard::KeyCode, ButtonInput};

use shelfstock::stocking::plugin::{OcclusionRequested, ShuffleRequested};

use crate::actions::{ActionState, CameraAction, ShuffleControls};
use crate::setup::MainCamera;

pub const MOVE_SPEED: f32 = 2.5;
pub const ROTATE_SPEED: f32 = 0.2;
pub const MAX_CAMERA_DT: f32 = 0.05; // never use a dt larger than 50ms

/// Orbit camera around `focus` in a Z-up world.
#[derive(Component)]
pub struct CameraOrbit {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

pub fn input_mapping_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut action_state: ResMut<ActionState>,
) {
    action_state.set(CameraAction::PanForward, keys.pressed(KeyCode::KeyW));
    action_state.set(CameraAction::PanBackward, keys.pressed(KeyCode::KeyS));
    action_state.set(CameraAction::PanLeft, keys.pressed(KeyCode::KeyA));
    action_state.set(CameraAction::PanRight, keys.pressed(KeyCode::KeyD));
    action_state.set(CameraAction::Rise, keys.pressed(KeyCode::KeyE));
    action_state.set(CameraAction::Sink, keys.pressed(KeyCode::KeyQ));
}

/// Space shuffles, O runs occlusion; +/- density, [/] proximity, G organize, P per-group.
pub fn stocking_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    mut controls: ResMut<ShuffleControls>,
    mut shuffles: EventWriter<ShuffleRequested>,
    mut occlusions: EventWriter<OcclusionRequested>,
) {
    if keys.just_pressed(KeyCode::Equal) || keys.just_pressed(KeyCode::NumpadAdd) {
        controls.nudge_density(ShuffleControls::STEP);
    }
    if keys.just_pressed(KeyCode::Minus) || keys.just_pressed(KeyCode::NumpadSubtract) {
        controls.nudge_density(-ShuffleControls::STEP);
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        controls.nudge_proximity(ShuffleControls::STEP);
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        controls.nudge_proximity(-ShuffleControls::STEP);
    }
    if keys.just_pressed(KeyCode::KeyG) {
        controls.params.organize = !controls.params.organize;
    }
    if keys.just_pressed(KeyCode::KeyP) {
        controls.params.per_group = !controls.params.per_group;
    }

    if keys.just_pressed(KeyCode::Space) {
        info!("Demo: shuffle requested {:?}", controls.params);
        shuffles.write(ShuffleRequested(controls.params));
    }
    if keys.just_pressed(KeyCode::KeyO) {
        occlusions.write(OcclusionRequested { threshold: controls.occlusion_threshold });
    }
}

pub fn camera_controller(
    time: Res<Time>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    action_state: Res<ActionState>,
    mut query: Query<(&mut Transform, &mut CameraOrbit), With<MainCamera>>,
) {
    // 0) Clamp delta
    let dt = time.delta_secs().min(MAX_CAMERA_DT);

    let Ok((mut tf, mut orbit)) = query.single_mut() else { return; };

    // 1) Camera-relative pan on the floor plane (XY)
    let forward = Vec2::new(-orbit.yaw.cos(), -orbit.yaw.sin());
    let right = Vec2::new(forward.y, -forward.x);

    let mut dir = Vec2::ZERO;
    if action_state.pressed(CameraAction::PanForward) { dir += forward; }
    if action_state.pressed(CameraAction::PanBackward) { dir -= forward; }
    if action_state.pressed(CameraAction::PanLeft) { dir -= right; }
    if action_state.pressed(CameraAction::PanRight) { dir += right; }

    if dir != Vec2::ZERO {
        let delta = dir.normalize() * MOVE_SPEED * dt;
        orbit.focus.x += delta.x;
        orbit.focus.y += delta.y;
    }
    if action_state.pressed(CameraAction::Rise) { orbit.focus.z += MOVE_SPEED * dt; }
    if action_state.pressed(CameraAction::Sink) { orbit.focus.z -= MOVE_SPEED * dt; }

    // 2) Zoom
    for ev in scroll_evr.read() {
        let amount = match ev.unit {
            MouseScrollUnit::Line => ev.y * 0.5,
            MouseScrollUnit::Pixel => ev.y * 0.01,
        };
        orbit.radius = (orbit.radius - amount).clamp(0.5, 50.0);
    }

    // 3) Orbit
    if mouse_buttons.pressed(MouseButton::Middle) || mouse_buttons.pressed(MouseButton::Right) {
        for ev in motion_evr.read() {
            orbit.yaw -= ev.delta.x * ROTATE_SPEED * dt;
            orbit.pitch += ev.delta.y * ROTATE_SPEED * dt;
        }
    } else {
        motion_evr.clear();
    }

    orbit.pitch = orbit.pitch.clamp(
        -std::f32::consts::FRAC_PI_2 + 0.01,
        std::f32::consts::FRAC_PI_2 - 0.01,
    );

    // 4) Position camera
    let xy_radius = orbit.radius * orbit.pitch.cos();
    let offset = Vec3::new(
        xy_radius * orbit.yaw.cos(),
        xy_radius * orbit.yaw.sin(),
        orbit.radius * orbit.pitch.sin(),
    );

    tf.translation = orbit.focus + offset;
    tf.look_at(orbit.focus, Vec3::Z);
}
