//! Booth camera (render-only).
//!
//! The player stands at a fixed firing position and looks around within the
//! booth's clamps; the camera never translates. Each frame the camera feeds
//! the gameplay [`AimPose`] resource, which is all the shot resolver ever
//! sees — headless runs simply keep the default pose.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use crate::common::state::GameState;
use crate::plugins::shooting::AimPose;

const LOOK_SENSITIVITY: f32 = 0.12;
const PITCH_LIMIT_DEG: f32 = 50.0;
const YAW_LIMIT_DEG: f32 = 80.0;

#[derive(Component, Debug, Default)]
pub struct GalleryCamera {
    yaw_deg: f32,
    pitch_deg: f32,
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("BoothCamera"),
        GalleryCamera::default(),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 80_f32.to_radians(),
            ..default()
        }),
        // Firing position, facing into the booth (+Z).
        Transform::from_xyz(0.0, 0.0, -15.0).looking_to(Dir3::Z, Vec3::Y),
    ));
}

fn mouse_look(
    mut motions: MessageReader<MouseMotion>,
    mut q: Query<(&mut GalleryCamera, &mut Transform)>,
) {
    let delta: Vec2 = motions.read().map(|m| m.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }
    let Ok((mut cam, mut tf)) = q.single_mut() else {
        return;
    };

    cam.yaw_deg = (cam.yaw_deg - delta.x * LOOK_SENSITIVITY).clamp(-YAW_LIMIT_DEG, YAW_LIMIT_DEG);
    cam.pitch_deg =
        (cam.pitch_deg - delta.y * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

    // Base rotation flips the camera toward +Z; yaw/pitch apply on top.
    tf.rotation = Quat::from_rotation_y(std::f32::consts::PI)
        * Quat::from_euler(
            EulerRot::YXZ,
            cam.yaw_deg.to_radians(),
            cam.pitch_deg.to_radians(),
            0.0,
        );
}

fn feed_aim_pose(mut aim: ResMut<AimPose>, q: Query<&Transform, With<GalleryCamera>>) {
    let Ok(tf) = q.single() else {
        return;
    };
    aim.origin = tf.translation;
    aim.forward = tf.forward();
}

fn grab_cursor(mut q: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    let Ok(mut cursor) = q.single_mut() else {
        return;
    };
    cursor.grab_mode = CursorGrabMode::Locked;
    cursor.visible = false;
}

fn release_cursor(mut q: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    let Ok(mut cursor) = q.single_mut() else {
        return;
    };
    cursor.grab_mode = CursorGrabMode::None;
    cursor.visible = true;
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera);
    app.add_systems(
        Update,
        (mouse_look, feed_aim_pose.after(mouse_look)).run_if(in_state(GameState::Playing)),
    );
    app.add_systems(OnEnter(GameState::Playing), grab_cursor);
    app.add_systems(OnExit(GameState::Playing), release_cursor);
}
