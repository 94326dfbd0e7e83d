//! Weapon viewmodel (render-only): the per-level weapon visual and its
//! recoil kick.
//!
//! The assembly is registered in [`ShooterIgnore`] so the shot resolver's ray
//! never clips the player's own weapon.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::{GameState, InLevel};
use crate::plugins::camera::GalleryCamera;
use crate::plugins::levels::WeaponKind;
use crate::plugins::shooting::{ActiveWeapon, ShooterIgnore, ShotFired};

const RECOIL_SECS: f32 = 0.1;

#[derive(Component)]
struct Viewmodel;

#[derive(Component)]
struct RecoilKick {
    timer: Timer,
    angle_deg: f32,
}

fn mount_offset(kind: WeaponKind) -> Vec3 {
    match kind {
        WeaponKind::Pistol => Vec3::new(0.4, -0.45, 1.2),
        WeaponKind::Rifle => Vec3::new(0.6, -0.55, 1.8),
        WeaponKind::Shotgun => Vec3::new(0.5, -0.65, 1.5),
    }
}

fn kick_angle(kind: WeaponKind) -> f32 {
    match kind {
        WeaponKind::Pistol => 10.0,
        WeaponKind::Rifle => 5.0,
        WeaponKind::Shotgun => 15.0,
    }
}

/// Body parts as (size, offset) cuboids, loosely shaped per weapon.
fn parts(kind: WeaponKind) -> &'static [(Vec3, Vec3)] {
    match kind {
        WeaponKind::Pistol => &[
            (Vec3::new(0.12, 0.2, 0.6), Vec3::ZERO),
            (Vec3::new(0.12, 0.3, 0.2), Vec3::new(0.0, -0.2, -0.2)),
            (Vec3::new(0.1, 0.15, 0.55), Vec3::new(0.0, 0.07, 0.0)),
        ],
        WeaponKind::Rifle => &[
            (Vec3::new(0.1, 0.1, 1.2), Vec3::ZERO),
            (Vec3::new(0.05, 0.05, 0.8), Vec3::new(0.0, 0.0, 0.6)),
            (Vec3::new(0.1, 0.25, 0.3), Vec3::new(0.0, -0.1, -0.6)),
            (Vec3::new(0.06, 0.2, 0.1), Vec3::new(0.0, -0.1, -0.1)),
        ],
        WeaponKind::Shotgun => &[
            (Vec3::new(0.18, 0.15, 1.0), Vec3::ZERO),
            (Vec3::new(0.08, 0.08, 0.8), Vec3::new(0.0, 0.0, 0.5)),
            (Vec3::new(0.18, 0.3, 0.15), Vec3::new(0.0, -0.2, -0.4)),
        ],
    }
}

fn rebuild_viewmodel(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    weapon: Res<ActiveWeapon>,
    mut ignore: ResMut<ShooterIgnore>,
    q_old: Query<Entity, With<Viewmodel>>,
    q_cam: Query<Entity, With<GalleryCamera>>,
) {
    for e in &q_old {
        commands.entity(e).despawn();
    }
    ignore.0.clear();

    let Ok(cam) = q_cam.single() else {
        return;
    };

    let kind = weapon.0.kind;
    let body = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.17),
        ..default()
    });

    let root = commands
        .spawn((
            Name::new(format!("Viewmodel({kind:?})")),
            Viewmodel,
            Transform::from_translation(mount_offset(kind)),
            Visibility::default(),
            DespawnOnExit(InLevel),
            ChildOf(cam),
        ))
        .id();
    ignore.0.push(root);

    for (size, offset) in parts(kind) {
        let part = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
                MeshMaterial3d(body.clone()),
                Transform::from_translation(*offset),
                ChildOf(root),
            ))
            .id();
        ignore.0.push(part);
    }
}

fn start_recoil(
    mut commands: Commands,
    mut shots: MessageReader<ShotFired>,
    weapon: Res<ActiveWeapon>,
    q: Query<Entity, With<Viewmodel>>,
) {
    if shots.read().next().is_none() {
        return;
    }
    let Ok(root) = q.single() else {
        return;
    };
    commands.entity(root).insert(RecoilKick {
        timer: Timer::from_seconds(RECOIL_SECS, TimerMode::Once),
        angle_deg: kick_angle(weapon.0.kind),
    });
}

fn animate_recoil(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut RecoilKick, &mut Transform), With<Viewmodel>>,
) {
    for (e, mut kick, mut tf) in &mut q {
        kick.timer.tick(time.delta());
        let t = (kick.timer.elapsed_secs() / RECOIL_SECS).clamp(0.0, 1.0);
        tf.rotation = Quat::from_rotation_x((-kick.angle_deg * (1.0 - t)).to_radians());
        if kick.timer.is_finished() {
            tf.rotation = Quat::IDENTITY;
            commands.entity(e).remove::<RecoilKick>();
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            rebuild_viewmodel
                .run_if(in_state(GameState::Playing).and(resource_changed::<ActiveWeapon>)),
            start_recoil,
            animate_recoil,
        ),
    );
}
