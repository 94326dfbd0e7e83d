//! Target visuals and impact flashes (render-only).
//!
//! Gameplay spawns bare target entities; this module dresses them with meshes
//! and plays a short flash where a hit landed. Nothing here feeds back into
//! the core.

use bevy::prelude::*;

use crate::plugins::targets::{ImpactSpawned, Target};

const IMPACT_LIFETIME: f32 = 0.2;

#[derive(Component)]
struct ImpactFlash {
    timer: Timer,
    base_scale: f32,
}

fn dress_targets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q: Query<(Entity, &Target), Added<Target>>,
) {
    for (e, target) in &q {
        commands.entity(e).insert((
            Mesh3d(meshes.add(Sphere::new(0.5 * target.scale))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.2, 0.2),
                emissive: LinearRgba::rgb(0.3, 0.05, 0.05),
                ..default()
            })),
        ));
    }
}

fn spawn_impacts(
    mut commands: Commands,
    mut impacts: MessageReader<ImpactSpawned>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for impact in impacts.read() {
        commands.spawn((
            Name::new("ImpactFlash"),
            ImpactFlash {
                timer: Timer::from_seconds(IMPACT_LIFETIME, TimerMode::Once),
                base_scale: impact.scale,
            },
            Mesh3d(meshes.add(Sphere::new(0.5))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(1.0, 0.9, 0.4, 0.9),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
            Transform::from_translation(impact.position).with_scale(Vec3::splat(0.8 * impact.scale)),
        ));
    }
}

/// Grow from 0.8x to 1.2x of the struck target's scale, then vanish.
fn animate_impacts(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut ImpactFlash, &mut Transform)>,
) {
    for (e, mut fx, mut tf) in &mut q {
        fx.timer.tick(time.delta());
        let t = (fx.timer.elapsed_secs() / IMPACT_LIFETIME).clamp(0.0, 1.0);
        tf.scale = Vec3::splat((0.8 + 0.4 * t) * fx.base_scale);
        if fx.timer.is_finished() {
            commands.entity(e).despawn();
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, (dress_targets, spawn_impacts, animate_impacts));
}
