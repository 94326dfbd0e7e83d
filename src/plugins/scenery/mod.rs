//! The shooting booth (render-only): cabin geometry and lighting.
//!
//! Asset-free on purpose — plain primitive meshes and solid colors. The walls
//! carry static colliders on the booth layer so stray rays terminate on
//! geometry instead of flying 200 units into nothing.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;

fn spawn_booth(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let wall = materials.add(StandardMaterial {
        base_color: Color::srgb(0.22, 0.20, 0.18),
        ..default()
    });
    let ground = materials.add(StandardMaterial {
        base_color: Color::srgb(0.10, 0.14, 0.10),
        ..default()
    });

    let mut spawn_slab = |name: &str, size: Vec3, pos: Vec3, material: &Handle<StandardMaterial>| {
        commands.spawn((
            Name::new(name.to_owned()),
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(pos),
            Collider::cuboid(size.x, size.y, size.z),
            CollisionLayers::new(Layer::Booth, [] as [Layer; 0]),
        ));
    };

    spawn_slab("BackWall", Vec3::new(40.0, 30.0, 1.0), Vec3::new(0.0, 5.0, 30.0), &wall);
    spawn_slab("LeftWall", Vec3::new(1.0, 30.0, 60.0), Vec3::new(-20.0, 5.0, 7.5), &wall);
    spawn_slab("RightWall", Vec3::new(1.0, 30.0, 60.0), Vec3::new(20.0, 5.0, 7.5), &wall);
    spawn_slab("Ceiling", Vec3::new(42.0, 1.0, 45.0), Vec3::new(0.0, 20.0, 7.5), &wall);
    spawn_slab("Ground", Vec3::new(150.0, 1.0, 150.0), Vec3::new(0.0, -10.0, 5.0), &ground);

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn plugin(app: &mut App) {
    app.insert_resource(AmbientLight {
        color: Color::srgb(0.8, 0.8, 0.8),
        brightness: 120.0,
        ..default()
    });
    app.add_systems(Startup, spawn_booth);
}
