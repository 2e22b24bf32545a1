use bevy::prelude::*;

use shelfstock::stocking::plugin::StockActor;
use shelfstock::stocking::scene::{product_actor, shelf_actor};

use crate::input::CameraOrbit;

#[derive(Component)]
pub struct MainCamera;

const SHELF_SIZE: Vec3 = Vec3::new(0.5, 2.0, 2.0);
const SHELF_LEVELS: [f32; 4] = [0.1, 0.35, 0.6, 0.85];
const SHELF_THICKNESS: f32 = 0.02;

/// Demo shelves; names match `assets/stocking/demo.whitelist.json`.
const SHELVES: [(&str, Vec3); 2] = [
    ("BP_ShelfMain_001", Vec3::new(0.0, -2.1, 0.0)),
    ("BP_ShelfMain_002", Vec3::new(0.0, 0.1, 0.0)),
];

/// (name prefix, count, size, colour)
const PRODUCTS: [(&str, u32, Vec3, Color); 5] = [
    ("chips_lays", 12, Vec3::new(0.10, 0.16, 0.22), Color::srgb(0.95, 0.80, 0.10)),
    ("chips_pringles", 10, Vec3::new(0.08, 0.08, 0.24), Color::srgb(0.80, 0.10, 0.10)),
    ("chips_kettle", 12, Vec3::new(0.09, 0.18, 0.20), Color::srgb(0.15, 0.35, 0.85)),
    ("chips_doritos", 8, Vec3::new(0.10, 0.20, 0.21), Color::srgb(0.90, 0.45, 0.05)),
    ("chips_box_lays", 4, Vec3::new(0.12, 0.22, 0.20), Color::srgb(0.30, 0.70, 0.30)),
];

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // 1) Light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-4.0, -2.0, 6.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    // 2) Camera, looking at the shelf fronts from -X
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-5.0, 0.0, 1.5).looking_at(Vec3::new(0.25, 0.0, 1.0), Vec3::Z),
        MainCamera,
        CameraOrbit {
            focus: Vec3::new(0.25, 0.0, 1.0),
            radius: 5.0,
            yaw: std::f32::consts::PI,
            pitch: 0.1,
        },
    ));

    // 3) Shelves: one root per shelf, one child cuboid per collider
    let shelf_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.55, 0.6),
        perceptual_roughness: 0.8,
        ..default()
    });
    for (name, pos) in SHELVES {
        let actor = shelf_actor(name, pos, SHELF_SIZE, &SHELF_LEVELS, SHELF_THICKNESS);
        commands
            .spawn((
                Name::new(name),
                Transform::from_translation(pos),
                Visibility::default(),
                StockActor::from_scene_actor(&actor),
            ))
            .with_children(|parent| {
                for b in &actor.colliders {
                    parent.spawn((
                        Mesh3d(meshes.add(Cuboid::from_size(b.half * 2.0))),
                        MeshMaterial3d(shelf_mat.clone()),
                        Transform::from_translation(b.center),
                    ));
                }
            });
    }

    // 4) Products, lined up out of the way until the first shuffle
    for (row, (prefix, count, size, color)) in PRODUCTS.into_iter().enumerate() {
        let mesh = meshes.add(Mesh::from(Cuboid::from_size(size)).translated_by(Vec3::Z * size.z * 0.5));
        let mat = materials.add(StandardMaterial { base_color: color, ..default() });
        for i in 1..=count {
            let name = format!("{prefix}_{i:03}");
            let pos = Vec3::new(-2.0 - row as f32 * 0.4, -2.0 + i as f32 * 0.3, 0.0);
            let actor = product_actor(name.as_str(), pos, size);
            commands.spawn((
                Name::new(name),
                Mesh3d(mesh.clone()),
                MeshMaterial3d(mat.clone()),
                Transform::from_translation(pos),
                Visibility::default(),
                StockActor::from_scene_actor(&actor),
            ));
        }
    }
}
