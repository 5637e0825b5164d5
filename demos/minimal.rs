//! A minimal example showing the steps needed to get started with the
//! controller.

use bevy::prelude::*;
use bevy_trackball_cam::prelude::*;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            DefaultTrackballPlugins, // Step 1: Add the controller plugins
        ))
        .add_systems(Startup, (setup_camera, setup_scene))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-4.0, 6.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
        TrackballController::default(), // Step 2: add the controller to any cameras
    ));
}

//
// --- The below code is not important for the example ---
//

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(20.0, 20.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    let cube = meshes.add(Cuboid::default());
    let material = materials.add(Color::srgb(0.6, 0.7, 0.8));
    for i in -2..=2 {
        commands.spawn((
            Mesh3d(cube.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(2.5 * i as f32, 0.5, 0.0),
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 5_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(-1.0, -2.5, -1.5), Vec3::Y),
    ));

    commands.spawn((
        Text::new(
            "Left Mouse - Rotate\n\
             Middle Mouse / Scroll - Zoom\n\
             Right Mouse - Pan",
        ),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        Node {
            margin: UiRect::all(Val::Px(20.0)),
            ..Default::default()
        },
    ));
}
