//! An example demonstrating a customized controller: tuned sensitivity and
//! damping, orbit distance limits, a reset binding, and reacting to the
//! change notifications the controller emits.

use bevy::prelude::*;
use bevy_trackball_cam::prelude::*;
use rand::Rng;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, DefaultTrackballPlugins))
        .add_systems(Startup, (setup_camera, setup_scene, setup_ui))
        .add_systems(Update, (reset_camera, toggle_damping, show_activity))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 8.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        TrackballController::default()
            .with_sensitivity(Sensitivity {
                rotate: 2.0,
                zoom: 1.2,
                pan: 0.5,
            })
            .with_damping(Damping {
                enabled: true,
                factor: 0.1,
            })
            .with_limits(DistanceLimits::between(4.0, 40.0)),
    ));
}

fn reset_camera(
    keys: Res<ButtonInput<KeyCode>>,
    mut cameras: Query<(&mut TrackballController, &mut Transform)>,
) {
    if keys.just_pressed(KeyCode::Space) {
        for (mut controller, mut transform) in &mut cameras {
            controller.reset(&mut transform);
        }
    }
}

fn toggle_damping(keys: Res<ButtonInput<KeyCode>>, mut cameras: Query<&mut TrackballController>) {
    if keys.just_pressed(KeyCode::KeyT) {
        for mut controller in &mut cameras {
            controller.damping = if controller.damping.enabled {
                Damping::none()
            } else {
                Damping::default()
            };
        }
    }
}

/// Mirrors the most recent controller notification into the UI.
fn show_activity(
    mut events: EventReader<ControlEvent>,
    mut readout: Query<&mut Text, With<ActivityReadout>>,
) {
    for event in events.read() {
        if let Ok(mut text) = readout.single_mut() {
            *text = Text::new(format!("{:?}", event.kind));
        }
    }
}

#[derive(Component)]
struct ActivityReadout;

//
// --- The below code is not important for the example ---
//

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::thread_rng();
    let cube = meshes.add(Cuboid::default());
    let palette = [
        materials.add(Color::srgb(0.3, 0.6, 0.8)),
        materials.add(Color::srgb(0.55, 0.4, 0.8)),
        materials.add(Color::srgb(0.8, 0.45, 0.5)),
        materials.add(Color::srgb(0.85, 0.8, 0.5)),
    ];

    for _ in 0..150 {
        let position = Vec3::new(
            rng.gen_range(-12.0..12.0),
            rng.gen_range(0.0..4.0),
            rng.gen_range(-12.0..12.0),
        );
        commands.spawn((
            Mesh3d(cube.clone()),
            MeshMaterial3d(palette[rng.gen_range(0..palette.len())].clone()),
            Transform::from_translation(position)
                .with_scale(Vec3::splat(rng.gen_range(0.2..1.2))),
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.3, 0.35))),
        Transform::from_xyz(0.0, -0.6, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 4_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(-1.0, -2.0, -0.5), Vec3::Y),
    ));
}

fn setup_ui(mut commands: Commands) {
    commands.spawn((
        Text::new(
            "Left Mouse - Rotate\n\
             Middle Mouse / Scroll - Zoom\n\
             Right Mouse - Pan\n\
             A / S / D - Hold to rotate / zoom / pan with any button\n\
             T - Toggle damping\n\
             Space - Reset the camera",
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

    commands.spawn((
        Text::new(""),
        ActivityReadout,
        TextFont {
            font_size: 16.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(20.0),
            left: Val::Px(20.0),
            ..Default::default()
        },
    ));
}
