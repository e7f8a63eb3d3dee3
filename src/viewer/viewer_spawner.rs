use avian3d::prelude::*;
use bevy::prelude::*;

use super::config::ViewerConfig;
use crate::input::ViewerControls;
use crate::input::viewer_actions;

pub struct ViewerSpawnerPlugin;

impl Plugin for ViewerSpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_viewer)
            .add_systems(PostStartup, resolve_gaze_source);
    }
}

/// The tracked device - camera position and orientation are the user's
#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component)]
pub struct Viewer;

/// The viewer gaze is cast from, resolved once after startup
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GazeSource(pub Entity);

fn spawn_viewer(mut commands: Commands, config: Res<ViewerConfig>) {
    commands.spawn((
        Name::new("Viewer"),
        Viewer,
        Camera3d::default(),
        Transform::from_xyz(0.0, config.eye_height, 2.0)
            .looking_to(Vec3::NEG_Z, Vec3::Y),
        // moved by input only, never by the solver
        RigidBody::Dynamic,
        LockedAxes::ALL_LOCKED,
        Collider::sphere(config.collider_radius),
        ViewerControls,
        viewer_actions(),
    ));
}

fn resolve_gaze_source(
    mut commands: Commands,
    viewers: Query<Entity, With<Viewer>>,
    mut app_exit: MessageWriter<AppExit>,
) {
    match viewers.single() {
        Ok(viewer) => {
            debug!("gaze source resolved to {viewer}");
            commands.insert_resource(GazeSource(viewer));
        },
        Err(err) => {
            error!("gaze detection needs exactly one Viewer: {err}");
            app_exit.write(AppExit::error());
        },
    }
}
