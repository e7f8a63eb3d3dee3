use bevy::light::NotShadowCaster;
use bevy::prelude::*;

use super::EnvironmentMaterial;
use super::constants::ENVIRONMENT_DOME_RADIUS;
use crate::schedule::PortalSet;
use crate::viewer::Viewer;

pub struct EnvironmentDomePlugin;

impl Plugin for EnvironmentDomePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_environment_dome).add_systems(
            Update,
            follow_viewer.after(PortalSet::Environment),
        );
    }
}

/// Inside-out sphere the active environment material is drawn on
#[derive(Component, Debug, Default)]
pub struct EnvironmentDome;

fn spawn_environment_dome(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.spawn((
        EnvironmentDome,
        Name::new("EnvironmentDome"),
        Mesh3d(meshes.add(Sphere::new(ENVIRONMENT_DOME_RADIUS).mesh().uv(64, 32))),
        MeshMaterial3d::<EnvironmentMaterial>(Handle::default()),
        NotShadowCaster,
        Transform::default(),
    ));
}

fn follow_viewer(
    viewers: Query<&GlobalTransform, With<Viewer>>,
    mut domes: Query<&mut Transform, With<EnvironmentDome>>,
) {
    let Ok(viewer) = viewers.single() else {
        return;
    };

    for mut transform in &mut domes {
        transform.translation = viewer.translation();
    }
}
