use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use super::viewer_spawner::Viewer;
use crate::input::Inspector;
use crate::input::inspector_visible;

pub struct ViewerConfigPlugin;

impl Plugin for ViewerConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            ResourceInspectorPlugin::<ViewerConfig>::default()
                .run_if(inspector_visible(Inspector::Viewer)),
        )
        .init_resource::<ViewerConfig>()
        .add_systems(
            Update,
            apply_viewer_config.run_if(resource_changed::<ViewerConfig>),
        );
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct ViewerConfig {
    /// Radius of the sphere standing in for the device when overlapping portal sensors
    #[inspector(min = 0.01, max = 0.5, display = NumberDisplay::Slider)]
    pub collider_radius:  f32,
    /// Height of the device above the ground (meters)
    #[inspector(min = 0.5, max = 2.5, display = NumberDisplay::Slider)]
    pub eye_height:       f32,
    /// Radians per pixel of mouse motion
    #[inspector(min = 0.0001, max = 0.01, display = NumberDisplay::Slider)]
    pub look_sensitivity: f32,
    /// Walking speed (meters per second)
    #[inspector(min = 0.1, max = 10.0, display = NumberDisplay::Slider)]
    pub speed:            f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            collider_radius:  0.1,
            eye_height:       1.6,
            look_sensitivity: 0.002,
            speed:            1.5,
        }
    }
}

/// Keeps the spawned viewer in step with inspector edits
fn apply_viewer_config(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut viewers: Query<(Entity, &mut Transform), With<Viewer>>,
) {
    for (viewer, mut transform) in &mut viewers {
        commands
            .entity(viewer)
            .insert(Collider::sphere(config.collider_radius));
        transform.translation.y = config.eye_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_support;

    #[test]
    fn edits_reach_the_spawned_viewer() {
        let mut app = test_support::physics_app();
        app.init_resource::<ViewerConfig>().add_systems(
            Update,
            apply_viewer_config.run_if(resource_changed::<ViewerConfig>),
        );
        let defaults = ViewerConfig::default();
        let viewer = app
            .world_mut()
            .spawn((
                Viewer,
                Transform::from_xyz(0.0, defaults.eye_height, 0.0),
                RigidBody::Dynamic,
                LockedAxes::ALL_LOCKED,
                Collider::sphere(defaults.collider_radius),
            ))
            .id();
        test_support::settle(&mut app);

        let beside_default = Vec3::new(0.3, 1.0, 5.0);
        assert_eq!(test_support::ray_hit(&mut app, beside_default, Dir3::NEG_Z), None);

        {
            let mut config = app.world_mut().resource_mut::<ViewerConfig>();
            config.collider_radius = 0.5;
            config.eye_height = 1.0;
        }
        test_support::settle(&mut app);

        let height = app
            .world()
            .get::<Transform>(viewer)
            .expect("viewer has a transform")
            .translation
            .y;
        assert!((height - 1.0).abs() < 1e-4);
        assert_eq!(
            test_support::ray_hit(&mut app, beside_default, Dir3::NEG_Z),
            Some(viewer)
        );
    }
}
