use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use crate::input::TogglePhysicsDebug;

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(avian3d::PhysicsPlugins::default())
            .add_plugins(PhysicsDebugPlugin)
            // nothing here falls - colliders only exist for sensors and gaze rays
            .insert_resource(Gravity(Vec3::ZERO))
            .add_systems(Startup, init_physics_debug)
            .add_observer(toggle_physics_debug);
    }
}

fn init_physics_debug(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = false;
}

fn toggle_physics_debug(
    _: On<Start<TogglePhysicsDebug>>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    info!("Physics debug: {}", config.enabled);
}
