//! Portal Realities - augmented-reality style portals built with Bevy
//!
//! - Gaze at a portal to bring up the reality behind it
//! - Walk through a portal's sensor volume to step into that reality, and back out
//! - Bevy Remote Protocol (BRP) support for debugging

mod asset_loader;
mod environment;
mod input;
mod physics;
mod portal;
mod scene;
mod schedule;
mod traits;
mod viewer;

use bevy::prelude::*;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_inspector_egui::bevy_egui::EguiPlugin;

use crate::asset_loader::AssetLoaderPlugin;
use crate::environment::EnvironmentPlugin;
use crate::input::InputPlugin;
use crate::physics::PhysicsPlugin;
use crate::portal::PortalPlugin;
use crate::scene::ScenePlugin;
use crate::schedule::SchedulePlugin;
use crate::viewer::ViewerPlugin;

fn main() {
    let mut app = App::new();

    // Get effective port from BrpExtrasPlugin to include in window title if non-default
    let brp_plugin = BrpExtrasPlugin::default();
    let (effective_port, _) = brp_plugin.get_effective_port();
    let window_title = if effective_port == bevy_brp_extras::DEFAULT_REMOTE_PORT {
        "portal realities".to_string()
    } else {
        format!("portal realities - {effective_port}")
    };

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: window_title,
            ..default()
        }),
        ..default()
    }))
    .add_plugins((
        EguiPlugin::default(),
        brp_plugin,
        AssetLoaderPlugin,
        EnvironmentPlugin,
        InputPlugin,
        PhysicsPlugin,
        PortalPlugin,
        ScenePlugin,
        SchedulePlugin,
        ViewerPlugin,
    ))
    .run();
}
