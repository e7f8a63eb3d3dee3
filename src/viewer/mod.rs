mod config;
mod controls;
mod gaze;
mod viewer_spawner;

use bevy::prelude::*;
use config::ViewerConfigPlugin;
use controls::ViewerControlsPlugin;
use gaze::GazePlugin;
pub use viewer_spawner::Viewer;
use viewer_spawner::ViewerSpawnerPlugin;

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ViewerConfigPlugin)
            .add_plugins(ViewerControlsPlugin)
            .add_plugins(ViewerSpawnerPlugin)
            .add_plugins(GazePlugin);
    }
}
