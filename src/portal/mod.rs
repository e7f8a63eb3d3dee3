mod config;
mod constants;
mod portal_state;
mod spawn;
mod trigger;

use bevy::prelude::*;
use config::PortalConfigPlugin;
pub use portal_state::Portal;
use portal_state::PortalStatePlugin;
pub use spawn::PortalDefinition;
use spawn::PortalSpawnPlugin;
use trigger::PortalTriggerPlugin;

pub struct PortalPlugin;

impl Plugin for PortalPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PortalConfigPlugin)
            .add_plugins(PortalSpawnPlugin)
            .add_plugins(PortalStatePlugin)
            .add_plugins(PortalTriggerPlugin);
    }
}
