use bevy::prelude::*;

use crate::asset_loader::AssetsState;

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum PortalSet {
    /// Builds environment materials for portals that don't have one yet
    Initialization,
    /// Casts the viewer's gaze and activates the portal it lands on
    Gaze,
    /// Applies environment requests - the only writer of the active environment
    Environment,
    /// Portal trigger enter/stay handling, stepped with physics
    TriggerDetection,
}

pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        // nothing portal related runs until the cubemaps exist - materials
        // built on a 2d image would fail to bind
        app.configure_sets(
            Update,
            (
                PortalSet::Initialization,
                PortalSet::Gaze,
                PortalSet::Environment,
            )
                .chain()
                .run_if(in_state(AssetsState::Loaded)),
        )
        .configure_sets(
            FixedUpdate,
            PortalSet::TriggerDetection.run_if(in_state(AssetsState::Loaded)),
        );
    }
}
