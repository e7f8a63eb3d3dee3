use bevy::prelude::*;

use super::EnvironmentMaterial;
use super::dome::EnvironmentDome;
use crate::schedule::PortalSet;

pub struct ActiveEnvironmentPlugin;

impl Plugin for ActiveEnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SetEnvironment>()
            .init_resource::<ActiveEnvironment>()
            .add_systems(
                Update,
                apply_environment_requests.in_set(PortalSet::Environment),
            );
    }
}

/// Request to make `material` the environment drawn around the viewer.
///
/// Any system may write one; `apply_environment_requests` is the only
/// system that acts on them, and the last request of a frame wins.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct SetEnvironment {
    pub material: Handle<EnvironmentMaterial>,
}

impl SetEnvironment {
    pub const fn new(material: Handle<EnvironmentMaterial>) -> Self { Self { material } }
}

/// The single global environment slot
#[derive(Resource, Default, Debug)]
pub struct ActiveEnvironment {
    material: Option<Handle<EnvironmentMaterial>>,
}

impl ActiveEnvironment {
    pub const fn material(&self) -> Option<&Handle<EnvironmentMaterial>> {
        self.material.as_ref()
    }
}

fn apply_environment_requests(
    mut requests: MessageReader<SetEnvironment>,
    mut active: ResMut<ActiveEnvironment>,
    mut domes: Query<&mut MeshMaterial3d<EnvironmentMaterial>, With<EnvironmentDome>>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };

    if active.material() != Some(&request.material) {
        debug!("environment switched to {:?}", request.material.id());
        active.material = Some(request.material.clone());
    }

    for mut dome_material in &mut domes {
        if dome_material.0 != request.material {
            dome_material.0 = request.material.clone();
        }
    }
}
