mod active;
mod constants;
mod dome;
mod material;

#[cfg(test)]
pub use active::ActiveEnvironment;
pub use active::ActiveEnvironmentPlugin;
pub use active::SetEnvironment;
use bevy::prelude::*;
use dome::EnvironmentDomePlugin;
pub use material::EnvironmentMaterial;
pub use material::StencilTest;

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<EnvironmentMaterial>::default())
            .add_plugins(ActiveEnvironmentPlugin)
            .add_plugins(EnvironmentDomePlugin);
    }
}
