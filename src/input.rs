use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin)
            .add_input_context::<ViewerControls>()
            .add_input_context::<DebugControls>()
            .init_resource::<InspectorToggles>()
            .add_systems(Startup, spawn_debug_controls)
            .add_observer(toggle_inspector::<TogglePortalInspector>)
            .add_observer(toggle_inspector::<ToggleViewerInspector>);
    }
}

/// Input context carried by the viewer - a desktop stand-in for the tracked AR device
#[derive(Component, Debug, Default)]
pub struct ViewerControls;

/// Input context for debug toggles
#[derive(Component, Debug, Default)]
pub struct DebugControls;

#[derive(InputAction)]
#[action_output(Vec2)]
pub struct MoveViewer;

#[derive(InputAction)]
#[action_output(Vec2)]
pub struct TurnViewer;

#[derive(InputAction)]
#[action_output(bool)]
pub struct TogglePortalInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ToggleViewerInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct TogglePhysicsDebug;

/// Bindings for the viewer entity
pub fn viewer_actions() -> impl Bundle {
    actions!(ViewerControls[
        (
            Action::<MoveViewer>::new(),
            DeadZone::default(),
            Bindings::spawn(Cardinal::wasd_keys()),
        ),
        (
            Action::<TurnViewer>::new(),
            Bindings::spawn(Spawn((Binding::mouse_motion(), Negate::all()))),
        ),
    ])
}

fn spawn_debug_controls(mut commands: Commands) {
    commands.spawn((
        Name::new("DebugControls"),
        DebugControls,
        actions!(DebugControls[
            (Action::<TogglePortalInspector>::new(), bindings![KeyCode::F1]),
            (Action::<ToggleViewerInspector>::new(), bindings![KeyCode::F2]),
            (Action::<TogglePhysicsDebug>::new(), bindings![KeyCode::F3]),
        ]),
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inspector {
    Portal,
    Viewer,
}

#[derive(Resource, Default, Debug)]
pub struct InspectorToggles {
    portal: bool,
    viewer: bool,
}

impl InspectorToggles {
    pub const fn is_visible(&self, inspector: Inspector) -> bool {
        match inspector {
            Inspector::Portal => self.portal,
            Inspector::Viewer => self.viewer,
        }
    }

    fn toggle(&mut self, inspector: Inspector) -> bool {
        let visible = match inspector {
            Inspector::Portal => &mut self.portal,
            Inspector::Viewer => &mut self.viewer,
        };
        *visible = !*visible;
        *visible
    }
}

/// Maps a toggle action to the inspector it shows
trait InspectorAction: InputAction {
    const INSPECTOR: Inspector;
}

impl InspectorAction for TogglePortalInspector {
    const INSPECTOR: Inspector = Inspector::Portal;
}

impl InspectorAction for ToggleViewerInspector {
    const INSPECTOR: Inspector = Inspector::Viewer;
}

fn toggle_inspector<A: InspectorAction>(_: On<Start<A>>, mut toggles: ResMut<InspectorToggles>) {
    let visible = toggles.toggle(A::INSPECTOR);
    debug!("{:?} inspector visible: {visible}", A::INSPECTOR);
}

/// Run condition for inspector plugins
pub fn inspector_visible(inspector: Inspector) -> impl Fn(Res<InspectorToggles>) -> bool + Clone {
    move |toggles: Res<InspectorToggles>| toggles.is_visible(inspector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspectors_start_hidden_and_toggle_independently() {
        let mut toggles = InspectorToggles::default();
        assert!(!toggles.is_visible(Inspector::Portal));
        assert!(!toggles.is_visible(Inspector::Viewer));

        assert!(toggles.toggle(Inspector::Portal));
        assert!(toggles.is_visible(Inspector::Portal));
        assert!(!toggles.is_visible(Inspector::Viewer));

        assert!(!toggles.toggle(Inspector::Portal));
    }
}
