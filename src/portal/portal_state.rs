use avian3d::prelude::*;
use bevy::prelude::*;

use crate::environment::EnvironmentMaterial;
use crate::environment::SetEnvironment;
use crate::environment::StencilTest;
use crate::schedule::PortalSet;

pub struct PortalStatePlugin;

impl Plugin for PortalStatePlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(reset_render_mode_on_remove).add_systems(
            Update,
            initialize_portals.in_set(PortalSet::Initialization),
        );
    }
}

/// A window into another reality.
///
/// Owns the environment material built from `environment_texture` and tracks
/// which side of its plane the viewer is on. Crossing the plane while inside
/// the sensor volume flips `in_alternate_reality`.
#[derive(Component, Reflect, Debug, Default, Clone)]
#[reflect(Component)]
#[require(Sensor, CollisionEventsEnabled, CollidingEntities)]
pub struct Portal {
    pub environment_texture: Handle<Image>,
    environment_material:    Option<Handle<EnvironmentMaterial>>,
    facing_viewer:           bool,
    in_alternate_reality:    bool,
}

impl Portal {
    pub fn new(environment_texture: Handle<Image>) -> Self {
        Self {
            environment_texture,
            ..default()
        }
    }

    pub const fn environment_material(&self) -> Option<&Handle<EnvironmentMaterial>> {
        self.environment_material.as_ref()
    }

    pub const fn is_initialized(&self) -> bool { self.environment_material.is_some() }

    pub const fn is_facing_viewer(&self) -> bool { self.facing_viewer }

    pub const fn is_in_alternate_reality(&self) -> bool { self.in_alternate_reality }

    /// Builds the environment material unless one exists, then puts the portal
    /// into the "outside" render mode.
    pub fn initialize(&mut self, materials: &mut Assets<EnvironmentMaterial>) {
        if self.environment_material.is_none() {
            let material = EnvironmentMaterial::new(self.environment_texture.clone());
            self.environment_material = Some(materials.add(material));
        }
        self.set_render_mode(materials, false);
    }

    /// `true` draws the destination everywhere (viewer is inside it), `false`
    /// draws it only through the portal window.
    pub fn set_render_mode(&self, materials: &mut Assets<EnvironmentMaterial>, full_rendering: bool) {
        let Some(handle) = self.environment_material.as_ref() else {
            return;
        };
        if let Some(mut material) = materials.get_mut(handle) {
            material.stencil_test = StencilTest::for_render_mode(full_rendering);
        }
    }

    pub const fn on_viewer_enter(&mut self, in_front: bool) { self.facing_viewer = in_front; }

    /// Records the viewer's side of the plane. Returns the new reality state
    /// when the side changed since the last record, i.e. the viewer crossed.
    pub const fn on_viewer_stay(&mut self, in_front: bool) -> Option<bool> {
        let crossed = in_front != self.facing_viewer;
        if crossed {
            self.in_alternate_reality = !self.in_alternate_reality;
        }
        self.facing_viewer = in_front;

        if crossed {
            Some(self.in_alternate_reality)
        } else {
            None
        }
    }

    /// Request to make this portal's environment the active one - `None` until initialized
    pub fn activate(&self) -> Option<SetEnvironment> {
        self.environment_material
            .as_ref()
            .map(|material| SetEnvironment::new(material.clone()))
    }
}

fn initialize_portals(
    mut portals: Query<(&mut Portal, Option<&Name>)>,
    mut materials: ResMut<Assets<EnvironmentMaterial>>,
    mut environment: MessageWriter<SetEnvironment>,
) {
    for (mut portal, name) in &mut portals {
        if portal.is_initialized() {
            continue;
        }

        portal.initialize(&mut materials);
        info!(
            "portal {} initialized with environment {:?}",
            name.map_or("<unnamed>", Name::as_str),
            portal.environment_material().map(Handle::id)
        );

        // a new portal's reality shows up right away, the last one initialized wins
        if let Some(request) = portal.activate() {
            environment.write(request);
        }
    }
}

/// A removed portal's material may outlive it, so leave it in the permissive mode
fn reset_render_mode_on_remove(
    remove: On<Remove, Portal>,
    portals: Query<&Portal>,
    mut materials: ResMut<Assets<EnvironmentMaterial>>,
) {
    if let Ok(portal) = portals.get(remove.entity) {
        portal.set_render_mode(&mut materials, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stencil_test_of(portal: &Portal, materials: &Assets<EnvironmentMaterial>) -> StencilTest {
        let handle = portal.environment_material().expect("portal is initialized");
        materials.get(handle).expect("material is stored").stencil_test
    }

    fn initialized_portal(materials: &mut Assets<EnvironmentMaterial>) -> Portal {
        let mut portal = Portal::new(Handle::default());
        portal.initialize(materials);
        portal
    }

    #[test]
    fn initialize_builds_one_material() {
        let mut materials = Assets::<EnvironmentMaterial>::default();
        let mut portal = Portal::new(Handle::default());

        portal.initialize(&mut materials);
        let first = portal.environment_material().cloned();
        portal.initialize(&mut materials);

        assert_eq!(materials.len(), 1);
        assert_eq!(portal.environment_material().cloned(), first);
    }

    #[test]
    fn initialize_starts_outside() {
        let mut materials = Assets::<EnvironmentMaterial>::default();
        let portal = initialized_portal(&mut materials);

        assert_eq!(stencil_test_of(&portal, &materials), StencilTest::Equal);
        assert!(!portal.is_in_alternate_reality());
    }

    #[test]
    fn activate_before_initialize_is_none() {
        assert!(Portal::new(Handle::default()).activate().is_none());
    }

    #[test]
    fn activate_requests_own_material() {
        let mut materials = Assets::<EnvironmentMaterial>::default();
        let portal = initialized_portal(&mut materials);

        let request = portal.activate().expect("initialized portal activates");

        assert_eq!(Some(&request.material), portal.environment_material());
    }

    #[test]
    fn crossing_front_to_back_toggles_once() {
        let mut portal = Portal::default();
        portal.on_viewer_enter(true);

        assert_eq!(portal.on_viewer_stay(true), None);
        assert_eq!(portal.on_viewer_stay(false), Some(true));
        assert_eq!(portal.on_viewer_stay(false), None);
        assert!(portal.is_in_alternate_reality());
        assert!(!portal.is_facing_viewer());
    }

    #[test]
    fn staying_on_one_side_never_toggles() {
        let mut portal = Portal::default();
        portal.on_viewer_enter(false);

        for _ in 0..10 {
            assert_eq!(portal.on_viewer_stay(false), None);
        }
        assert!(!portal.is_in_alternate_reality());
    }

    #[test]
    fn flip_parity_decides_reality() {
        for flips in 0..6 {
            let mut portal = Portal::default();
            portal.on_viewer_enter(true);

            let mut in_front = true;
            for _ in 0..flips {
                in_front = !in_front;
                portal.on_viewer_stay(in_front);
            }

            assert_eq!(portal.is_in_alternate_reality(), flips % 2 == 1, "flips: {flips}");
        }
    }

    #[test]
    fn reality_state_survives_reentry() {
        let mut portal = Portal::default();
        portal.on_viewer_enter(true);
        portal.on_viewer_stay(false);
        assert!(portal.is_in_alternate_reality());

        // leave, come back in from the front - entry alone does not correct the state
        portal.on_viewer_enter(true);
        assert!(portal.is_in_alternate_reality());
        assert_eq!(portal.on_viewer_stay(true), None);
    }

    #[test]
    fn set_render_mode_updates_material() {
        let mut materials = Assets::<EnvironmentMaterial>::default();
        let portal = initialized_portal(&mut materials);

        portal.set_render_mode(&mut materials, true);
        assert_eq!(stencil_test_of(&portal, &materials), StencilTest::NotEqual);

        portal.set_render_mode(&mut materials, false);
        assert_eq!(stencil_test_of(&portal, &materials), StencilTest::Equal);
    }

    #[test]
    fn removal_resets_to_full_rendering() {
        for full_rendering in [false, true] {
            let mut app = App::new();
            let mut materials = Assets::<EnvironmentMaterial>::default();
            let portal = initialized_portal(&mut materials);
            portal.set_render_mode(&mut materials, full_rendering);
            let handle = portal.environment_material().cloned().expect("initialized");

            app.insert_resource(materials)
                .add_observer(reset_render_mode_on_remove);
            let entity = app.world_mut().spawn(portal).id();
            app.world_mut().despawn(entity);

            let materials = app.world().resource::<Assets<EnvironmentMaterial>>();
            let stencil_test = materials.get(&handle).expect("material outlives portal").stencil_test;
            assert_eq!(stencil_test, StencilTest::NotEqual);
        }
    }

    #[test]
    fn initialize_system_activates_new_portals_once() {
        let mut app = App::new();
        app.insert_resource(Assets::<EnvironmentMaterial>::default())
            .add_message::<SetEnvironment>()
            .add_systems(Update, initialize_portals);
        let entity = app
            .world_mut()
            .spawn((Portal::new(Handle::default()), Name::new("Forest")))
            .id();

        app.update();
        app.update();

        let portal = app.world().get::<Portal>(entity).expect("portal still exists");
        assert!(portal.is_initialized());
        assert_eq!(app.world().resource::<Assets<EnvironmentMaterial>>().len(), 1);

        let messages = app.world().resource::<Messages<SetEnvironment>>();
        let mut cursor = messages.get_cursor();
        let requests: Vec<_> = cursor.read(messages).collect();
        assert_eq!(requests.len(), 1);
        assert_eq!(Some(&requests[0].material), portal.environment_material());
    }
}
