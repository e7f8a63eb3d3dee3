use avian3d::prelude::*;
use bevy::prelude::*;

use super::viewer_spawner::GazeSource;
use crate::environment::SetEnvironment;
use crate::portal::Portal;
use crate::schedule::PortalSet;

/// Gaze rays are unbounded
const GAZE_MAX_DISTANCE: f32 = f32::MAX;

pub struct GazePlugin;

impl Plugin for GazePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GazeHit>().add_systems(
            Update,
            (
                cast_gaze_ray.run_if(resource_exists::<GazeSource>),
                activate_gazed_portal,
            )
                .chain()
                .in_set(PortalSet::Gaze),
        );
    }
}

/// Nearest entity on the viewer's line of sight this frame
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GazeHit {
    pub entity: Option<Entity>,
}

fn cast_gaze_ray(
    source: Res<GazeSource>,
    viewers: Query<&GlobalTransform>,
    spatial_query: SpatialQuery,
    mut gaze_hit: ResMut<GazeHit>,
) {
    let Ok(viewer) = viewers.get(source.0) else {
        gaze_hit.entity = None;
        return;
    };

    // the ray starts inside the viewer's own collider
    let filter = SpatialQueryFilter::default().with_excluded_entities([source.0]);
    let hit = spatial_query.cast_ray(
        viewer.translation(),
        viewer.forward(),
        GAZE_MAX_DISTANCE,
        true,
        &filter,
    );

    gaze_hit.set_if_neq(GazeHit {
        entity: hit.map(|hit| hit.entity),
    });
}

fn activate_gazed_portal(
    gaze_hit: Res<GazeHit>,
    portals: Query<(&Portal, Option<&Name>)>,
    mut environment: MessageWriter<SetEnvironment>,
    mut last_gazed: Local<Option<Entity>>,
) {
    let gazed = gaze_hit
        .entity
        .and_then(|entity| portals.get(entity).ok().map(|portal| (entity, portal)));

    let Some((entity, (portal, name))) = gazed else {
        *last_gazed = None;
        return;
    };

    if *last_gazed != Some(entity) {
        debug!(
            "👀 gazing at portal {}",
            name.map_or_else(|| entity.to_string(), ToString::to_string)
        );
        *last_gazed = Some(entity);
    }

    if let Some(request) = portal.activate() {
        environment.write(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ActiveEnvironment;
    use crate::environment::ActiveEnvironmentPlugin;
    use crate::environment::EnvironmentMaterial;

    struct TestScene {
        app:     App,
        portals: [Entity; 2],
        wall:    Entity,
    }

    impl TestScene {
        fn new() -> Self {
            let mut app = App::new();
            let mut materials = Assets::<EnvironmentMaterial>::default();
            let mut portal_a = Portal::new(Handle::default());
            let mut portal_b = Portal::new(Handle::default());
            portal_a.initialize(&mut materials);
            portal_b.initialize(&mut materials);

            app.insert_resource(materials)
                .add_plugins(ActiveEnvironmentPlugin)
                .init_resource::<GazeHit>()
                .configure_sets(Update, (PortalSet::Gaze, PortalSet::Environment).chain())
                .add_systems(Update, activate_gazed_portal.in_set(PortalSet::Gaze));

            let portals = [
                app.world_mut().spawn(portal_a).id(),
                app.world_mut().spawn(portal_b).id(),
            ];
            let wall = app.world_mut().spawn(Name::new("Wall")).id();

            Self { app, portals, wall }
        }

        fn gaze_at(&mut self, entity: Option<Entity>) {
            *self.app.world_mut().resource_mut::<GazeHit>() = GazeHit { entity };
            self.app.update();
        }

        fn material_of(&self, portal: Entity) -> Handle<EnvironmentMaterial> {
            self.app
                .world()
                .get::<Portal>(portal)
                .and_then(Portal::environment_material)
                .cloned()
                .expect("portal is initialized")
        }

        fn active(&self) -> Option<Handle<EnvironmentMaterial>> {
            self.app
                .world()
                .resource::<ActiveEnvironment>()
                .material()
                .cloned()
        }
    }

    #[test]
    fn gazing_at_nothing_activates_nothing() {
        let mut scene = TestScene::new();

        scene.gaze_at(None);

        assert_eq!(scene.active(), None);
    }

    #[test]
    fn gazing_at_non_portal_activates_nothing() {
        let mut scene = TestScene::new();

        scene.gaze_at(Some(scene.wall));

        assert_eq!(scene.active(), None);
    }

    #[test]
    fn gazing_at_portal_activates_it_the_same_frame() {
        let mut scene = TestScene::new();
        let portal = scene.portals[0];

        scene.gaze_at(Some(portal));

        assert_eq!(scene.active(), Some(scene.material_of(portal)));
    }

    #[test]
    fn last_gazed_portal_wins() {
        let mut scene = TestScene::new();
        let [portal_a, portal_b] = scene.portals;

        scene.gaze_at(Some(portal_a));
        scene.gaze_at(Some(portal_b));

        assert_eq!(scene.active(), Some(scene.material_of(portal_b)));
    }

    #[test]
    fn looking_away_keeps_last_environment() {
        let mut scene = TestScene::new();
        let portal = scene.portals[1];

        scene.gaze_at(Some(portal));
        scene.gaze_at(Some(scene.wall));
        scene.gaze_at(None);

        assert_eq!(scene.active(), Some(scene.material_of(portal)));
    }
}
