use avian3d::prelude::*;
use bevy::prelude::*;

use super::Portal;
use crate::environment::EnvironmentMaterial;
use crate::schedule::PortalSet;
use crate::traits::PortalSpaceExt;
use crate::viewer::Viewer;

pub struct PortalTriggerPlugin;

impl Plugin for PortalTriggerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (handle_viewer_enter, track_viewer_stay)
                .chain()
                .in_set(PortalSet::TriggerDetection),
        );
    }
}

fn handle_viewer_enter(
    mut collision_starts: MessageReader<CollisionStart>,
    mut portals: Query<(&mut Portal, &GlobalTransform)>,
    viewers: Query<&GlobalTransform, With<Viewer>>,
) {
    for event in collision_starts.read() {
        record_viewer_entry(&mut portals, &viewers, event.collider1, event.collider2);
        record_viewer_entry(&mut portals, &viewers, event.collider2, event.collider1);
    }
}

fn record_viewer_entry(
    portals: &mut Query<(&mut Portal, &GlobalTransform)>,
    viewers: &Query<&GlobalTransform, With<Viewer>>,
    portal_entity: Entity,
    viewer_entity: Entity,
) {
    if let Ok((mut portal, portal_transform)) = portals.get_mut(portal_entity)
        && let Ok(viewer) = viewers.get(viewer_entity)
    {
        portal.on_viewer_enter(portal_transform.is_in_front(viewer.translation()));
        debug!(
            "viewer entered portal {portal_entity} (in front: {})",
            portal.is_facing_viewer()
        );
    }
}

fn track_viewer_stay(
    mut portals: Query<(
        Entity,
        &mut Portal,
        &GlobalTransform,
        &CollidingEntities,
        Option<&Name>,
    )>,
    viewers: Query<(Entity, &GlobalTransform), With<Viewer>>,
    mut materials: ResMut<Assets<EnvironmentMaterial>>,
) {
    for (portal_entity, mut portal, portal_transform, colliding, name) in &mut portals {
        for (viewer_entity, viewer) in &viewers {
            if !colliding.contains(&viewer_entity) {
                continue;
            }

            let in_front = portal_transform.is_in_front(viewer.translation());
            let Some(full_rendering) = portal.on_viewer_stay(in_front) else {
                continue;
            };

            portal.set_render_mode(&mut materials, full_rendering);
            let portal_name = name.map_or_else(|| portal_entity.to_string(), ToString::to_string);
            if portal.is_in_alternate_reality() {
                info!("🌀 crossed into the reality behind {portal_name}");
            } else {
                info!("🌀 crossed back out through {portal_name}");
            }
        }
    }
}
