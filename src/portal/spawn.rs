use avian3d::prelude::*;
use bevy::prelude::*;

use super::Portal;
use super::config::PortalConfig;
use super::constants::PORTAL_DEFINITIONS;
use crate::asset_loader::AssetsState;
use crate::asset_loader::EnvironmentTextures;

pub struct PortalSpawnPlugin;

impl Plugin for PortalSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, insert_frame_assets)
            // textures are final once loading completes - failed ones have been replaced
            .add_systems(OnEnter(AssetsState::Loaded), spawn_portals)
            .add_systems(
                Update,
                apply_portal_config.run_if(
                    resource_changed::<PortalConfig>.and(resource_exists::<PortalFrameAssets>),
                ),
            );
    }
}

/// Where a portal goes and which reality it leads to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalDefinition {
    pub name:         &'static str,
    /// Asset path of the stacked cubemap image
    pub texture:      &'static str,
    /// Hue of the generated cubemap used if `texture` can't be used
    pub fallback_hue: f32,
    pub translation:  Vec3,
    /// Rotation around +Y; zero faces the portal towards -Z
    pub yaw:          f32,
}

impl PortalDefinition {
    pub const fn all() -> &'static [Self] { &PORTAL_DEFINITIONS }

    fn transform(&self) -> Transform {
        Transform::from_translation(self.translation).with_rotation(Quat::from_rotation_y(self.yaw))
    }
}

/// Pieces of the frame drawn around each portal
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
enum PortalFrame {
    LeftPost,
    RightPost,
    Lintel,
}

impl PortalFrame {
    /// Placement and size of this piece, scaling a unit cube
    fn transform(self, config: &PortalConfig) -> Transform {
        let half_width = config.width / 2.0;
        let thickness = config.frame_thickness;
        let post = Vec3::new(thickness, config.height + thickness, thickness);

        match self {
            Self::LeftPost => Transform::from_xyz(-half_width, 0.0, 0.0).with_scale(post),
            Self::RightPost => Transform::from_xyz(half_width, 0.0, 0.0).with_scale(post),
            Self::Lintel => Transform::from_xyz(0.0, config.height / 2.0, 0.0)
                .with_scale(Vec3::new(config.width + thickness, thickness, thickness)),
        }
    }
}

/// Mesh and material shared by every frame piece
#[derive(Resource, Debug, Clone)]
struct PortalFrameAssets {
    mesh:     Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

impl PortalFrameAssets {
    fn piece(&self, piece: PortalFrame, config: &PortalConfig) -> impl Bundle + use<> {
        (
            piece,
            Mesh3d(self.mesh.clone()),
            MeshMaterial3d(self.material.clone()),
            piece.transform(config),
        )
    }
}

fn insert_frame_assets(
    mut commands: Commands,
    config: Res<PortalConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PortalFrameAssets {
        mesh:     meshes.add(Cuboid::from_length(1.0)),
        material: materials.add(StandardMaterial {
            base_color: config.frame_color,
            ..default()
        }),
    });
}

fn spawn_portals(
    mut commands: Commands,
    config: Res<PortalConfig>,
    frame_assets: Res<PortalFrameAssets>,
    textures: Res<EnvironmentTextures>,
) {
    for (definition, texture) in PortalDefinition::all().iter().zip(textures.iter()) {
        commands.spawn((
            Name::new(definition.name),
            Portal::new(texture.clone()),
            config.sensor_collider(),
            definition.transform(),
            Visibility::default(),
            children![
                frame_assets.piece(PortalFrame::LeftPost, &config),
                frame_assets.piece(PortalFrame::RightPost, &config),
                frame_assets.piece(PortalFrame::Lintel, &config),
            ],
        ));
        debug!("spawned {} with texture {:?}", definition.name, texture.path());
    }
}

/// Re-applies `PortalConfig` so inspector edits reshape portals already in the scene
fn apply_portal_config(
    mut commands: Commands,
    config: Res<PortalConfig>,
    frame_assets: Res<PortalFrameAssets>,
    portals: Query<Entity, With<Portal>>,
    mut frames: Query<(&PortalFrame, &mut Transform)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for portal in &portals {
        commands.entity(portal).insert(config.sensor_collider());
    }

    for (piece, mut transform) in &mut frames {
        transform.set_if_neq(piece.transform(&config));
    }

    if let Some(mut material) = materials.get_mut(&frame_assets.material)
        && material.base_color != config.frame_color
    {
        material.base_color = config.frame_color;
    }
}
