use std::f32::consts::FRAC_PI_2;

use bevy::math::Vec3;

use super::PortalDefinition;

/// Portals placed in the scene once their textures are ready. Each texture is a
/// stacked cubemap (six square faces, top to bottom).
pub const PORTAL_DEFINITIONS: [PortalDefinition; 2] = [
    PortalDefinition {
        name:         "ForestPortal",
        texture:      "textures/forest_cubemap.png",
        fallback_hue: 130.0,
        translation:  Vec3::new(0.0, 1.1, -3.0),
        yaw:          0.0,
    },
    PortalDefinition {
        name:         "DesertPortal",
        texture:      "textures/desert_cubemap.png",
        fallback_hue: 35.0,
        translation:  Vec3::new(4.0, 1.1, 0.0),
        yaw:          FRAC_PI_2,
    },
];
