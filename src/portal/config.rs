use avian3d::prelude::*;
use bevy::color::palettes::tailwind;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use crate::input::Inspector;
use crate::input::inspector_visible;

pub struct PortalConfigPlugin;

impl Plugin for PortalConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            ResourceInspectorPlugin::<PortalConfig>::default()
                .run_if(inspector_visible(Inspector::Portal)),
        )
        .init_resource::<PortalConfig>();
    }
}

/// Shape of the portals in the scene, re-applied to existing portals when edited
#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct PortalConfig {
    pub frame_color:     Color,
    #[inspector(min = 0.05, max = 0.5, display = NumberDisplay::Slider)]
    pub frame_thickness: f32,
    #[inspector(min = 0.5, max = 5.0, display = NumberDisplay::Slider)]
    pub height:          f32,
    /// Depth of the sensor volume on each side of the portal plane
    #[inspector(min = 0.1, max = 3.0, display = NumberDisplay::Slider)]
    pub sensor_depth:    f32,
    #[inspector(min = 0.5, max = 5.0, display = NumberDisplay::Slider)]
    pub width:           f32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            frame_color:     Color::from(tailwind::SLATE_300),
            frame_thickness: 0.1,
            height:          2.2,
            sensor_depth:    1.0,
            width:           1.2,
        }
    }
}

impl PortalConfig {
    /// Sensor volume straddling the portal plane so a crossing happens inside it
    pub fn sensor_collider(&self) -> Collider {
        Collider::cuboid(self.width, self.height, self.sensor_depth * 2.0)
    }
}
