use bevy::prelude::*;

/// Extension trait for `GlobalTransform` to measure points in a portal's local space
pub trait PortalSpaceExt {
    /// Coordinate of a world-space point along this transform's local forward axis.
    /// Bevy's forward is -Z, so a point the portal faces yields a positive value.
    fn forward_coordinate_of(&self, point: Vec3) -> f32;

    /// `true` when `point` lies on the side of the plane the portal faces (plane included)
    fn is_in_front(&self, point: Vec3) -> bool { self.forward_coordinate_of(point) >= 0.0 }
}

impl PortalSpaceExt for GlobalTransform {
    fn forward_coordinate_of(&self, point: Vec3) -> f32 {
        let local = self.affine().inverse().transform_point3(point);
        -local.z
    }
}
