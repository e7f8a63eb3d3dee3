use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::Viewer;
use super::config::ViewerConfig;
use crate::input::MoveViewer;
use crate::input::TurnViewer;

/// Keeps the viewer from looking past straight up or down
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

pub struct ViewerControlsPlugin;

impl Plugin for ViewerControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(walk_viewer).add_observer(turn_viewer);
    }
}

fn walk_viewer(
    movement: On<Fire<MoveViewer>>,
    config: Res<ViewerConfig>,
    time: Res<Time>,
    mut viewers: Query<&mut Transform, With<Viewer>>,
) {
    let Ok(mut transform) = viewers.get_mut(movement.context) else {
        return;
    };
    let step = config.speed * time.delta_secs();
    let rotation = transform.rotation;
    transform.translation += walk_offset(rotation, movement.value) * step;
}

fn turn_viewer(
    turn: On<Fire<TurnViewer>>,
    config: Res<ViewerConfig>,
    mut viewers: Query<&mut Transform, With<Viewer>>,
) {
    let Ok(mut transform) = viewers.get_mut(turn.context) else {
        return;
    };
    transform.rotation = turned(transform.rotation, turn.value * config.look_sensitivity);
}

/// Unit-speed offset on the ground plane for a stick/keys value (x right, y forward)
fn walk_offset(rotation: Quat, input: Vec2) -> Vec3 {
    let forward = (rotation * Vec3::NEG_Z).with_y(0.0).normalize_or_zero();
    let right = (rotation * Vec3::X).with_y(0.0).normalize_or_zero();
    (forward * input.y + right * input.x).clamp_length_max(1.0)
}

/// Applies yaw (x) and pitch (y) deltas, clamping pitch
fn turned(rotation: Quat, delta: Vec2) -> Quat {
    let (yaw, pitch, _) = rotation.to_euler(EulerRot::YXZ);
    let pitch = (pitch + delta.y).clamp(-MAX_PITCH, MAX_PITCH);
    Quat::from_euler(EulerRot::YXZ, yaw + delta.x, pitch, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walking_forward_stays_on_the_ground_plane() {
        // looking down at the floor
        let rotation = Quat::from_rotation_x(-0.8);

        let offset = walk_offset(rotation, Vec2::Y);

        assert!(offset.y.abs() < 1e-6);
        assert!((offset - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn diagonal_input_is_not_faster() {
        let offset = walk_offset(Quat::IDENTITY, Vec2::ONE);

        assert!(offset.length() <= 1.0 + 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let rotation = turned(Quat::IDENTITY, Vec2::new(0.0, 10.0));
        let (_, pitch, _) = rotation.to_euler(EulerRot::YXZ);

        assert!((pitch - MAX_PITCH).abs() < 1e-4);
    }
}
