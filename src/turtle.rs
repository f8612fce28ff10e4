//! Turtle pose and the operations a symbol can map to.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Steering axes shorter than this (before normalizing) are treated as degenerate.
const AXIS_EPSILON: f32 = 1e-6;

/// The turtle's transform: where it stands and which way it faces.
///
/// Growth happens along the local `+Y` axis ([`up`](Self::up)); turns spin
/// around the local `+Z` axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Current world-space position of the cursor.
    pub position: Vec3,

    /// Current world-space orientation.
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
        }
    }

    /// A pose at `position` with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Returns the turtle's local up direction (Y-axis) in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Moves the turtle `distance` along its up axis.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.up() * distance;
    }

    /// Rotates the turtle around its local Z axis by `degrees`.
    pub fn rotate_local_z(&mut self, degrees: f32) {
        self.rotate_local(Vec3::Z, degrees);
    }

    /// Rotates the turtle by `degrees` around `axis`, taken in its local frame.
    ///
    /// `axis` must be unit length.
    pub fn rotate_local(&mut self, axis: Vec3, degrees: f32) {
        let rot = Quat::from_axis_angle(axis, degrees.to_radians());
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Bends the growth direction relative to the surface point `nearest`.
    ///
    /// With `dir` the unit vector from the turtle to `nearest` and `up` the
    /// world-space growth axis, the pose turns by `dot(dir, up) * strength`
    /// degrees around `cross(dir, up)`. The rotation composes after the
    /// current orientation, so that axis is read in the turtle's local frame.
    ///
    /// Returns the applied angle in degrees. When `dir` is zero or (nearly)
    /// parallel to `up` the axis is undefined and nothing is applied.
    pub fn steer(&mut self, nearest: Vec3, strength: f32) -> f32 {
        let up = self.up();
        let dir = (nearest - self.position).normalize_or_zero();
        let axis = dir.cross(up);
        if axis.length() < AXIS_EPSILON {
            return 0.0;
        }
        let angle = dir.dot(up) * strength;
        if angle != 0.0 {
            self.rotate_local(axis.normalize(), angle);
        }
        angle
    }
}

/// Operations a symbol can be mapped to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    /// Advance one step, steer against the surface and emit a branch (`F`).
    Draw,
    /// Rotate around the local forward axis by `sign * turn_angle` degrees (`+`/`-`).
    Turn(f32),
    /// Save the pose onto the stack (`[`).
    Push,
    /// Restore the most recently pushed pose (`]`).
    Pop,
    /// Placeholder with no geometric meaning (`X`, `Z`).
    Ignore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steering_with_zero_strength_is_a_no_op() {
        let mut pose = Pose::at(Vec3::new(0.0, 2.0, 0.0));
        let before = pose;
        let angle = pose.steer(Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert_eq!(angle, 0.0);
        assert_eq!(pose, before);
    }

    #[test]
    fn steering_at_the_surface_point_is_degenerate() {
        let mut pose = Pose::at(Vec3::ONE);
        let before = pose;
        assert_eq!(pose.steer(Vec3::ONE, 90.0), 0.0);
        assert_eq!(pose, before);
    }

    #[test]
    fn heading_into_surface_bends_away() {
        // Surface point ahead and to the right; growth heads partly into it.
        let mut pose = Pose::default();
        let angle = pose.steer(Vec3::new(1.0, 1.0, 0.0), 45.0);
        assert!(angle > 0.0);
        assert!(pose.up().x < 0.0, "up should tilt away from +X, got {}", pose.up());
        assert!((pose.rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn nearly_parallel_surface_direction_does_not_steer() {
        let mut pose = Pose::default();
        let before = pose;
        assert_eq!(pose.steer(Vec3::new(1e-7, 5.0, 0.0), 60.0), 0.0);
        assert_eq!(pose, before);
    }

    #[test]
    fn steering_composes_in_the_local_frame() {
        // Tilted off vertical and yawed out of the XY plane.
        let rotation = Quat::from_rotation_y(70f32.to_radians())
            * Quat::from_rotation_z(-30f32.to_radians());
        let mut pose = Pose::new(Vec3::ZERO, rotation);
        pose.advance(1.0);

        let up = pose.up();
        let center = Vec3::new(0.0, -1.0, 0.0);
        let nearest = center + (pose.position - center).normalize();
        let dir = (nearest - pose.position).normalize();
        let axis = dir.cross(up).normalize();
        let angle = pose.steer(nearest, 40.0);
        assert!((angle - dir.dot(up) * 40.0).abs() < 1e-5);

        let local = (rotation * Quat::from_axis_angle(axis, angle.to_radians())).normalize();
        let world = (Quat::from_axis_angle(axis, angle.to_radians()) * rotation).normalize();
        assert!(pose.rotation.abs_diff_eq(local, 1e-5));
        assert!(!pose.rotation.abs_diff_eq(world, 1e-2));
        assert!(
            pose.up().abs_diff_eq(Vec3::new(-0.3545, 0.5697, -0.7415), 1e-3),
            "got {}",
            pose.up()
        );
    }

    #[test]
    fn local_turns_mirror_each_other() {
        let mut pose = Pose::default();
        pose.rotate_local_z(-30.0);
        pose.rotate_local_z(30.0);
        assert!(pose.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }
}
