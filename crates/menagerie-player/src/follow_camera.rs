//! Third-person follow camera: mouse-drag yaw, smooth follow, and the
//! flattened forward vector every character resolves its movement against.

use glam::{Mat3, Quat, Vec3};
use menagerie_config::CameraConfig;
use menagerie_input::{Action, ActionState};
use tracing::debug;

/// Handle to whatever the camera follows (a roster slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowTarget(pub usize);

/// Orbit camera bound to at most one target.
///
/// Only the avatar manager rebinds the target; characters read
/// [`forward`](Self::forward) and never write it.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    target: Option<FollowTarget>,
    /// Accumulated yaw in degrees.
    yaw: f32,
    /// Offset from the target before yaw is applied.
    offset: Vec3,
    /// Degrees per second at full look deflection.
    rotation_speed: f32,
    follow_rate: f32,
    position: Vec3,
    rotation: Quat,
    forward: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl FollowCamera {
    /// Unbound camera parked at its offset from the origin, facing `+Z`.
    #[must_use]
    pub fn from_config(config: &CameraConfig) -> Self {
        let offset = Vec3::from(config.offset);
        Self {
            target: None,
            yaw: 0.0,
            offset,
            rotation_speed: config.rotation_speed,
            follow_rate: config.follow_rate,
            position: offset,
            rotation: Quat::IDENTITY,
            forward: Vec3::Z,
        }
    }

    /// Rebind the follow target. Yaw is kept.
    pub fn set_target(&mut self, target: FollowTarget) {
        debug!(target = target.0, yaw = self.yaw, "Camera retargeted");
        self.target = Some(target);
    }

    #[must_use]
    pub fn target(&self) -> Option<FollowTarget> {
        self.target
    }

    /// Flattened (y = 0), unit-length camera facing.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Accumulate yaw from a look axis while the rotate trigger is held.
    pub fn rotate(&mut self, rotate_held: bool, look_axis: f32, dt: f32) {
        if rotate_held {
            self.yaw += self.rotation_speed * dt * look_axis;
        }
    }

    /// Where the camera wants to be for a target at `target_position`.
    #[must_use]
    pub fn desired_position(&self, target_position: Vec3) -> Vec3 {
        target_position + Quat::from_rotation_y(self.yaw.to_radians()) * self.offset
    }

    /// One frame of camera work. No-op while no target is bound.
    ///
    /// Rotates from `RotateCamera`/`LookX`, eases toward the desired position,
    /// looks at the target, then republishes the flattened forward.
    pub fn update(&mut self, target_position: Vec3, actions: &ActionState, dt: f32) {
        if self.target.is_none() {
            return;
        }
        self.rotate(
            actions.is_action_active(Action::RotateCamera),
            actions.action_value(Action::LookX),
            dt,
        );

        let desired = self.desired_position(target_position);
        let t = (self.follow_rate * dt).clamp(0.0, 1.0);
        self.position = self.position.lerp(desired, t);

        let to_target = target_position - self.position;
        if to_target.length_squared() > 1e-8 {
            let look = to_target.normalize();
            let right = Vec3::Y.cross(look).normalize_or_zero();
            if right != Vec3::ZERO {
                let up = look.cross(right);
                self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, look));
            }
            // Straight above the target there is no horizontal facing; keep the last one.
            let flat = Vec3::new(look.x, 0.0, look.z).normalize_or_zero();
            if flat != Vec3::ZERO {
                self.forward = flat;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    fn settle(cam: &mut FollowCamera, target: Vec3, actions: &ActionState) {
        for _ in 0..600 {
            cam.update(target, actions, 1.0 / 60.0);
        }
    }

    #[test]
    fn test_unbound_camera_is_noop() {
        let mut cam = FollowCamera::default();
        let before = cam.position();
        cam.update(Vec3::new(50.0, 0.0, 50.0), &ActionState::new(), 0.1);
        assert_eq!(cam.position(), before);
        assert_eq!(cam.forward(), Vec3::Z);
    }

    #[test]
    fn test_follow_converges_behind_target() {
        let mut cam = FollowCamera::default();
        cam.set_target(FollowTarget(0));
        let target = Vec3::new(3.0, 0.0, 4.0);
        settle(&mut cam, target, &ActionState::new());
        assert!(approx(cam.position(), target + Vec3::new(0.0, 5.0, -10.0), 1e-3));
        assert!(approx(cam.forward(), Vec3::Z, 1e-4));
    }

    #[test]
    fn test_follow_is_exponential_not_snap() {
        let mut cam = FollowCamera::default();
        cam.set_target(FollowTarget(0));
        let target = Vec3::new(10.0, 0.0, 0.0);
        cam.update(target, &ActionState::new(), 0.1);
        // Half of the 10-unit gap closes at follow_rate 5 and dt 0.1.
        assert!((cam.position().x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_needs_trigger_held() {
        let mut cam = FollowCamera::default();
        cam.set_target(FollowTarget(0));
        let mut actions = ActionState::new();
        actions.set_value(Action::LookX, 1.0);
        cam.update(Vec3::ZERO, &actions, 0.01);
        assert_eq!(cam.yaw(), 0.0);

        actions.set_value(Action::RotateCamera, 1.0);
        cam.update(Vec3::ZERO, &actions, 0.01);
        assert!((cam.yaw() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_quarter_turn_rotates_forward() {
        let mut cam = FollowCamera::default();
        cam.set_target(FollowTarget(0));
        cam.rotate(true, 1.0, 90.0 / 2000.0);
        settle(&mut cam, Vec3::ZERO, &ActionState::new());
        assert!(approx(cam.forward(), Vec3::X, 1e-3));
        assert!((cam.forward().y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_target_keeps_yaw() {
        let mut cam = FollowCamera::default();
        cam.set_target(FollowTarget(0));
        cam.rotate(true, 0.5, 0.1);
        let yaw = cam.yaw();
        cam.set_target(FollowTarget(2));
        assert_eq!(cam.yaw(), yaw);
        assert_eq!(cam.target(), Some(FollowTarget(2)));
    }

    #[test]
    fn test_forward_is_unit_and_flat() {
        let mut cam = FollowCamera::default();
        cam.set_target(FollowTarget(1));
        cam.update(Vec3::new(-4.0, 2.0, 9.0), &ActionState::new(), 0.05);
        assert!((cam.forward().length() - 1.0).abs() < 1e-5);
        assert_eq!(cam.forward().y, 0.0);
    }
}
