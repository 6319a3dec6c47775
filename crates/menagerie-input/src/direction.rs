//! Directional input resolution: stick + keyboard axes to a camera-relative,
//! world-space movement intent.

use glam::{Vec2, Vec3};

use crate::action_map::{Action, ActionState};

/// Raw horizontal/vertical axes for one frame.
///
/// Each axis is the sum of the stick contribution and the keyboard
/// contribution, each clamped to `[-1, 1]` on its own, so the sum may reach
/// ±2. Only the direction survives [`resolve_intent`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveAxes {
    pub horizontal: f32,
    pub vertical: f32,
}

impl MoveAxes {
    #[must_use]
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Combine the on-screen stick with the keyboard movement actions.
    #[must_use]
    pub fn gather(actions: &ActionState, stick: Vec2) -> Self {
        let keys = Vec2::new(
            actions.action_value(Action::MoveRight) - actions.action_value(Action::MoveLeft),
            actions.action_value(Action::MoveForward) - actions.action_value(Action::MoveBack),
        )
        .clamp(Vec2::NEG_ONE, Vec2::ONE);
        let stick = stick.clamp(Vec2::NEG_ONE, Vec2::ONE);
        Self::new(stick.x + keys.x, stick.y + keys.y)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.horizontal == 0.0 && self.vertical == 0.0
    }
}

/// Right-hand vector of a flattened camera forward: `(f.z, 0, -f.x)`.
#[must_use]
pub fn camera_right(forward: Vec3) -> Vec3 {
    Vec3::new(forward.z, 0.0, -forward.x)
}

/// `normalize(forward * vertical + right * horizontal)`, or zero when there is
/// no input (or the inputs cancel out).
#[must_use]
pub fn resolve_intent(axes: MoveAxes, camera_forward: Vec3) -> Vec3 {
    if axes.is_zero() {
        return Vec3::ZERO;
    }
    (camera_forward * axes.vertical + camera_right(camera_forward) * axes.horizontal)
        .normalize_or_zero()
}
