//! The physics surface a character drives, and a small arcade integrator that
//! implements it for headless runs and tests.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};

/// Collision tag that re-grounds a character.
pub const GROUND_TAG: &str = "Ground";

/// Physics body contract: linear velocity, position, facing, impulses,
/// gravity response and the grounded flag. Integration itself belongs to
/// whoever owns the body.
pub trait Body {
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    /// Instantaneous change of momentum.
    fn apply_impulse(&mut self, impulse: Vec3);
    fn set_gravity_enabled(&mut self, enabled: bool);
    fn gravity_enabled(&self) -> bool;
    /// Resting on the ground as of the last integration.
    fn is_grounded(&self) -> bool;
}

/// Shared handle, so the engine can integrate a body a character also owns.
impl<B: Body + ?Sized> Body for Rc<RefCell<B>> {
    fn linear_velocity(&self) -> Vec3 {
        self.borrow().linear_velocity()
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.borrow_mut().set_linear_velocity(velocity);
    }
    fn position(&self) -> Vec3 {
        self.borrow().position()
    }
    fn set_position(&mut self, position: Vec3) {
        self.borrow_mut().set_position(position);
    }
    fn rotation(&self) -> Quat {
        self.borrow().rotation()
    }
    fn set_rotation(&mut self, rotation: Quat) {
        self.borrow_mut().set_rotation(rotation);
    }
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.borrow_mut().apply_impulse(impulse);
    }
    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.borrow_mut().set_gravity_enabled(enabled);
    }
    fn gravity_enabled(&self) -> bool {
        self.borrow().gravity_enabled()
    }
    fn is_grounded(&self) -> bool {
        self.borrow().is_grounded()
    }
}

/// A collision reported by [`KinematicBody::integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub tag: &'static str,
}

/// Point-mass body over an infinite ground plane.
///
/// Semi-implicit Euler with optional gravity. Landing on the plane reports a
/// [`GROUND_TAG`] contact once; resting on it reports nothing.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    velocity: Vec3,
    position: Vec3,
    rotation: Quat,
    gravity_enabled: bool,
    /// Vertical acceleration in units/s² (negative is down).
    pub gravity: f32,
    pub mass: f32,
    pub ground_height: f32,
    resting: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl KinematicBody {
    /// Body at `position`, resting if it starts on or below the ground plane.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            velocity: Vec3::ZERO,
            position,
            rotation: Quat::IDENTITY,
            gravity_enabled: true,
            gravity: -9.81,
            mass: 1.0,
            ground_height: 0.0,
            resting: position.y <= 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns the ground contact if the body landed.
    pub fn integrate(&mut self, dt: f32) -> Option<Contact> {
        if self.resting && self.velocity.y > 0.0 {
            self.resting = false;
        }
        if self.gravity_enabled && !self.resting {
            self.velocity.y += self.gravity * dt;
        }
        self.position += self.velocity * dt;

        if self.position.y <= self.ground_height {
            self.position.y = self.ground_height;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            if !self.resting {
                self.resting = true;
                return Some(Contact { tag: GROUND_TAG });
            }
        } else {
            self.resting = false;
        }
        None
    }
}

impl Body for KinematicBody {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
    fn position(&self) -> Vec3 {
        self.position
    }
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
    fn rotation(&self) -> Quat {
        self.rotation
    }
    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass;
    }
    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }
    fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }
    fn is_grounded(&self) -> bool {
        self.resting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_on_ground_stays_put() {
        let mut body = KinematicBody::default();
        for _ in 0..10 {
            assert!(body.integrate(1.0 / 60.0).is_none());
        }
        assert_eq!(body.position(), Vec3::ZERO);
    }

    #[test]
    fn test_jump_lands_with_single_contact() {
        let mut body = KinematicBody::default();
        body.apply_impulse(Vec3::Y * 5.0);
        let mut contacts = 0;
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            if let Some(contact) = body.integrate(1.0 / 60.0) {
                assert_eq!(contact.tag, GROUND_TAG);
                contacts += 1;
            }
            peak = peak.max(body.position().y);
        }
        assert_eq!(contacts, 1);
        assert!(peak > 1.0);
        assert_eq!(body.position().y, 0.0);
        assert!(body.is_grounded());
    }

    #[test]
    fn test_shared_handle_reports_grounded() {
        let shared = Rc::new(RefCell::new(KinematicBody::default()));
        let mut handle = Rc::clone(&shared);
        assert!(handle.is_grounded());
        handle.apply_impulse(Vec3::Y * 5.0);
        shared.borrow_mut().integrate(1.0 / 60.0);
        assert!(!handle.is_grounded());
    }

    #[test]
    fn test_gravity_disabled_holds_altitude() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 3.0, 0.0));
        body.set_gravity_enabled(false);
        body.integrate(0.5);
        assert_eq!(body.position().y, 3.0);
    }

    #[test]
    fn test_impulse_scales_with_mass() {
        let mut body = KinematicBody::default();
        body.mass = 2.0;
        body.apply_impulse(Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(body.linear_velocity(), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_shared_handle_sees_writes() {
        let shared = Rc::new(RefCell::new(KinematicBody::default()));
        let mut handle = Rc::clone(&shared);
        handle.set_linear_velocity(Vec3::X);
        assert_eq!(shared.borrow().linear_velocity(), Vec3::X);
    }
}
