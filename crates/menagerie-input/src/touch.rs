//! On-screen controls: the virtual joystick and the per-character buttons.
//!
//! The UI layer writes into a [`TouchPanel`]; the action resolver reads it the
//! same way it reads the keyboard, so a tapped on-screen "Jump" and the space
//! bar are indistinguishable to a character.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Buttons drawn on an avatar's canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchButton {
    Jump,
    Run,
    Slide,
    Dance,
    Roll,
    Hover,
}

/// Virtual joystick position plus held on-screen buttons.
#[derive(Debug, Clone, Default)]
pub struct TouchPanel {
    stick: Vec2,
    held: HashSet<TouchButton>,
}

impl TouchPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the joystick deflection. Each component is clamped to `[-1, 1]`.
    pub fn set_stick(&mut self, value: Vec2) {
        self.stick = value.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    #[must_use]
    pub fn stick(&self) -> Vec2 {
        self.stick
    }

    /// Finger down on `button`.
    pub fn press(&mut self, button: TouchButton) {
        self.held.insert(button);
    }

    /// Finger up from `button`.
    pub fn release(&mut self, button: TouchButton) {
        self.held.remove(&button);
    }

    #[must_use]
    pub fn is_held(&self, button: TouchButton) -> bool {
        self.held.contains(&button)
    }

    /// Drop every held button and centre the stick, e.g. when a canvas hides.
    pub fn reset(&mut self) {
        self.stick = Vec2::ZERO;
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_clamped_per_axis() {
        let mut panel = TouchPanel::new();
        panel.set_stick(Vec2::new(2.0, -0.5));
        assert_eq!(panel.stick(), Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_press_release() {
        let mut panel = TouchPanel::new();
        panel.press(TouchButton::Run);
        assert!(panel.is_held(TouchButton::Run));
        panel.release(TouchButton::Run);
        assert!(!panel.is_held(TouchButton::Run));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut panel = TouchPanel::new();
        panel.press(TouchButton::Jump);
        panel.set_stick(Vec2::new(0.3, 0.3));
        panel.reset();
        assert!(!panel.is_held(TouchButton::Jump));
        assert_eq!(panel.stick(), Vec2::ZERO);
    }
}
