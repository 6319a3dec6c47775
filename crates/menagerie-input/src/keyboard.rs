//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] collects key events during a frame and answers, per
//! physical key: is it held, did it go down this frame, did it come up this
//! frame. Physical codes keep WASD working on any layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Platform-independent key event.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub state: ElementState,
    /// OS auto-repeat; ignored.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// A non-repeat press of `key`.
    #[must_use]
    pub fn press(key: KeyCode) -> Self {
        Self {
            key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// A release of `key`.
    #[must_use]
    pub fn release(key: KeyCode) -> Self {
        Self {
            key,
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Held / just-pressed / just-released sets for the current frame.
///
/// Call [`clear_transients`](Self::clear_transients) once the frame's
/// simulation step has consumed the edges.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit [`KeyEvent`]. Keys without a known physical code are dropped.
    pub fn process_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key) = event.physical_key {
            self.process_raw(RawKeyEvent {
                key,
                state: event.state,
                repeat: event.repeat,
            });
        }
    }

    /// Feed a [`RawKeyEvent`].
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(event.key) {
                    self.pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.held.remove(&event.key) {
                    self.released.insert(event.key);
                }
            }
        }
    }

    #[must_use]
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Digital axis in `{-1, 0, 1}` from a negative/positive key pair.
    #[must_use]
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_held(negative) {
            value -= 1.0;
        }
        if self.is_held(positive) {
            value += 1.0;
        }
        value
    }

    /// Forget this frame's edges; held keys stay held.
    pub fn clear_transients(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_no_keys_held() {
        let kb = KeyboardState::new();
        for key in [KeyCode::KeyW, KeyCode::Space, KeyCode::ShiftLeft] {
            assert!(!kb.is_held(key));
            assert!(!kb.just_pressed(key));
            assert!(!kb.just_released(key));
        }
    }

    #[test]
    fn test_press_is_held_and_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::Space));
        assert!(kb.is_held(KeyCode::Space));
        assert!(kb.just_pressed(KeyCode::Space));
        kb.clear_transients();
        assert!(!kb.just_pressed(KeyCode::Space));
        assert!(kb.is_held(KeyCode::Space));
    }

    #[test]
    fn test_release_edge_lasts_one_frame() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::ShiftLeft));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent::release(KeyCode::ShiftLeft));
        assert!(kb.just_released(KeyCode::ShiftLeft));
        assert!(!kb.is_held(KeyCode::ShiftLeft));
        kb.clear_transients();
        assert!(!kb.just_released(KeyCode::ShiftLeft));
    }

    #[test]
    fn test_release_without_press_has_no_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::release(KeyCode::KeyX));
        assert!(!kb.just_released(KeyCode::KeyX));
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyA));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::press(KeyCode::KeyA)
        });
        assert!(!kb.just_pressed(KeyCode::KeyA));
        assert!(kb.is_held(KeyCode::KeyA));
    }

    #[test]
    fn test_axis_cancels_opposing_keys() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyD));
        assert_eq!(kb.axis(KeyCode::KeyA, KeyCode::KeyD), 1.0);
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyA));
        assert_eq!(kb.axis(KeyCode::KeyA, KeyCode::KeyD), 0.0);
        kb.process_raw(RawKeyEvent::release(KeyCode::KeyD));
        assert_eq!(kb.axis(KeyCode::KeyA, KeyCode::KeyD), -1.0);
    }
}
