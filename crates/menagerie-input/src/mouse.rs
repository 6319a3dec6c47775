//! Frame-coherent mouse state: button holds and the drag delta the follow
//! camera turns into yaw.

use glam::Vec2;
use winit::event::{ElementState, MouseButton};

#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    held: bool,
    just_pressed: bool,
    just_released: bool,
}

fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

/// Mouse state accumulated over one frame.
///
/// Forward winit events through the `on_*` methods, read the accessors during
/// the frame step, then call [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    buttons: [ButtonFrame; 3],
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. The first event only seeds the position.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if let Some(old) = self.position {
            self.delta += new_pos - old;
        }
        self.position = Some(new_pos);
    }

    /// Process a raw `DeviceEvent::MouseMotion` delta.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        self.delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Process a `MouseInput` event. Back/forward/other buttons are ignored.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let Some(idx) = button_index(button) else {
            return;
        };
        let frame = &mut self.buttons[idx];
        match state {
            ElementState::Pressed => {
                frame.held = true;
                frame.just_pressed = true;
            }
            ElementState::Released => {
                frame.held = false;
                frame.just_released = true;
            }
        }
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.buttons[i].held)
    }

    #[must_use]
    pub fn just_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.buttons[i].just_pressed)
    }

    #[must_use]
    pub fn just_released(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.buttons[i].just_released)
    }

    /// Cursor movement accumulated this frame, in pixels.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Reset per-frame delta and button edges.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        for frame in &mut self.buttons {
            frame.just_pressed = false;
            frame.just_released = false;
        }
    }
}
