//! Input abstraction: keyboard, mouse and on-screen controls mapped through
//! action bindings, plus the camera-relative movement intent resolver.

pub mod action_map;
pub mod direction;
pub mod keyboard;
pub mod mouse;
pub mod touch;

pub use action_map::{
    Action, ActionResolver, ActionState, InputBinding, InputMap, MouseAxisBinding,
    MouseButtonBinding, parse_action, parse_keycode,
};
pub use direction::{MoveAxes, camera_right, resolve_intent};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
pub use touch::{TouchButton, TouchPanel};
