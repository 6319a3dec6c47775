//! Action mapping: abstract character actions bound to physical inputs.
//!
//! [`InputMap`] says which keys, mouse inputs and on-screen buttons trigger
//! which [`Action`]s. [`ActionResolver`] recomputes [`ActionState`] once per
//! frame from the keyboard, mouse and touch panel.

use crate::keyboard::KeyboardState;
use crate::mouse::MouseState;
use crate::touch::{TouchButton, TouchPanel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Serde helper for [`KeyCode`], which has no serde support of its own.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::parse_keycode(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Parse a key name as printed by `KeyCode`'s `Debug` impl (e.g. `"KeyW"`).
pub fn parse_keycode(s: &str) -> Option<KeyCode> {
    Some(match s {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    })
}

/// Things a player can ask a character (or the camera) to do.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,
    /// Held or toggled depending on the character.
    Run,
    Prone,
    Slide,
    Roll,
    Dance,
    ToggleHover,
    HoverLift,
    HoverDescend,
    /// While held, `LookX` turns the follow camera.
    RotateCamera,
    /// Horizontal look axis.
    LookX,
}

/// Look up an [`Action`] by its variant name.
#[must_use]
pub fn parse_action(name: &str) -> Option<Action> {
    Some(match name {
        "MoveForward" => Action::MoveForward,
        "MoveBack" => Action::MoveBack,
        "MoveLeft" => Action::MoveLeft,
        "MoveRight" => Action::MoveRight,
        "Jump" => Action::Jump,
        "Run" => Action::Run,
        "Prone" => Action::Prone,
        "Slide" => Action::Slide,
        "Roll" => Action::Roll,
        "Dance" => Action::Dance,
        "ToggleHover" => Action::ToggleHover,
        "HoverLift" => Action::HoverLift,
        "HoverDescend" => Action::HoverDescend,
        "RotateCamera" => Action::RotateCamera,
        "LookX" => Action::LookX,
        _ => return None,
    })
}

/// Which mouse axis to read for an analog binding.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseAxisBinding {
    X,
    Y,
}

/// Serde-friendly mirror of the winit mouse buttons we bind.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseButtonBinding {
    Left,
    Right,
    Middle,
}

impl MouseButtonBinding {
    #[must_use]
    pub fn to_winit(self) -> MouseButton {
        match self {
            Self::Left => MouseButton::Left,
            Self::Right => MouseButton::Right,
            Self::Middle => MouseButton::Middle,
        }
    }
}

/// A physical input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputBinding {
    Key(#[serde(with = "keycode_serde")] KeyCode),
    MouseButton(MouseButtonBinding),
    /// Mouse delta scaled by [`InputMap::mouse_axis_scale`].
    MouseAxis(MouseAxisBinding),
    Touch(TouchButton),
}

fn default_mouse_axis_scale() -> f32 {
    0.1
}

/// Maps [`Action`]s to lists of [`InputBinding`]s.
///
/// Multiple bindings per action are OR-ed for digital inputs and summed then
/// clamped for analog ones. Serializable to RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMap {
    pub bindings: HashMap<Action, Vec<InputBinding>>,
    /// Pixels of mouse travel per unit of look axis.
    #[serde(default = "default_mouse_axis_scale")]
    pub mouse_axis_scale: f32,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_avatar()
    }
}

impl InputMap {
    /// An input map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            mouse_axis_scale: default_mouse_axis_scale(),
        }
    }

    /// Default avatar bindings: WASD/arrows, Space jump, LeftShift run, X prone,
    /// C or LeftControl slide, LeftControl roll, V dance, I/O/P hover, left-drag
    /// camera, plus the on-screen buttons.
    #[must_use]
    pub fn default_avatar() -> Self {
        use InputBinding::{Key, MouseAxis, MouseButton, Touch};

        let mut map = Self::new();
        map.set_bindings(
            Action::MoveForward,
            vec![Key(KeyCode::KeyW), Key(KeyCode::ArrowUp)],
        );
        map.set_bindings(
            Action::MoveBack,
            vec![Key(KeyCode::KeyS), Key(KeyCode::ArrowDown)],
        );
        map.set_bindings(
            Action::MoveLeft,
            vec![Key(KeyCode::KeyA), Key(KeyCode::ArrowLeft)],
        );
        map.set_bindings(
            Action::MoveRight,
            vec![Key(KeyCode::KeyD), Key(KeyCode::ArrowRight)],
        );
        map.set_bindings(
            Action::Jump,
            vec![Key(KeyCode::Space), Touch(TouchButton::Jump)],
        );
        map.set_bindings(
            Action::Run,
            vec![Key(KeyCode::ShiftLeft), Touch(TouchButton::Run)],
        );
        map.set_bindings(Action::Prone, vec![Key(KeyCode::KeyX)]);
        map.set_bindings(
            Action::Slide,
            vec![
                Key(KeyCode::KeyC),
                Key(KeyCode::ControlLeft),
                Touch(TouchButton::Slide),
            ],
        );
        map.set_bindings(
            Action::Roll,
            vec![Key(KeyCode::ControlLeft), Touch(TouchButton::Roll)],
        );
        map.set_bindings(
            Action::Dance,
            vec![Key(KeyCode::KeyV), Touch(TouchButton::Dance)],
        );
        map.set_bindings(
            Action::ToggleHover,
            vec![Key(KeyCode::KeyI), Touch(TouchButton::Hover)],
        );
        map.set_bindings(Action::HoverLift, vec![Key(KeyCode::KeyO)]);
        map.set_bindings(Action::HoverDescend, vec![Key(KeyCode::KeyP)]);
        map.set_bindings(
            Action::RotateCamera,
            vec![MouseButton(MouseButtonBinding::Left)],
        );
        map.set_bindings(Action::LookX, vec![MouseAxis(MouseAxisBinding::X)]);
        map
    }

    /// Set the bindings for an action, replacing any existing ones.
    pub fn set_bindings(&mut self, action: Action, bindings: Vec<InputBinding>) {
        self.bindings.insert(action, bindings);
    }

    #[must_use]
    pub fn get_bindings(&self, action: &Action) -> &[InputBinding] {
        self.bindings.get(action).map_or(&[], |v| v.as_slice())
    }

    /// Apply `action name -> key name` overrides from the config file.
    ///
    /// The key replaces the action's keyboard bindings; mouse and touch
    /// bindings are kept. Unknown names are logged and skipped. Returns the
    /// number of overrides applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> usize {
        let mut applied = 0;
        for (action_name, key_name) in overrides {
            let (Some(action), Some(key)) = (parse_action(action_name), parse_keycode(key_name))
            else {
                warn!("Ignoring keybinding override {action_name} -> {key_name}");
                continue;
            };
            let bindings = self.bindings.entry(action).or_default();
            bindings.retain(|b| !matches!(b, InputBinding::Key(_)));
            bindings.insert(0, InputBinding::Key(key));
            applied += 1;
        }
        applied
    }

    /// Serialize to RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

/// Threshold below which an action is considered inactive.
const ACTIVATION_THRESHOLD: f32 = 0.001;

/// Per-frame action values with previous-frame values kept for edges.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    values: HashMap<Action, f32>,
    prev_values: HashMap<Action, f32>,
}

impl ActionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift this frame's values into the previous slot and clear.
    pub fn begin_frame(&mut self) {
        self.prev_values.clone_from(&self.values);
        self.values.clear();
    }

    /// Set an action's value for the current frame, clamped to `[-1, 1]`.
    pub fn set_value(&mut self, action: Action, value: f32) {
        self.values.insert(action, value.clamp(-1.0, 1.0));
    }

    #[must_use]
    pub fn is_action_active(&self, action: Action) -> bool {
        self.action_value(action).abs() > ACTIVATION_THRESHOLD
    }

    #[must_use]
    pub fn action_value(&self, action: Action) -> f32 {
        self.values.get(&action).copied().unwrap_or(0.0)
    }

    fn was_active(&self, action: Action) -> bool {
        self.prev_values.get(&action).copied().unwrap_or(0.0).abs() > ACTIVATION_THRESHOLD
    }

    /// True only on the frame the action went from inactive to active.
    #[must_use]
    pub fn action_just_activated(&self, action: Action) -> bool {
        self.is_action_active(action) && !self.was_active(action)
    }

    /// True only on the frame the action went from active to inactive.
    #[must_use]
    pub fn action_just_deactivated(&self, action: Action) -> bool {
        !self.is_action_active(action) && self.was_active(action)
    }
}

/// Populates [`ActionState`] from raw input each frame.
pub struct ActionResolver;

impl ActionResolver {
    /// Resolve all actions. Call once per frame after input events are in.
    pub fn resolve(
        input_map: &InputMap,
        keyboard: &KeyboardState,
        mouse: &MouseState,
        touch: &TouchPanel,
        state: &mut ActionState,
    ) {
        state.begin_frame();

        for (action, bindings) in &input_map.bindings {
            let value: f32 = bindings
                .iter()
                .map(|b| Self::read_binding(b, input_map.mouse_axis_scale, keyboard, mouse, touch))
                .sum();
            state.set_value(*action, value);
        }
    }

    fn read_binding(
        binding: &InputBinding,
        mouse_axis_scale: f32,
        keyboard: &KeyboardState,
        mouse: &MouseState,
        touch: &TouchPanel,
    ) -> f32 {
        let digital = |on: bool| if on { 1.0 } else { 0.0 };
        match binding {
            InputBinding::Key(code) => digital(keyboard.is_held(*code)),
            InputBinding::MouseButton(btn) => digital(mouse.is_button_pressed(btn.to_winit())),
            InputBinding::MouseAxis(axis) => {
                let d = mouse.delta();
                match axis {
                    MouseAxisBinding::X => d.x * mouse_axis_scale,
                    MouseAxisBinding::Y => d.y * mouse_axis_scale,
                }
            }
            InputBinding::Touch(button) => digital(touch.is_held(*button)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;
    use winit::event::ElementState;

    fn resolve(map: &InputMap, kb: &KeyboardState, state: &mut ActionState) {
        ActionResolver::resolve(map, kb, &MouseState::new(), &TouchPanel::new(), state);
    }

    #[test]
    fn test_action_bound_to_key_activates_on_press() {
        let map = InputMap::default_avatar();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::Space));

        let mut state = ActionState::new();
        resolve(&map, &kb, &mut state);
        assert!(state.is_action_active(Action::Jump));
        assert!(state.action_just_activated(Action::Jump));
    }

    #[test]
    fn test_touch_button_and_key_are_or_ed() {
        let map = InputMap::default_avatar();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::ShiftLeft));
        let mut touch = TouchPanel::new();
        touch.press(TouchButton::Run);

        let mut state = ActionState::new();
        ActionResolver::resolve(&map, &kb, &MouseState::new(), &touch, &mut state);
        assert!((state.action_value(Action::Run) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_control_drives_slide_and_roll() {
        let map = InputMap::default_avatar();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::ControlLeft));
        let mut state = ActionState::new();
        resolve(&map, &kb, &mut state);
        assert!(state.is_action_active(Action::Slide));
        assert!(state.is_action_active(Action::Roll));
    }

    #[test]
    fn test_mouse_drag_scaled_and_clamped() {
        let map = InputMap::default_avatar();
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_raw_motion(5.0, 0.0);

        let mut state = ActionState::new();
        ActionResolver::resolve(
            &map,
            &KeyboardState::new(),
            &mouse,
            &TouchPanel::new(),
            &mut state,
        );
        assert!(state.is_action_active(Action::RotateCamera));
        assert!((state.action_value(Action::LookX) - 0.5).abs() < 1e-6);

        mouse.on_raw_motion(500.0, 0.0);
        ActionResolver::resolve(
            &map,
            &KeyboardState::new(),
            &mouse,
            &TouchPanel::new(),
            &mut state,
        );
        assert!((state.action_value(Action::LookX) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_edges_across_frames() {
        let map = InputMap::default_avatar();
        let mut kb = KeyboardState::new();
        let mut state = ActionState::new();

        kb.process_raw(RawKeyEvent::press(KeyCode::ShiftLeft));
        resolve(&map, &kb, &mut state);
        assert!(state.action_just_activated(Action::Run));

        resolve(&map, &kb, &mut state);
        assert!(!state.action_just_activated(Action::Run));
        assert!(state.is_action_active(Action::Run));

        kb.process_raw(RawKeyEvent::release(KeyCode::ShiftLeft));
        resolve(&map, &kb, &mut state);
        assert!(state.action_just_deactivated(Action::Run));
    }

    #[test]
    fn test_unbound_action_is_zero() {
        let map = InputMap::new();
        let mut state = ActionState::new();
        resolve(&map, &KeyboardState::new(), &mut state);
        assert!(!state.is_action_active(Action::Dance));
        assert_eq!(state.action_value(Action::Dance), 0.0);
    }

    #[test]
    fn test_overrides_replace_keys_only() {
        let mut map = InputMap::default_avatar();
        let mut overrides = HashMap::new();
        overrides.insert("Jump".to_string(), "KeyJ".to_string());
        overrides.insert("Teleport".to_string(), "KeyT".to_string());

        assert_eq!(map.apply_overrides(&overrides), 1);
        let jump = map.get_bindings(&Action::Jump);
        assert_eq!(jump[0], InputBinding::Key(KeyCode::KeyJ));
        assert!(!jump.contains(&InputBinding::Key(KeyCode::Space)));
        assert!(jump.contains(&InputBinding::Touch(TouchButton::Jump)));
    }

    #[test]
    fn test_ron_round_trip_keeps_bindings() {
        let map = InputMap::default_avatar();
        let ron_str = map.to_ron().unwrap();
        assert!(ron_str.contains("ShiftLeft"));
        let parsed = InputMap::from_ron(&ron_str).unwrap();
        assert_eq!(
            parsed.get_bindings(&Action::Roll),
            map.get_bindings(&Action::Roll)
        );
    }

    #[test]
    fn test_unknown_key_name_rejected() {
        let bad = "(bindings: {Jump: [Key(\"Hyper\")]})";
        assert!(InputMap::from_ron(bad).is_err());
    }
}
