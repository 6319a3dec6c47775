//! One scripted play session: input devices, the scene and the script cursor.

use menagerie_config::Config;
use menagerie_input::{
    ActionResolver, ActionState, InputMap, KeyboardState, MouseState, RawKeyEvent, TouchPanel,
    parse_keycode,
};
use menagerie_locomotion::params;
use tracing::{debug, info, warn};
use winit::event::{ElementState, MouseButton};

use crate::scene::Scene;
use crate::script::{Cue, Script};

/// Default avatar bindings with the config's key overrides and look scale
/// applied. Also returns how many overrides took.
#[must_use]
pub fn input_map_for(config: &Config) -> (InputMap, usize) {
    let mut input_map = InputMap::default_avatar();
    let overridden = input_map.apply_overrides(&config.input.keybindings);
    input_map.mouse_axis_scale = config.camera.look_scale;
    (input_map, overridden)
}

pub struct Session {
    scene: Scene,
    input_map: InputMap,
    keyboard: KeyboardState,
    mouse: MouseState,
    touch: TouchPanel,
    actions: ActionState,
    script: Script,
    dragging: bool,
    rejected: usize,
}

impl Session {
    #[must_use]
    pub fn new(scene: Scene, input_map: InputMap, script: Script) -> Self {
        Self {
            scene,
            input_map,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            touch: TouchPanel::new(),
            actions: ActionState::new(),
            script,
            dragging: false,
            rejected: 0,
        }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Swap in bindings from a reloaded config. Held keys stay held.
    pub fn rebind(&mut self, config: &Config) {
        let (input_map, overridden) = input_map_for(config);
        self.input_map = input_map;
        info!(overridden, "Key bindings reloaded");
    }

    /// Commands the manager refused so far.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// One fixed update: apply cues, resolve actions, step the active avatar
    /// and the camera, then integrate physics.
    pub fn update(&mut self, dt: f32, index: u64) {
        let cues: Vec<Cue> = self.script.cues_at(index).cloned().collect();
        for cue in cues {
            self.apply(cue);
        }

        ActionResolver::resolve(
            &self.input_map,
            &self.keyboard,
            &self.mouse,
            &self.touch,
            &mut self.actions,
        );
        self.scene
            .manager
            .tick(&self.actions, self.touch.stick(), dt);
        self.scene.step_physics(dt);

        self.keyboard.clear_transients();
        self.mouse.clear_transients();
        if self.dragging {
            self.mouse
                .on_button(MouseButton::Left, ElementState::Released);
            self.dragging = false;
        }
    }

    fn apply(&mut self, cue: Cue) {
        debug!(?cue, "Cue");
        let manager = &mut self.scene.manager;
        let result = match cue {
            Cue::Select(index) => manager.select_avatar(index),
            Cue::Hub => {
                manager.back_to_main_hub();
                Ok(())
            }
            Cue::OpenOverlay => manager.open_overlay(),
            Cue::CloseOverlay => manager.close_overlay(),
            Cue::Press(key) => {
                if let Some(code) = parse_keycode(&key) {
                    self.keyboard.process_raw(RawKeyEvent::press(code));
                }
                Ok(())
            }
            Cue::Release(key) => {
                if let Some(code) = parse_keycode(&key) {
                    self.keyboard.process_raw(RawKeyEvent::release(code));
                }
                Ok(())
            }
            Cue::TouchDown(button) => {
                self.touch.press(button);
                Ok(())
            }
            Cue::TouchUp(button) => {
                self.touch.release(button);
                Ok(())
            }
            Cue::Stick(x, y) => {
                self.touch.set_stick(glam::Vec2::new(x, y));
                Ok(())
            }
            Cue::Drag(dx) => {
                self.mouse
                    .on_button(MouseButton::Left, ElementState::Pressed);
                self.mouse.on_raw_motion(f64::from(dx), 0.0);
                self.dragging = true;
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!(%err, "Command rejected");
            self.rejected += 1;
        }
    }

    /// Log where everyone ended up.
    pub fn report(&self) {
        let manager = &self.scene.manager;
        info!(
            active = manager.active_character_id().unwrap_or("hub"),
            rejected = self.rejected,
            camera_yaw = manager.camera().yaw(),
            "Session finished"
        );
        for (index, slot) in manager.roster().slots().enumerate() {
            let Some(model) = slot.model.as_ref() else {
                continue;
            };
            info!(
                index,
                avatar = %slot.id,
                kind = ?model.kind(),
                position = ?model.position(),
                flags = ?model.flags(),
                walking = self.scene.animation_flag(index, params::WALKING),
                hovering = self.scene.animation_flag(index, params::HOVERING),
                "Avatar state"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::script::ScriptEvent;

    fn session(events: Vec<ScriptEvent>) -> Session {
        let scene = Scene::from_config(&Config::default()).unwrap();
        Session::new(scene, InputMap::default_avatar(), Script { events })
    }

    fn run(session: &mut Session, updates: u64) {
        for i in 0..updates {
            session.update(1.0 / 60.0, i);
        }
    }

    fn at(at: u64, cue: Cue) -> ScriptEvent {
        ScriptEvent { at, cue }
    }

    #[test]
    fn test_scripted_walk_moves_penguin_forward() {
        let mut session = session(vec![
            at(0, Cue::Select(0)),
            at(1, Cue::Press("KeyW".into())),
        ]);
        run(&mut session, 30);
        let position = session.scene().body_position(0).unwrap();
        assert!(position.z > 1.0);
        assert!(session.scene().animation_flag(0, params::WALKING));
        // Others never moved.
        assert_eq!(session.scene().body_position(3).map(|p| p.z), Some(0.0));
    }

    #[test]
    fn test_scripted_double_jump_hovers() {
        let mut session = session(vec![
            at(0, Cue::Select(1)),
            at(2, Cue::Press("Space".into())),
            at(3, Cue::Release("Space".into())),
            at(10, Cue::Press("Space".into())),
        ]);
        run(&mut session, 12);
        let flags = session.scene().manager.character(1).unwrap().flags();
        assert!(flags.hovering);
        assert_eq!(flags.jump_count, 2);
        assert!(session.scene().animation_flag(1, params::HOVERING));
    }

    #[test]
    fn test_touch_run_toggles_monkey() {
        let mut session = session(vec![
            at(0, Cue::Select(2)),
            at(1, Cue::Stick(0.0, 1.0)),
            at(2, Cue::TouchDown(menagerie_input::TouchButton::Run)),
            at(3, Cue::TouchUp(menagerie_input::TouchButton::Run)),
        ]);
        run(&mut session, 10);
        assert!(session.scene().manager.character(2).unwrap().flags().running);
    }

    #[test]
    fn test_drag_rotates_camera_once() {
        let mut session = session(vec![at(0, Cue::Select(3)), at(1, Cue::Drag(25.0))]);
        run(&mut session, 5);
        let yaw = session.scene().manager.camera().yaw();
        assert!(yaw > 0.0);
        run(&mut session, 5);
        assert_eq!(session.scene().manager.camera().yaw(), yaw);
    }

    #[test]
    fn test_demo_tour_ends_on_hub() {
        let script = Script::demo();
        let updates = script.len_updates() + 30;
        let scene = Scene::from_config(&Config::default()).unwrap();
        let mut session = Session::new(scene, InputMap::default_avatar(), script);
        run(&mut session, updates);
        let manager = &session.scene().manager;
        assert_eq!(manager.active_index(), None);
        assert!(manager.roster().hub_visible());
        assert_eq!(session.rejected(), 1);
    }

    #[test]
    fn test_rebind_applies_reloaded_keys() {
        let mut session = session(vec![
            at(0, Cue::Select(0)),
            at(1, Cue::Press("KeyT".into())),
        ]);
        run(&mut session, 10);
        assert_eq!(session.scene().body_position(0).map(|p| p.z), Some(0.0));

        let config = Config {
            input: menagerie_config::InputConfig {
                keybindings: HashMap::from([("MoveForward".to_string(), "KeyT".to_string())]),
            },
            ..Config::default()
        };
        session.rebind(&config);
        for i in 10..30 {
            session.update(1.0 / 60.0, i);
        }
        assert!(session.scene().body_position(0).is_some_and(|p| p.z > 0.5));
    }
}
