//! Scripted input for headless sessions.
//!
//! A script is a RON list of cues, each pinned to the fixed-update index at
//! which it fires:
//!
//! ```ron
//! (events: [
//!     (at: 0, cue: Select(2)),
//!     (at: 5, cue: Press("KeyW")),
//!     (at: 40, cue: Release("KeyW")),
//!     (at: 60, cue: Hub),
//! ])
//! ```

use std::path::Path;

use menagerie_input::{TouchButton, parse_keycode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse script: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("cue at update {at} names unknown key '{key}'")]
    UnknownKey { at: u64, key: String },
}

/// Something the player does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    /// Pick an avatar on the hub (may be out of range, to exercise rejection).
    Select(i32),
    Hub,
    OpenOverlay,
    CloseOverlay,
    /// Key down, by `KeyCode` name.
    Press(String),
    Release(String),
    TouchDown(TouchButton),
    TouchUp(TouchButton),
    /// On-screen stick deflection.
    Stick(f32, f32),
    /// Drag the camera: hold the left button and move the mouse by `dx`.
    Drag(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Fixed-update index the cue fires before.
    pub at: u64,
    pub cue: Cue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse and validate a script from RON text. Events are sorted by `at`;
    /// cues sharing an index keep their written order.
    pub fn from_ron(text: &str) -> Result<Self, ScriptError> {
        let mut script: Script = ron::from_str(text)?;
        script.validate()?;
        script.events.sort_by_key(|event| event.at);
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        for event in &self.events {
            let (Cue::Press(key) | Cue::Release(key)) = &event.cue else {
                continue;
            };
            if parse_keycode(key).is_none() {
                return Err(ScriptError::UnknownKey {
                    at: event.at,
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Cues firing at update `at`.
    pub fn cues_at(&self, at: u64) -> impl Iterator<Item = &Cue> {
        self.events
            .iter()
            .filter(move |event| event.at == at)
            .map(|event| &event.cue)
    }

    /// Index after the last cue.
    #[must_use]
    pub fn len_updates(&self) -> u64 {
        self.events.last().map_or(0, |event| event.at + 1)
    }

    /// A tour of every avatar: walk, each one's special move, a chat overlay
    /// round trip, a bad selection, and back to the hub.
    #[must_use]
    pub fn demo() -> Self {
        let mut events = Vec::new();
        let mut at = 0;
        let mut push = |step: u64, cue: Cue| {
            at += step;
            events.push(ScriptEvent { at, cue });
        };
        let key = |name: &str| name.to_string();

        // Penguin: walk, run, belly slide.
        push(0, Cue::Select(0));
        push(2, Cue::Press(key("KeyW")));
        push(20, Cue::Press(key("ShiftLeft")));
        push(20, Cue::Press(key("KeyC")));
        push(2, Cue::Release(key("KeyC")));
        push(40, Cue::Release(key("ShiftLeft")));
        push(0, Cue::Release(key("KeyW")));

        // Wukong: roll, then double jump into hover and lift.
        push(10, Cue::Select(1));
        push(2, Cue::Press(key("KeyD")));
        push(10, Cue::Press(key("ControlLeft")));
        push(2, Cue::Release(key("ControlLeft")));
        push(0, Cue::Release(key("KeyD")));
        push(60, Cue::Press(key("Space")));
        push(2, Cue::Release(key("Space")));
        push(10, Cue::Press(key("Space")));
        push(2, Cue::Release(key("Space")));
        push(2, Cue::Press(key("KeyO")));
        push(30, Cue::Release(key("KeyO")));
        push(10, Cue::Press(key("KeyI")));
        push(2, Cue::Release(key("KeyI")));

        // Monkey: sticky run, slide, dance.
        push(60, Cue::Select(2));
        push(2, Cue::Stick(0.0, 1.0));
        push(2, Cue::TouchDown(TouchButton::Run));
        push(2, Cue::TouchUp(TouchButton::Run));
        push(20, Cue::TouchDown(TouchButton::Slide));
        push(2, Cue::TouchUp(TouchButton::Slide));
        push(40, Cue::Stick(0.0, 0.0));
        push(2, Cue::Press(key("KeyV")));
        push(2, Cue::Release(key("KeyV")));
        push(30, Cue::OpenOverlay);
        push(30, Cue::CloseOverlay);

        // Soldier: prone crawl under a camera drag, then a rejected selection.
        push(10, Cue::Select(3));
        push(2, Cue::Press(key("KeyX")));
        push(2, Cue::Release(key("KeyX")));
        push(2, Cue::Press(key("KeyW")));
        push(2, Cue::Drag(25.0));
        push(30, Cue::Release(key("KeyW")));
        push(2, Cue::Select(7));
        push(10, Cue::Hub);
        push(2, Cue::Hub);

        Self { events }
    }
}
