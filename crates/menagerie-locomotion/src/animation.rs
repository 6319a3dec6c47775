//! Animation-state sink: named booleans and one-shot triggers consumed by
//! clip playback elsewhere. Fire-and-forget; unknown names are fine.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Animator parameter names.
pub mod params {
    pub const WALKING: &str = "isWalking";
    pub const RUNNING: &str = "isRunning";
    pub const JUMPING: &str = "isJumping";
    /// Trigger fired by the prone-capable soldier's jump.
    pub const DO_JUMP: &str = "doJumping";
    pub const PRONE: &str = "isProne";
    /// Crawling while prone.
    pub const PRONE_WALK: &str = "isPW";
    pub const SLIDING: &str = "isSliding";
    /// Trigger.
    pub const DANCE: &str = "Dance";
    pub const ROLLING: &str = "isRolling";
    pub const HOVERING: &str = "isHovering";
}

pub trait AnimationSink {
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_trigger(&mut self, name: &str);
    fn reset_trigger(&mut self, name: &str);
}

/// Records parameter writes so callers can inspect them.
#[derive(Debug, Clone, Default)]
pub struct AnimatorState {
    bools: HashMap<String, bool>,
    triggers: HashSet<String>,
}

impl AnimatorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written for `name`; unset reads as `false`.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_triggered(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }

    /// Read and clear a trigger, as a state machine would on transition.
    pub fn consume_trigger(&mut self, name: &str) -> bool {
        self.triggers.remove(name)
    }
}

impl AnimationSink for AnimatorState {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    fn set_trigger(&mut self, name: &str) {
        self.triggers.insert(name.to_string());
    }

    fn reset_trigger(&mut self, name: &str) {
        self.triggers.remove(name);
    }
}

impl<A: AnimationSink + ?Sized> AnimationSink for Rc<RefCell<A>> {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.borrow_mut().set_bool(name, value);
    }

    fn set_trigger(&mut self, name: &str) {
        self.borrow_mut().set_trigger(name);
    }

    fn reset_trigger(&mut self, name: &str) {
        self.borrow_mut().reset_trigger(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_bool_reads_false() {
        assert!(!AnimatorState::new().get_bool(params::WALKING));
    }

    #[test]
    fn test_trigger_set_reset_consume() {
        let mut anim = AnimatorState::new();
        anim.set_trigger(params::DANCE);
        assert!(anim.is_triggered(params::DANCE));
        anim.reset_trigger(params::DANCE);
        assert!(!anim.is_triggered(params::DANCE));

        anim.set_trigger(params::DO_JUMP);
        assert!(anim.consume_trigger(params::DO_JUMP));
        assert!(!anim.consume_trigger(params::DO_JUMP));
    }

    #[test]
    fn test_shared_handle_records() {
        let shared = Rc::new(RefCell::new(AnimatorState::new()));
        let mut sink = Rc::clone(&shared);
        sink.set_bool(params::HOVERING, true);
        assert!(shared.borrow().get_bool(params::HOVERING));
    }
}
