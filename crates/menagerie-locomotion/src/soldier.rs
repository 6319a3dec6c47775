//! Infantry movement: walk, held run, prone toggle with a slow crawl, and a
//! trigger-driven jump that is refused while prone.

use menagerie_config::{AvatarKind, SoldierTuning};
use menagerie_input::Action;
use tracing::debug;

use crate::animation::params;
use crate::locomotion::{Actuators, Locomotion, MovementFlags, StepInput, Stride};

#[derive(Debug, Clone)]
pub struct SoldierMovement {
    stride: Stride,
    prone_speed_factor: f32,
    prone: bool,
}

impl SoldierMovement {
    #[must_use]
    pub fn new(tuning: &SoldierTuning) -> Self {
        Self {
            stride: Stride::new(&tuning.gait),
            prone_speed_factor: tuning.prone_speed_factor,
            prone: false,
        }
    }

    #[must_use]
    pub fn is_prone(&self) -> bool {
        self.prone
    }

    fn toggle_prone(&mut self, act: &mut Actuators<'_>) {
        self.prone = !self.prone;
        act.animator.set_bool(params::PRONE, self.prone);
        debug!(prone = self.prone, "Soldier stance changed");
    }

    fn crawl(&mut self, act: &mut Actuators<'_>, input: &StepInput<'_>) {
        let speed = self.stride.tuning.speed * self.prone_speed_factor;
        self.stride.drive(act, input.intent, speed, input.dt);
        act.animator.set_bool(params::WALKING, false);
        act.animator.set_bool(params::RUNNING, false);
        act.animator.set_bool(params::PRONE_WALK, true);
    }

    fn walk(&mut self, act: &mut Actuators<'_>, input: &StepInput<'_>) {
        let speed = self.stride.speed();
        self.stride.drive(act, input.intent, speed, input.dt);
        self.stride.publish_gait(act);
    }

    fn stop(&mut self, act: &mut Actuators<'_>) {
        self.stride.halt(act);
        act.animator.set_bool(params::PRONE_WALK, false);
    }

    fn jump(&mut self, act: &mut Actuators<'_>) {
        if !self.stride.grounded || self.prone {
            return;
        }
        act.animator.set_trigger(params::DO_JUMP);
        self.stride.launch(act);
    }
}

impl Locomotion for SoldierMovement {
    fn kind(&self) -> AvatarKind {
        AvatarKind::Soldier
    }

    fn is_active(&self) -> bool {
        self.stride.active
    }

    fn set_active(&mut self, active: bool, act: &mut Actuators<'_>) {
        self.stride.active = active;
        if !active {
            self.stop(act);
        }
    }

    fn step(&mut self, input: &StepInput<'_>, act: &mut Actuators<'_>) {
        if !self.stride.active {
            self.stop(act);
            return;
        }
        if input.actions.action_just_activated(Action::Prone) {
            self.toggle_prone(act);
        }

        if input.intent.length_squared() > 0.0 {
            if self.prone {
                self.crawl(act, input);
            } else {
                self.walk(act, input);
            }
        } else {
            self.stop(act);
        }

        // Held run; the crawl ignores it.
        if !self.prone {
            self.stride.running = input.actions.is_action_active(Action::Run);
        }

        if input.actions.action_just_activated(Action::Jump) {
            self.jump(act);
        }
    }

    fn on_ground_contact(&mut self, act: &mut Actuators<'_>) {
        self.stride.grounded = true;
        act.animator.set_bool(params::JUMPING, false);
    }

    fn flags(&self) -> MovementFlags {
        MovementFlags {
            prone: self.prone,
            ..self.stride.base_flags()
        }
    }
}
