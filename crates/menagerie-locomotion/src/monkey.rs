//! Monkey movement: sticky run toggle, a timed forward slide that decays to a
//! stop, and a dance toggle that freezes movement while it plays.

use glam::Vec3;
use menagerie_config::{AvatarKind, MonkeyTuning};
use menagerie_input::Action;
use tracing::debug;

use crate::animation::params;
use crate::locomotion::{
    Actuators, Locomotion, MovementFlags, StepInput, Stride, facing_direction,
};

/// Countdown of an active slide.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlideTimer {
    remaining: f32,
}

#[derive(Debug, Clone)]
pub struct MonkeyMovement {
    stride: Stride,
    slide_speed: f32,
    slide_duration: f32,
    slide: Option<SlideTimer>,
    dancing: bool,
}

impl MonkeyMovement {
    #[must_use]
    pub fn new(tuning: &MonkeyTuning) -> Self {
        Self {
            stride: Stride::new(&tuning.gait),
            slide_speed: tuning.slide_speed,
            slide_duration: tuning.slide_duration,
            slide: None,
            dancing: false,
        }
    }

    #[must_use]
    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    #[must_use]
    pub fn is_dancing(&self) -> bool {
        self.dancing
    }

    fn toggle_dance(&mut self, act: &mut Actuators<'_>) {
        if self.slide.is_some() || !self.stride.grounded {
            return;
        }
        if self.dancing {
            self.dancing = false;
            act.animator.reset_trigger(params::DANCE);
        } else {
            self.dancing = true;
            act.animator.set_trigger(params::DANCE);
            self.stride.halt(act);
        }
        debug!(dancing = self.dancing, "Monkey dance toggled");
    }

    fn toggle_run(&mut self, act: &mut Actuators<'_>) {
        self.stride.running = !self.stride.running;
        act.animator.set_bool(params::RUNNING, self.stride.running);
    }

    fn handle_movement(&mut self, act: &mut Actuators<'_>, input: &StepInput<'_>) {
        if input.intent.length_squared() > 0.0 {
            let speed = self.stride.speed();
            self.stride.drive(act, input.intent, speed, input.dt);
            self.stride.publish_gait(act);
        } else {
            self.stride.halt(act);
        }
    }

    fn start_slide(&mut self, act: &mut Actuators<'_>) {
        self.slide = Some(SlideTimer {
            remaining: self.slide_duration,
        });
        act.animator.set_bool(params::SLIDING, true);
        debug!(duration = self.slide_duration, "Monkey slide started");
    }

    /// Ease the slide speed from full to zero over the slide duration.
    fn advance_slide(&mut self, act: &mut Actuators<'_>, dt: f32) {
        let Some(timer) = self.slide.as_mut() else {
            return;
        };
        timer.remaining -= dt;
        let remaining = timer.remaining;

        let fraction = if self.slide_duration > 0.0 {
            (remaining / self.slide_duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let speed = self.slide_speed * fraction;
        let forward = facing_direction(act.body.rotation());
        let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let v = act.body.linear_velocity();
        act.body
            .set_linear_velocity(Vec3::new(flat.x * speed, v.y, flat.z * speed));

        if remaining <= 0.0 {
            self.end_slide(act);
        }
    }

    fn end_slide(&mut self, act: &mut Actuators<'_>) {
        if self.slide.take().is_some() {
            act.animator.set_bool(params::SLIDING, false);
        }
    }

    fn jump(&mut self, act: &mut Actuators<'_>) {
        if !self.stride.grounded || self.slide.is_some() {
            return;
        }
        act.animator.set_bool(params::JUMPING, true);
        self.stride.launch(act);
    }
}

impl Locomotion for MonkeyMovement {
    fn kind(&self) -> AvatarKind {
        AvatarKind::Monkey
    }

    fn is_active(&self) -> bool {
        self.stride.active
    }

    fn set_active(&mut self, active: bool, act: &mut Actuators<'_>) {
        self.stride.active = active;
        if active {
            return;
        }
        self.end_slide(act);
        if self.dancing {
            self.dancing = false;
            act.animator.reset_trigger(params::DANCE);
        }
        self.stride.halt(act);
    }

    fn step(&mut self, input: &StepInput<'_>, act: &mut Actuators<'_>) {
        if !self.stride.active {
            self.stride.halt(act);
            return;
        }
        let actions = input.actions;

        if actions.action_just_activated(Action::Dance) {
            self.toggle_dance(act);
        }
        if self.dancing {
            return;
        }

        if actions.action_just_activated(Action::Run) {
            self.toggle_run(act);
        }

        if self.slide.is_none() {
            self.handle_movement(act, input);
        }

        if actions.action_just_activated(Action::Slide)
            && self.stride.grounded
            && self.slide.is_none()
        {
            self.start_slide(act);
        }
        if self.slide.is_some() {
            self.advance_slide(act, input.dt);
        }

        if actions.action_just_activated(Action::Jump) {
            self.jump(act);
        }
    }

    fn on_ground_contact(&mut self, act: &mut Actuators<'_>) {
        self.stride.grounded = true;
        act.animator.set_bool(params::JUMPING, false);
    }

    fn flags(&self) -> MovementFlags {
        MovementFlags {
            sliding: self.slide.is_some(),
            dancing: self.dancing,
            ..self.stride.base_flags()
        }
    }
}

#[cfg(test)]
mod tests {
    use menagerie_input::Action;

    use super::*;
    use crate::body::Body;
    use crate::locomotion::testing::Rig;

    const DT: f32 = 0.1;

    fn active_monkey(rig: &mut Rig) -> MonkeyMovement {
        let mut monkey = MonkeyMovement::new(&MonkeyTuning::default());
        rig.set_active(&mut monkey, true);
        monkey
    }

    #[test]
    fn test_run_is_a_sticky_toggle() {
        let mut rig = Rig::new();
        let mut monkey = active_monkey(&mut rig);
        rig.frame(&[Action::Run]);
        rig.step(&mut monkey, Vec3::Z, DT);
        assert!(monkey.flags().running);
        assert!((rig.horizontal_speed() - 7.5).abs() < 1e-5);

        // Released: still running.
        rig.frame(&[]);
        rig.step(&mut monkey, Vec3::Z, DT);
        assert!(monkey.flags().running);

        rig.frame(&[Action::Run]);
        rig.step(&mut monkey, Vec3::Z, DT);
        assert!(!monkey.flags().running);
        assert!(!rig.anim.get_bool(params::RUNNING));
    }

    #[test]
    fn test_slide_decays_and_ends_after_duration() {
        let mut rig = Rig::new();
        let mut monkey = active_monkey(&mut rig);
        rig.frame(&[]);
        rig.step(&mut monkey, Vec3::X, DT);

        rig.frame(&[Action::Slide]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        assert!(monkey.is_sliding());
        assert!(rig.anim.get_bool(params::SLIDING));
        let first = rig.horizontal_speed();
        // 0.4 of 0.5 seconds left.
        assert!((first - 6.4).abs() < 1e-4);
        assert!(rig.body.linear_velocity().x > 0.0);

        let mut last = first;
        for _ in 0..3 {
            rig.frame(&[]);
            rig.step(&mut monkey, Vec3::Z, DT);
            assert!(rig.horizontal_speed() < last);
            last = rig.horizontal_speed();
        }
        for _ in 0..2 {
            rig.frame(&[]);
            rig.step(&mut monkey, Vec3::ZERO, DT);
        }
        assert!(!monkey.is_sliding());
        assert!(!rig.anim.get_bool(params::SLIDING));
        assert!(rig.horizontal_speed() < 1e-4);
    }

    #[test]
    fn test_slide_needs_ground() {
        let mut rig = Rig::new();
        let mut monkey = active_monkey(&mut rig);
        rig.frame(&[Action::Jump]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        assert!(rig.anim.get_bool(params::JUMPING));

        rig.frame(&[Action::Slide]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        assert!(!monkey.is_sliding());
    }

    #[test]
    fn test_no_jump_while_sliding() {
        let mut rig = Rig::new();
        let mut monkey = active_monkey(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        assert!(monkey.is_sliding());
        rig.frame(&[Action::Jump]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        assert_eq!(rig.body.linear_velocity().y, 0.0);
        assert!(monkey.flags().grounded);
    }

    #[test]
    fn test_dance_freezes_movement() {
        let mut rig = Rig::new();
        let mut monkey = active_monkey(&mut rig);
        rig.frame(&[]);
        rig.step(&mut monkey, Vec3::X, DT);

        rig.frame(&[Action::Dance]);
        rig.step(&mut monkey, Vec3::X, DT);
        assert!(monkey.is_dancing());
        assert!(rig.anim.is_triggered(params::DANCE));
        assert_eq!(rig.horizontal_speed(), 0.0);

        rig.frame(&[Action::Jump]);
        rig.step(&mut monkey, Vec3::X, DT);
        assert_eq!(rig.horizontal_speed(), 0.0);
        assert_eq!(rig.body.linear_velocity().y, 0.0);

        rig.frame(&[Action::Dance]);
        rig.step(&mut monkey, Vec3::X, DT);
        assert!(!monkey.is_dancing());
        assert!(!rig.anim.is_triggered(params::DANCE));
        assert!(rig.horizontal_speed() > 0.0);
    }

    #[test]
    fn test_deactivate_cancels_slide_and_dance() {
        let mut rig = Rig::new();
        let mut monkey = active_monkey(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        rig.set_active(&mut monkey, false);
        assert!(!monkey.is_sliding());
        assert!(!rig.anim.get_bool(params::SLIDING));

        rig.set_active(&mut monkey, true);
        rig.frame(&[Action::Dance]);
        rig.step(&mut monkey, Vec3::ZERO, DT);
        assert!(monkey.is_dancing());
        rig.set_active(&mut monkey, false);
        assert!(!monkey.is_dancing());
        assert!(!rig.anim.is_triggered(params::DANCE));
    }
}
