//! Penguin movement: held run, and a belly slide that launches at a multiple
//! of walking speed and decelerates linearly while still steerable.

use glam::Vec3;
use menagerie_config::{AvatarKind, PenguinTuning};
use menagerie_input::Action;
use tracing::debug;

use crate::animation::params;
use crate::locomotion::{
    Actuators, Locomotion, MovementFlags, StepInput, Stride, facing_rotation,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct BellySlide {
    speed: f32,
    /// Last non-zero steering direction.
    heading: Vec3,
}

#[derive(Debug, Clone)]
pub struct PenguinMovement {
    stride: Stride,
    slide_speed_multiplier: f32,
    slide_deceleration: f32,
    slide: Option<BellySlide>,
}

impl PenguinMovement {
    #[must_use]
    pub fn new(tuning: &PenguinTuning) -> Self {
        Self {
            stride: Stride::new(&tuning.gait),
            slide_speed_multiplier: tuning.slide_speed_multiplier,
            slide_deceleration: tuning.slide_deceleration,
            slide: None,
        }
    }

    /// Current slide speed, if sliding.
    #[must_use]
    pub fn slide_speed(&self) -> Option<f32> {
        self.slide.map(|s| s.speed)
    }

    fn set_running(&mut self, act: &mut Actuators<'_>, running: bool) {
        self.stride.running = running;
        self.stride.publish_gait(act);
    }

    fn jump(&mut self, act: &mut Actuators<'_>) {
        if !self.stride.grounded {
            return;
        }
        act.animator.set_bool(params::JUMPING, true);
        self.stride.launch(act);
    }

    fn start_slide(&mut self, act: &mut Actuators<'_>, heading: Vec3) {
        if !self.stride.grounded || self.slide.is_some() {
            return;
        }
        let speed = self.stride.tuning.speed * self.slide_speed_multiplier;
        self.slide = Some(BellySlide { speed, heading });
        act.animator.set_bool(params::SLIDING, true);
        debug!(speed, "Penguin belly slide started");
    }

    fn advance_slide(&mut self, act: &mut Actuators<'_>, intent: Vec3, dt: f32) {
        let Some(slide) = self.slide.as_mut() else {
            return;
        };
        slide.speed -= self.slide_deceleration * dt;
        if slide.speed <= 0.0 {
            self.end_slide(act);
            let v = act.body.linear_velocity();
            act.body.set_linear_velocity(Vec3::new(0.0, v.y, 0.0));
            return;
        }
        if intent.length_squared() > 0.0 {
            slide.heading = intent;
        }
        let (heading, speed) = (slide.heading, slide.speed);
        act.body.set_rotation(facing_rotation(heading));
        let v = act.body.linear_velocity();
        act.body
            .set_linear_velocity(Vec3::new(heading.x * speed, v.y, heading.z * speed));
    }

    fn end_slide(&mut self, act: &mut Actuators<'_>) {
        if self.slide.take().is_some() {
            act.animator.set_bool(params::SLIDING, false);
        }
    }
}

impl Locomotion for PenguinMovement {
    fn kind(&self) -> AvatarKind {
        AvatarKind::Penguin
    }

    fn is_active(&self) -> bool {
        self.stride.active
    }

    fn set_active(&mut self, active: bool, act: &mut Actuators<'_>) {
        self.stride.active = active;
        if !active {
            self.end_slide(act);
            self.stride.halt(act);
        }
    }

    fn step(&mut self, input: &StepInput<'_>, act: &mut Actuators<'_>) {
        if !self.stride.active {
            self.stride.halt(act);
            return;
        }
        let actions = input.actions;
        let moving = input.intent.length_squared() > 0.0;

        if self.slide.is_none() {
            if moving {
                let speed = self.stride.speed();
                self.stride.drive(act, input.intent, speed, input.dt);
                self.stride.publish_gait(act);
            } else {
                self.stride.halt(act);
            }
        }

        if actions.action_just_activated(Action::Run) {
            self.set_running(act, true);
        }
        if actions.action_just_deactivated(Action::Run) {
            self.set_running(act, false);
        }

        if actions.action_just_activated(Action::Jump) {
            self.jump(act);
        }

        if actions.action_just_activated(Action::Slide) && moving {
            self.start_slide(act, input.intent);
        }
        if self.slide.is_some() {
            self.advance_slide(act, input.intent, input.dt);
        }
    }

    fn on_ground_contact(&mut self, act: &mut Actuators<'_>) {
        self.stride.grounded = true;
        act.animator.set_bool(params::JUMPING, false);
    }

    fn flags(&self) -> MovementFlags {
        MovementFlags {
            sliding: self.slide.is_some(),
            ..self.stride.base_flags()
        }
    }
}

#[cfg(test)]
mod tests {
    use menagerie_input::Action;

    use super::*;
    use crate::body::Body;
    use crate::locomotion::facing_direction;
    use crate::locomotion::testing::Rig;

    const DT: f32 = 0.1;

    fn active_penguin(rig: &mut Rig) -> PenguinMovement {
        let mut penguin = PenguinMovement::new(&PenguinTuning::default());
        rig.set_active(&mut penguin, true);
        penguin
    }

    #[test]
    fn test_run_follows_key_edges() {
        let mut rig = Rig::new();
        let mut penguin = active_penguin(&mut rig);
        rig.frame(&[Action::Run]);
        rig.step(&mut penguin, Vec3::Z, DT);
        assert!(penguin.flags().running);
        assert!(rig.anim.get_bool(params::RUNNING));

        rig.frame(&[Action::Run]);
        rig.step(&mut penguin, Vec3::Z, DT);
        assert!((rig.horizontal_speed() - 7.5).abs() < 1e-5);

        rig.frame(&[]);
        rig.step(&mut penguin, Vec3::Z, DT);
        assert!(!penguin.flags().running);
        assert!(rig.anim.get_bool(params::WALKING));
    }

    #[test]
    fn test_slide_needs_movement() {
        let mut rig = Rig::new();
        let mut penguin = active_penguin(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut penguin, Vec3::ZERO, DT);
        assert!(penguin.slide_speed().is_none());
    }

    #[test]
    fn test_slide_decelerates_to_zero() {
        let mut rig = Rig::new();
        let mut penguin = active_penguin(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut penguin, Vec3::X, DT);
        // 15 launch speed minus one frame of deceleration.
        assert!((penguin.slide_speed().unwrap_or_default() - 14.5).abs() < 1e-4);
        assert!((rig.horizontal_speed() - 14.5).abs() < 1e-4);
        assert!(rig.anim.get_bool(params::SLIDING));

        let mut frames = 1;
        while penguin.slide_speed().is_some() {
            rig.frame(&[]);
            rig.step(&mut penguin, Vec3::ZERO, DT);
            frames += 1;
            assert!(frames < 40, "slide never ended");
        }
        assert!((29..=31).contains(&frames));
        assert_eq!(rig.horizontal_speed(), 0.0);
        assert!(!rig.anim.get_bool(params::SLIDING));
    }

    #[test]
    fn test_slide_steers_with_intent() {
        let mut rig = Rig::new();
        let mut penguin = active_penguin(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut penguin, Vec3::X, DT);
        rig.frame(&[]);
        rig.step(&mut penguin, Vec3::Z, DT);
        let v = rig.body.linear_velocity();
        assert!(v.z > 0.0 && v.x.abs() < 1e-5);
        assert!((facing_direction(rig.body.rotation()) - Vec3::Z).length() < 1e-5);

        // Released stick keeps the last heading.
        rig.frame(&[]);
        rig.step(&mut penguin, Vec3::ZERO, DT);
        assert!(rig.body.linear_velocity().z > 0.0);
    }

    #[test]
    fn test_jump_allowed_while_sliding() {
        let mut rig = Rig::new();
        let mut penguin = active_penguin(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut penguin, Vec3::X, DT);
        rig.frame(&[Action::Jump]);
        rig.step(&mut penguin, Vec3::X, DT);
        assert_eq!(rig.body.linear_velocity().y, 5.0);
        assert!(penguin.flags().sliding);
    }

    #[test]
    fn test_deactivate_cancels_slide() {
        let mut rig = Rig::new();
        let mut penguin = active_penguin(&mut rig);
        rig.frame(&[Action::Slide]);
        rig.step(&mut penguin, Vec3::X, DT);
        rig.set_active(&mut penguin, false);
        assert!(!penguin.flags().sliding);
        assert_eq!(rig.horizontal_speed(), 0.0);
    }
}
