//! Wukong movement: a fixed-distance roll, a double jump whose second stage
//! enters hover, and altitude control while hovering.

use glam::Vec3;
use menagerie_config::{AvatarKind, WukongTuning};
use menagerie_input::Action;
use tracing::debug;

use crate::animation::params;
use crate::locomotion::{Actuators, Locomotion, MovementFlags, StepInput, Stride};

/// Jumps available before touching ground again; the last one enters hover.
pub const MAX_JUMPS: u8 = 2;

/// An in-flight roll. Advanced one frame at a time until `elapsed` reaches `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollProgress {
    pub elapsed: f32,
    pub duration: f32,
    /// Horizontal unit direction captured when the roll began.
    pub direction: Vec3,
    pub distance: f32,
}

impl RollProgress {
    fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct WukongMovement {
    stride: Stride,
    tuning: WukongTuning,
    roll: Option<RollProgress>,
    hovering: bool,
    jump_count: u8,
    target_height: f32,
}

impl WukongMovement {
    #[must_use]
    pub fn new(tuning: &WukongTuning) -> Self {
        Self {
            stride: Stride::new(&tuning.gait),
            tuning: tuning.clone(),
            roll: None,
            hovering: false,
            jump_count: 0,
            target_height: 0.0,
        }
    }

    #[must_use]
    pub fn jump_count(&self) -> u8 {
        self.jump_count
    }

    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[must_use]
    pub fn roll(&self) -> Option<RollProgress> {
        self.roll
    }

    /// Altitude held while hovering without lift or descend input.
    #[must_use]
    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    fn walk(&mut self, act: &mut Actuators<'_>, input: &StepInput<'_>) {
        if input.intent.length_squared() > 0.0 {
            let speed = self.stride.speed();
            self.stride.drive(act, input.intent, speed, input.dt);
            self.stride.publish_gait(act);
        } else {
            self.stride.halt(act);
        }
    }

    fn hover_move(&mut self, act: &mut Actuators<'_>, input: &StepInput<'_>) {
        if input.intent.length_squared() > 0.0 {
            self.stride
                .drive(act, input.intent, self.tuning.hover_speed, input.dt);
        } else {
            self.stride.halt(act);
        }
    }

    fn hover_altitude(&mut self, act: &mut Actuators<'_>, lift: bool, descend: bool) {
        let y = act.body.position().y;
        let mut vy = 0.0;
        if lift && y < self.tuning.hover_max_height {
            vy = self.tuning.hover_lift_speed;
        }
        if descend && y > self.tuning.hover_min_height {
            vy = -self.tuning.hover_lift_speed;
        }
        if vy != 0.0 {
            self.target_height = y;
        }
        let v = act.body.linear_velocity();
        act.body.set_linear_velocity(Vec3::new(v.x, vy, v.z));
    }

    fn jump(&mut self, act: &mut Actuators<'_>) {
        if !self.stride.grounded && self.jump_count >= MAX_JUMPS {
            return;
        }
        act.animator.set_bool(params::JUMPING, true);
        self.stride.launch(act);
        self.jump_count = self.jump_count.saturating_add(1);
        debug!(jump_count = self.jump_count, "Wukong jumped");
        if self.jump_count == MAX_JUMPS && !self.hovering {
            self.enter_hover(act);
        }
    }

    fn enter_hover(&mut self, act: &mut Actuators<'_>) {
        self.hovering = true;
        act.body.set_gravity_enabled(false);
        act.animator.set_bool(params::HOVERING, true);
        self.target_height = act.body.position().y;
        debug!(height = self.target_height, "Wukong hovering");
    }

    fn exit_hover(&mut self, act: &mut Actuators<'_>) {
        self.hovering = false;
        act.animator.set_bool(params::HOVERING, false);
        act.body.set_gravity_enabled(true);
        act.body
            .apply_impulse(Vec3::Y * self.stride.tuning.jump_force);
        self.jump_count = 1;
        debug!("Wukong left hover");
    }

    fn start_roll(&mut self, act: &mut Actuators<'_>) {
        if self.roll.is_some() {
            return;
        }
        let v = act.body.linear_velocity();
        let horizontal = Vec3::new(v.x, 0.0, v.z);
        if horizontal.length_squared() <= 0.0 {
            return;
        }
        self.roll = Some(RollProgress {
            elapsed: 0.0,
            duration: self.tuning.roll_duration,
            direction: horizontal.normalize(),
            distance: self.tuning.roll_distance,
        });
        act.body.set_linear_velocity(Vec3::new(0.0, v.y, 0.0));
        act.animator.set_bool(params::ROLLING, true);
        debug!("Wukong roll started");
    }

    /// Translate along the roll direction at `distance / duration`, never
    /// past the total distance.
    fn advance_roll(&mut self, act: &mut Actuators<'_>, dt: f32) {
        let Some(roll) = self.roll.as_mut() else {
            return;
        };
        let remaining = roll.remaining();
        let slice = dt.min(remaining);
        if roll.duration > 0.0 {
            let speed = roll.distance / roll.duration;
            let position = act.body.position();
            act.body
                .set_position(position + roll.direction * speed * slice);
        } else {
            let position = act.body.position();
            act.body.set_position(position + roll.direction * roll.distance);
        }
        roll.elapsed += slice;
        if dt >= remaining {
            self.end_roll(act);
        }
    }

    /// Idle in place. A hovering body has no gravity to bring it back, so its
    /// climb or descent stops too.
    fn hold(&mut self, act: &mut Actuators<'_>) {
        self.stride.halt(act);
        if self.hovering {
            let v = act.body.linear_velocity();
            act.body.set_linear_velocity(Vec3::new(v.x, 0.0, v.z));
            self.target_height = act.body.position().y;
        }
    }

    fn end_roll(&mut self, act: &mut Actuators<'_>) {
        if self.roll.take().is_some() {
            act.animator.set_bool(params::ROLLING, false);
        }
    }
}

impl Locomotion for WukongMovement {
    fn kind(&self) -> AvatarKind {
        AvatarKind::Wukong
    }

    fn is_active(&self) -> bool {
        self.stride.active
    }

    fn set_active(&mut self, active: bool, act: &mut Actuators<'_>) {
        self.stride.active = active;
        if !active {
            self.end_roll(act);
            self.hold(act);
        }
    }

    fn step(&mut self, input: &StepInput<'_>, act: &mut Actuators<'_>) {
        if !self.stride.active {
            self.hold(act);
            return;
        }
        // A roll in flight owns the body.
        if self.roll.is_some() {
            self.advance_roll(act, input.dt);
            return;
        }
        let actions = input.actions;

        if self.hovering {
            self.hover_move(act, input);
        } else {
            self.walk(act, input);
        }

        if actions.action_just_activated(Action::Jump) {
            self.jump(act);
        }
        if actions.action_just_activated(Action::Roll) {
            self.start_roll(act);
        }
        if actions.action_just_activated(Action::ToggleHover) {
            if self.hovering {
                self.exit_hover(act);
            } else {
                self.enter_hover(act);
            }
        }

        self.stride.running = actions.is_action_active(Action::Run);
        if !self.hovering && self.roll.is_none() {
            self.stride.publish_gait(act);
        }

        if self.hovering {
            self.hover_altitude(
                act,
                actions.is_action_active(Action::HoverLift),
                actions.is_action_active(Action::HoverDescend),
            );
        }
    }

    fn on_ground_contact(&mut self, act: &mut Actuators<'_>) {
        self.stride.grounded = true;
        act.animator.set_bool(params::JUMPING, false);
        if self.hovering {
            self.exit_hover(act);
        } else {
            self.jump_count = 0;
        }
    }

    fn flags(&self) -> MovementFlags {
        MovementFlags {
            rolling: self.roll.is_some(),
            hovering: self.hovering,
            jump_count: self.jump_count,
            ..self.stride.base_flags()
        }
    }
}
