//! The per-character movement contract and the gait logic every variant
//! shares: halt when idle, drive along the intent, face the travel direction.

use glam::{Quat, Vec3};
use menagerie_config::{AvatarKind, GaitTuning, MovementConfig};
use menagerie_input::ActionState;

use crate::animation::{AnimationSink, params};
use crate::body::Body;
use crate::{MonkeyMovement, PenguinMovement, SoldierMovement, WukongMovement};

/// The collaborators a locomotion writes to during a call.
pub struct Actuators<'a> {
    pub body: &'a mut dyn Body,
    pub animator: &'a mut dyn AnimationSink,
}

/// One frame of input as seen by a character.
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    /// Camera-relative movement intent, unit length or zero.
    pub intent: Vec3,
    pub actions: &'a ActionState,
    pub dt: f32,
}

/// Snapshot of a character's movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementFlags {
    pub active: bool,
    pub grounded: bool,
    pub running: bool,
    pub prone: bool,
    pub sliding: bool,
    pub rolling: bool,
    pub hovering: bool,
    pub dancing: bool,
    pub jump_count: u8,
}

/// A character's movement state machine.
///
/// `step` must leave the body's horizontal velocity at zero whenever the
/// character is inactive. Only the avatar manager calls `set_active`.
pub trait Locomotion {
    fn kind(&self) -> AvatarKind;

    fn is_active(&self) -> bool;

    /// Enable or disable input. Disabling halts the body and cancels any timed
    /// move in progress.
    fn set_active(&mut self, active: bool, act: &mut Actuators<'_>);

    fn step(&mut self, input: &StepInput<'_>, act: &mut Actuators<'_>);

    /// The body touched something tagged as ground.
    fn on_ground_contact(&mut self, act: &mut Actuators<'_>);

    fn flags(&self) -> MovementFlags;
}

/// Construct the movement variant for `kind` from its tuning block.
#[must_use]
pub fn build_locomotion(kind: AvatarKind, config: &MovementConfig) -> Box<dyn Locomotion> {
    match kind {
        AvatarKind::Soldier => Box::new(SoldierMovement::new(&config.soldier)),
        AvatarKind::Monkey => Box::new(MonkeyMovement::new(&config.monkey)),
        AvatarKind::Penguin => Box::new(PenguinMovement::new(&config.penguin)),
        AvatarKind::Wukong => Box::new(WukongMovement::new(&config.wukong)),
    }
}

/// Yaw-only rotation whose `+Z` points along `dir` (projected to the ground).
#[must_use]
pub fn facing_rotation(dir: Vec3) -> Quat {
    Quat::from_rotation_y(dir.x.atan2(dir.z))
}

/// Forward (`+Z`) of a body rotation.
#[must_use]
pub fn facing_direction(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Walk/run/jump state common to all variants.
#[derive(Debug, Clone)]
pub(crate) struct Stride {
    pub tuning: GaitTuning,
    pub active: bool,
    pub grounded: bool,
    pub running: bool,
    /// Whether the last gait update drove the body.
    pub moving: bool,
}

impl Stride {
    pub fn new(tuning: &GaitTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            active: false,
            grounded: true,
            running: false,
            moving: false,
        }
    }

    /// Current ground speed: walk speed, scaled while running.
    pub fn speed(&self) -> f32 {
        if self.running {
            self.tuning.speed * self.tuning.run_multiplier
        } else {
            self.tuning.speed
        }
    }

    /// Zero horizontal velocity and clear the gait animations.
    pub fn halt(&mut self, act: &mut Actuators<'_>) {
        let v = act.body.linear_velocity();
        act.body.set_linear_velocity(Vec3::new(0.0, v.y, 0.0));
        act.animator.set_bool(params::WALKING, false);
        act.animator.set_bool(params::RUNNING, false);
        self.moving = false;
    }

    /// Face `dir` and set horizontal velocity to `dir * speed`. Vertical velocity is kept.
    pub fn drive(&mut self, act: &mut Actuators<'_>, dir: Vec3, speed: f32, dt: f32) {
        self.face(act, dir, dt);
        let v = act.body.linear_velocity();
        act.body
            .set_linear_velocity(Vec3::new(dir.x * speed, v.y, dir.z * speed));
        self.moving = true;
    }

    /// Walking and running animations for the current run state.
    pub fn publish_gait(&self, act: &mut Actuators<'_>) {
        act.animator.set_bool(params::WALKING, self.moving && !self.running);
        act.animator.set_bool(params::RUNNING, self.moving && self.running);
    }

    /// Turn toward `dir`, snapping when no turn rate is configured.
    pub fn face(&self, act: &mut Actuators<'_>, dir: Vec3, dt: f32) {
        let flat = Vec3::new(dir.x, 0.0, dir.z);
        if flat.length_squared() < 1e-8 {
            return;
        }
        let target = facing_rotation(flat);
        let rotation = match self.tuning.turn_rate {
            None => target,
            Some(rate) => act
                .body
                .rotation()
                .slerp(target, (rate * dt).clamp(0.0, 1.0)),
        };
        act.body.set_rotation(rotation);
    }

    /// Upward impulse of `jump_force`; leaves the ground.
    pub fn launch(&mut self, act: &mut Actuators<'_>) {
        act.body.apply_impulse(Vec3::Y * self.tuning.jump_force);
        self.grounded = false;
    }

    pub fn base_flags(&self) -> MovementFlags {
        MovementFlags {
            active: self.active,
            grounded: self.grounded,
            running: self.running,
            ..MovementFlags::default()
        }
    }
}
