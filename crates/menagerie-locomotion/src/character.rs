//! A character: one body, one animator, one locomotion, bound together.

use glam::Vec3;
use menagerie_config::{AvatarKind, MovementConfig};
use menagerie_input::ActionState;
use thiserror::Error;
use tracing::{debug, trace};

use crate::animation::AnimationSink;
use crate::body::{Body, GROUND_TAG};
use crate::locomotion::{Actuators, Locomotion, MovementFlags, StepInput, build_locomotion};

/// A character was assembled without one of its required parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("character '{0}' has no physics body")]
    MissingBody(String),
    #[error("character '{0}' has no animator")]
    MissingAnimator(String),
    #[error("character '{0}' has no locomotion")]
    MissingLocomotion(String),
}

pub struct Character {
    name: String,
    body: Box<dyn Body>,
    animator: Box<dyn AnimationSink>,
    locomotion: Box<dyn Locomotion>,
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("name", &self.name)
            .field("kind", &self.locomotion.kind())
            .field("flags", &self.locomotion.flags())
            .finish_non_exhaustive()
    }
}

impl Character {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CharacterBuilder {
        CharacterBuilder {
            name: name.into(),
            body: None,
            animator: None,
            locomotion: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> AvatarKind {
        self.locomotion.kind()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.locomotion.is_active()
    }

    #[must_use]
    pub fn flags(&self) -> MovementFlags {
        self.locomotion.flags()
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.body.linear_velocity()
    }

    pub fn set_active(&mut self, active: bool) {
        debug!(character = %self.name, active, "Character activation changed");
        let mut act = Actuators {
            body: self.body.as_mut(),
            animator: self.animator.as_mut(),
        };
        self.locomotion.set_active(active, &mut act);
    }

    /// Run one frame of the movement state machine.
    pub fn step(&mut self, intent: Vec3, actions: &ActionState, dt: f32) {
        let input = StepInput {
            intent,
            actions,
            dt,
        };
        let mut act = Actuators {
            body: self.body.as_mut(),
            animator: self.animator.as_mut(),
        };
        self.locomotion.step(&input, &mut act);
    }

    /// Forward a collision. Only [`GROUND_TAG`] has an effect.
    pub fn on_collision(&mut self, tag: &str) {
        if tag != GROUND_TAG {
            trace!(character = %self.name, tag, "Ignoring non-ground contact");
            return;
        }
        let mut act = Actuators {
            body: self.body.as_mut(),
            animator: self.animator.as_mut(),
        };
        self.locomotion.on_ground_contact(&mut act);
    }
}

/// Assembles a [`Character`], validating that every part is present.
pub struct CharacterBuilder {
    name: String,
    body: Option<Box<dyn Body>>,
    animator: Option<Box<dyn AnimationSink>>,
    locomotion: Option<Box<dyn Locomotion>>,
}

impl CharacterBuilder {
    #[must_use]
    pub fn body(mut self, body: impl Body + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    #[must_use]
    pub fn animator(mut self, animator: impl AnimationSink + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    #[must_use]
    pub fn locomotion(mut self, locomotion: Box<dyn Locomotion>) -> Self {
        self.locomotion = Some(locomotion);
        self
    }

    /// Shorthand for [`locomotion`](Self::locomotion) with the variant for `kind`.
    #[must_use]
    pub fn kind(self, kind: AvatarKind, config: &MovementConfig) -> Self {
        self.locomotion(build_locomotion(kind, config))
    }

    /// The character starts inactive.
    pub fn build(self) -> Result<Character, SetupError> {
        let Self {
            name,
            body,
            animator,
            locomotion,
        } = self;
        let Some(body) = body else {
            return Err(SetupError::MissingBody(name));
        };
        let Some(animator) = animator else {
            return Err(SetupError::MissingAnimator(name));
        };
        let Some(locomotion) = locomotion else {
            return Err(SetupError::MissingLocomotion(name));
        };
        Ok(Character {
            name,
            body,
            animator,
            locomotion,
        })
    }
}
