//! Character locomotion for Menagerie: the body and animator contracts each
//! character drives, the shared [`Locomotion`] state machine interface, and
//! the four movement variants.

pub mod animation;
pub mod body;
pub mod character;
pub mod locomotion;
pub mod monkey;
pub mod penguin;
pub mod soldier;
pub mod wukong;

pub use animation::{AnimationSink, AnimatorState, params};
pub use body::{Body, Contact, GROUND_TAG, KinematicBody};
pub use character::{Character, CharacterBuilder, SetupError};
pub use locomotion::{
    Actuators, Locomotion, MovementFlags, StepInput, build_locomotion, facing_direction,
    facing_rotation,
};
pub use monkey::MonkeyMovement;
pub use penguin::PenguinMovement;
pub use soldier::SoldierMovement;
pub use wukong::{MAX_JUMPS, RollProgress, WukongMovement};
