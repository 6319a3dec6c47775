use menagerie_locomotion::SetupError;
use thiserror::Error;

/// Errors reported by roster construction and the avatar manager.
///
/// A failed operation leaves every active flag and visibility unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Selection index outside `0..len`.
    #[error("avatar index {index} is outside the roster (len {len})")]
    IndexOutOfRange { index: i32, len: usize },

    #[error("no avatar is active")]
    NoActiveAvatar,

    /// The slot has no controllable model.
    #[error("avatar '{0}' has no model")]
    MissingModel(String),

    #[error("overlay is already open")]
    OverlayAlreadyOpen,

    #[error("overlay is not open")]
    OverlayNotOpen,

    #[error("roster has no avatars")]
    EmptyRoster,

    #[error("character setup failed: {0}")]
    Setup(#[from] SetupError),
}
