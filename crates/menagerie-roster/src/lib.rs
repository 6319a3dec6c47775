//! Avatar roster and the exclusivity manager that decides which single
//! character is live, visible and followed by the camera.

pub mod error;
pub mod manager;
pub mod roster;
pub mod surface;

pub use error::RosterError;
pub use manager::AvatarManager;
pub use roster::{AvatarSlot, Roster};
pub use surface::{Surface, Visibility};
