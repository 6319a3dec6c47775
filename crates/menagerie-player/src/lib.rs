//! Follow camera for the active avatar.

pub mod follow_camera;

pub use follow_camera::{FollowCamera, FollowTarget};
