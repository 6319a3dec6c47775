//! Configuration system for Menagerie.
//!
//! Camera, movement and roster tuning persisted to disk as RON. Supports CLI
//! overrides via clap, hot-reload detection, and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AvatarEntry, AvatarKind, CameraConfig, Config, DebugConfig, GaitTuning, InputConfig,
    MonkeyTuning, MovementConfig, PenguinTuning, RosterConfig, SoldierTuning, WukongTuning,
    default_config_dir,
};
pub use error::ConfigError;
