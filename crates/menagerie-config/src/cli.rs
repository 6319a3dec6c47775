//! Command-line overrides for Menagerie.

use std::path::PathBuf;

use clap::Args;

use crate::{AvatarKind, Config};

/// Configuration overrides accepted on the command line.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Camera yaw speed in degrees per second.
    #[arg(long)]
    pub rotation_speed: Option<f32>,

    /// Camera follow rate.
    #[arg(long)]
    pub follow_rate: Option<f32>,

    /// Walking speed applied to every character.
    #[arg(long)]
    pub walk_speed: Option<f32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(speed) = args.rotation_speed {
            self.camera.rotation_speed = speed;
        }
        if let Some(rate) = args.follow_rate {
            self.camera.follow_rate = rate;
        }
        if let Some(speed) = args.walk_speed {
            for kind in [
                AvatarKind::Soldier,
                AvatarKind::Monkey,
                AvatarKind::Penguin,
                AvatarKind::Wukong,
            ] {
                self.movement.gait_mut(kind).speed = speed;
            }
        }
    }
}
