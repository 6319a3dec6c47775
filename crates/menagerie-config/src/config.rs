//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Follow camera settings.
    pub camera: CameraConfig,
    /// Per-character movement tuning.
    pub movement: MovementConfig,
    /// Which avatars exist and in what order.
    pub roster: RosterConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Third-person follow camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the target before yaw is applied (x, y, z).
    pub offset: [f32; 3],
    /// Yaw speed in degrees per second at full look-axis deflection.
    pub rotation_speed: f32,
    /// Exponential follow rate; the camera closes `follow_rate * dt` of the
    /// remaining distance each frame.
    pub follow_rate: f32,
    /// Scale applied to raw mouse pixels before they become a look axis.
    pub look_scale: f32,
}

/// Walk/run/jump parameters shared by every character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GaitTuning {
    /// Walking speed in units per second.
    pub speed: f32,
    /// Speed multiplier while running.
    pub run_multiplier: f32,
    /// Upward impulse applied on jump.
    pub jump_force: f32,
    /// Facing smoothing rate. `None` snaps instantly to the movement direction.
    pub turn_rate: Option<f32>,
}

/// Character with a prone toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoldierTuning {
    pub gait: GaitTuning,
    /// Fraction of walking speed used while prone.
    pub prone_speed_factor: f32,
}

/// Character with a timed dash-slide and a dance toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonkeyTuning {
    pub gait: GaitTuning,
    /// Slide speed at the start of the slide.
    pub slide_speed: f32,
    /// Slide length in seconds.
    pub slide_duration: f32,
}

/// Character with a decelerating belly slide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PenguinTuning {
    pub gait: GaitTuning,
    /// Slide entry speed as a multiple of walking speed.
    pub slide_speed_multiplier: f32,
    /// Slide speed lost per second.
    pub slide_deceleration: f32,
}

/// Character with a roll and a two-stage jump into hover.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WukongTuning {
    pub gait: GaitTuning,
    /// Distance covered by one roll.
    pub roll_distance: f32,
    /// Roll length in seconds.
    pub roll_duration: f32,
    /// Horizontal speed while hovering.
    pub hover_speed: f32,
    /// Vertical speed while lifting or descending in hover.
    pub hover_lift_speed: f32,
    /// Lift is refused at or above this altitude.
    pub hover_max_height: f32,
    /// Descent is refused at or below this altitude.
    pub hover_min_height: f32,
}

/// Movement tuning for every character variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub soldier: SoldierTuning,
    pub monkey: MonkeyTuning,
    pub penguin: PenguinTuning,
    pub wukong: WukongTuning,
}

/// The four locomotion variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarKind {
    /// Walk/run/jump plus prone.
    Soldier,
    /// Timed slide plus dance.
    Monkey,
    /// Decelerating slide.
    Penguin,
    /// Roll plus double-jump hover.
    Wukong,
}

/// One roster slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvatarEntry {
    /// Character identifier handed to the overlay.
    pub id: String,
    /// Locomotion variant driving this avatar.
    pub kind: AvatarKind,
}

/// Ordered avatar roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RosterConfig {
    pub avatars: Vec<AvatarEntry>,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 5.0, -10.0],
            rotation_speed: 2000.0,
            follow_rate: 5.0,
            look_scale: 0.1,
        }
    }
}

impl Default for GaitTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            run_multiplier: 1.5,
            jump_force: 5.0,
            turn_rate: None,
        }
    }
}

impl Default for SoldierTuning {
    fn default() -> Self {
        Self {
            gait: GaitTuning::default(),
            prone_speed_factor: 0.5,
        }
    }
}

impl Default for MonkeyTuning {
    fn default() -> Self {
        Self {
            gait: GaitTuning::default(),
            slide_speed: 8.0,
            slide_duration: 0.5,
        }
    }
}

impl Default for PenguinTuning {
    fn default() -> Self {
        Self {
            gait: GaitTuning::default(),
            slide_speed_multiplier: 3.0,
            slide_deceleration: 5.0,
        }
    }
}

impl Default for WukongTuning {
    fn default() -> Self {
        Self {
            gait: GaitTuning::default(),
            roll_distance: 2.0,
            roll_duration: 0.8,
            hover_speed: 3.0,
            hover_lift_speed: 2.0,
            hover_max_height: 10.0,
            hover_min_height: 1.0,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        let entry = |id: &str, kind| AvatarEntry {
            id: id.to_string(),
            kind,
        };
        Self {
            avatars: vec![
                entry("Penglizabeth XIV", AvatarKind::Penguin),
                entry("Son Yukgong", AvatarKind::Wukong),
                entry("Maru", AvatarKind::Monkey),
                entry("Private", AvatarKind::Soldier),
            ],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl MovementConfig {
    /// Walking/run/jump tuning of the given variant.
    pub fn gait_mut(&mut self, kind: AvatarKind) -> &mut GaitTuning {
        match kind {
            AvatarKind::Soldier => &mut self.soldier.gait,
            AvatarKind::Monkey => &mut self.monkey.gait,
            AvatarKind::Penguin => &mut self.penguin.gait,
            AvatarKind::Wukong => &mut self.wukong.gait,
        }
    }
}

/// Platform config directory (`<config_dir>/menagerie`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("menagerie"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
