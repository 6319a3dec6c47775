//! Menagerie: a headless avatar playground.
//!
//! Loads config, builds the four-avatar roster, and plays a cue script (the
//! built-in tour unless `--script` names a RON file) through the fixed-step
//! loop, logging every selection, special move and landing on the way.
//!
//! Run with: `cargo run -p menagerie-game -- --log-level debug`

mod game_loop;
mod scene;
mod script;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use menagerie_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info, trace, warn};

use crate::game_loop::{FIXED_DT, GameLoop};
use crate::scene::Scene;
use crate::script::Script;
use crate::session::{Session, input_map_for};

/// Updates simulated after the last cue so moves in flight can finish.
const SETTLE_UPDATES: u64 = 60;

/// Frames between checks of `config.ron` for edited key bindings.
const RELOAD_CHECK_FRAMES: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "menagerie-game", about = "Menagerie avatar playground")]
struct GameArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Frames to simulate (default: long enough for the whole script).
    #[arg(long)]
    frames: Option<u64>,

    /// RON cue script (default: built-in tour).
    #[arg(long)]
    script: Option<PathBuf>,

    /// Seconds per rendered frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_time: f64,
}

/// Frames of `frame_time` needed to run `updates` fixed updates.
fn frames_for(updates: u64, frame_time: f64) -> u64 {
    ((updates as f64 * FIXED_DT) / frame_time).ceil() as u64 + 1
}

fn main() -> ExitCode {
    let args = GameArgs::parse();

    let config_dir = args.cli.config.clone().or_else(|| default_config_dir().ok());
    let mut file_config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    let mut config = file_config.clone();
    config.apply_cli_overrides(&args.cli);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    menagerie_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if args.frame_time.is_nan() || args.frame_time <= 0.0 {
        error!(frame_time = args.frame_time, "Frame time must be positive");
        return ExitCode::FAILURE;
    }

    let script = match &args.script {
        Some(path) => match Script::load(path) {
            Ok(script) => script,
            Err(e) => {
                error!(path = %path.display(), "Failed to load script: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Script::demo(),
    };

    let scene = match Scene::from_config(&config) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Failed to build scene: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (input_map, overridden) = input_map_for(&config);

    let frames = args
        .frames
        .unwrap_or_else(|| frames_for(script.len_updates() + SETTLE_UPDATES, args.frame_time));
    info!(
        avatars = scene.avatar_count(),
        cues = script.events.len(),
        frames,
        overridden,
        "Menagerie starting"
    );

    let mut session = Session::new(scene, input_map, script);
    let mut game_loop = GameLoop::new();
    for frame in 1..=frames {
        game_loop.tick(
            args.frame_time,
            |dt, index| session.update(dt as f32, index),
            |alpha| trace!(alpha, "Present"),
        );
        if frame % RELOAD_CHECK_FRAMES != 0 {
            continue;
        }
        let Some(dir) = &config_dir else {
            continue;
        };
        match file_config.reload(dir) {
            Ok(Some(reloaded)) => {
                let mut applied = reloaded.clone();
                applied.apply_cli_overrides(&args.cli);
                session.rebind(&applied);
                file_config = reloaded;
            }
            Ok(None) => {}
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }

    info!(
        frames = game_loop.frame_count(),
        updates = game_loop.update_count(),
        sim_time = game_loop.total_sim_time(),
        "Simulation complete"
    );
    session.report();
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_cover_updates() {
        assert!((61..=62).contains(&frames_for(60, FIXED_DT)));
        // Frames twice as long need half as many.
        assert!((31..=32).contains(&frames_for(60, 2.0 * FIXED_DT)));
    }

    #[test]
    fn test_args_flatten_config_overrides() {
        let args = GameArgs::parse_from([
            "menagerie-game",
            "--walk-speed",
            "4",
            "--frames",
            "10",
            "--script",
            "tour.ron",
        ]);
        assert_eq!(args.cli.walk_speed, Some(4.0));
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.script, Some(PathBuf::from("tour.ron")));
        assert!((args.frame_time - 1.0 / 60.0).abs() < 1e-12);
    }
}
