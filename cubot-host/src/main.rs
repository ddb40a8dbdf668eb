//! Cubot host application
//!
//! Runs on the fixture's Linux board:
//!
//! - `cubot solve` loads, scans, classifies and solves a cube
//! - `cubot calibrate` tunes every servo position and saves the file
//! - `cubot classify` classifies photographs already on disk

mod calibrate;
mod calibration;
mod camera;
mod config;
mod delay;
mod images;
mod input;
mod servo;
mod session;
mod solver;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cubot_core::motion::MotionController;
use cubot_core::traits::NeverAbort;
use tracing::{info, warn};

use crate::camera::CommandCamera;
use crate::config::HostConfig;
use crate::delay::StdDelay;
use crate::input::LineButtons;
use crate::servo::HostServos;
use crate::session::{SessionError, SolveSession, SolveSettings};
use crate::solver::CommandSolver;

#[derive(Parser)]
#[command(name = "cubot", about = "Two-arm Rubik's cube fixture", version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, env = "CUBOT_CONFIG", default_value = "cubot.toml")]
    config: PathBuf,

    /// Log every servo move
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, scan and solve a cube
    Solve,

    /// Tune the servo positions and save the calibration file
    Calibrate,

    /// Classify the face photographs already captured
    Classify {
        /// Image directory (default: `image_dir` from the config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = config::load(&cli.config)?;

    match cli.command {
        Commands::Solve => solve(&config),
        Commands::Calibrate => calibrate(&config),
        Commands::Classify { dir } => classify(&config, dir),
    }
}

fn solve(config: &HostConfig) -> Result<()> {
    let table = calibration::load(&config.calibration_file).map_err(SessionError::from)?;
    let servos = HostServos::from_config(&config.servo, &table.pwm);
    let motion = MotionController::new(
        servos,
        LineButtons::stdin(),
        StdDelay,
        table,
        config.motion(),
    );
    let camera = CommandCamera::new(&config.camera.command, &config.image_dir)?;
    let solver = CommandSolver::new(config.solver.command.as_deref());

    let mut session = SolveSession::new(motion, camera, solver, SolveSettings::from(config));
    let solution = session.run()?;

    println!("cube:  {}", solution.cube_state);
    println!("moves: {}", solution.moves);
    Ok(())
}

fn calibrate(config: &HostConfig) -> Result<()> {
    let path = &config.calibration_file;
    let table = calibration::load(path)?;

    // Put every servo at rest before tuning starts
    let motion = MotionController::new(
        HostServos::from_config(&config.servo, &table.pwm),
        NeverAbort,
        StdDelay,
        table,
        config.motion(),
    );
    let (mut servos, _, _) = motion.into_parts();

    info!("tuning {} positions", cubot_core::config::TUNE_SLOTS.len());
    let mut buttons = LineButtons::stdin();
    let Some(tuned) = calibrate::tune(table, &mut servos, &mut buttons) else {
        warn!("input closed, calibration not saved");
        bail!("calibration abandoned");
    };

    calibration::save(path, &tuned)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(())
}

fn classify(config: &HostConfig, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| config.image_dir.clone());
    let result = images::classify_dir(&dir, &config.grid)?;

    println!("cube:   {}", result.as_str());
    println!("counts: {:?}", result.counts);
    if !result.success {
        bail!("scan incomplete");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify_with_dir() {
        let cli = Cli::parse_from(["cubot", "-v", "classify", "--dir", "shots"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("cubot.toml"));
        assert!(matches!(
            cli.command,
            Commands::Classify { dir: Some(ref d) } if d == &PathBuf::from("shots")
        ));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["cubot", "solve", "--config", "/etc/cubot.toml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/cubot.toml"));
        assert!(matches!(cli.command, Commands::Solve));
    }
}
