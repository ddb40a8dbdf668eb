//! Host configuration
//!
//! Loaded from a TOML file. Every key is optional; a missing file means
//! all defaults.

use std::io;
use std::path::{Path, PathBuf};

use cubot_core::motion::MotionConfig;
use cubot_core::scan::SampleGrid;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Servo calibration file
    pub calibration_file: PathBuf,
    /// Directory holding the face photographs
    pub image_dir: PathBuf,
    /// Wait after each servo move (ms)
    pub settle_ms: u32,
    /// Longest solution the solver may return
    pub candidate_limit: u32,
    /// Solver search time (s)
    pub time_budget_s: u32,
    pub camera: CameraConfig,
    pub servo: ServoConfig,
    pub solver: SolverConfig,
    /// Cell sample locations in the photographs
    pub grid: SampleGrid,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            calibration_file: PathBuf::from("servo_tune.txt"),
            image_dir: PathBuf::from("Cube"),
            settle_ms: 1000,
            candidate_limit: 100,
            time_budget_s: 5,
            camera: CameraConfig::default(),
            servo: ServoConfig::default(),
            solver: SolverConfig::default(),
            grid: SampleGrid::default(),
        }
    }
}

impl HostConfig {
    pub fn motion(&self) -> MotionConfig {
        MotionConfig {
            settle_ms: self.settle_ms,
            ..MotionConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Still capture command; `{path}` is replaced by the image file
    pub command: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: "libcamera-still -n -t 2000 --width 640 --height 480 -o {path}".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Linux PWM chip (e.g. `/sys/class/pwm/pwmchip0`); unset logs moves only
    pub pwm_chip: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solver command; the cube state, candidate limit and time budget
    /// are appended as arguments
    pub command: Option<String>,
}

/// Load the configuration, falling back to defaults if the file is absent
pub fn load(path: &Path) -> Result<HostConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(HostConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("cubot.toml")).unwrap();

        assert_eq!(config.calibration_file, PathBuf::from("servo_tune.txt"));
        assert_eq!(config.image_dir, PathBuf::from("Cube"));
        assert_eq!(config.settle_ms, 1000);
        assert_eq!(config.candidate_limit, 100);
        assert_eq!(config.time_budget_s, 5);
        assert!(config.servo.pwm_chip.is_none());
        assert!(config.solver.command.is_none());
        assert_eq!(config.grid, SampleGrid::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubot.toml");
        fs::write(
            &path,
            r#"
settle_ms = 600

[servo]
pwm_chip = "/sys/class/pwm/pwmchip0"

[solver]
command = "twophase-solve"
"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.settle_ms, 600);
        assert_eq!(config.motion().settle_ms, 600);
        assert_eq!(config.motion().ease_ms(), 150);
        assert_eq!(
            config.servo.pwm_chip,
            Some(PathBuf::from("/sys/class/pwm/pwmchip0"))
        );
        assert_eq!(config.solver.command.as_deref(), Some("twophase-solve"));
        assert!(config.camera.command.contains("{path}"));
        assert_eq!(config.time_budget_s, 5);
    }

    #[test]
    fn test_grid_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubot.toml");
        fs::write(
            &path,
            "[grid]\ncolumns = [100, 200, 300]\nrows = [50, 150, 250]\nradius = 3\n",
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.grid.columns, [100, 200, 300]);
        assert_eq!(config.grid.rows, [50, 150, 250]);
        assert_eq!(config.grid.radius, 3);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubot.toml");
        fs::write(&path, "settle_ms = \"slow\"").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
