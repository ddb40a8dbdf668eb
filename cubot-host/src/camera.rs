//! Still camera driven by an external capture command

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use cubot_core::scan::Face;
use cubot_core::traits::StillCamera;
use thiserror::Error;
use tracing::{debug, info};

use crate::images::face_path;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera command is empty")]
    EmptyCommand,

    #[error("failed to create image directory {path}: {source}")]
    ImageDir { path: PathBuf, source: io::Error },

    #[error("failed to run camera command `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("camera command failed for {path} ({status}): {stderr}")]
    Failed {
        path: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Runs a command per capture
///
/// The command template is split on whitespace and every `{path}` in it is
/// replaced with the face's image file.
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
}

impl CommandCamera {
    pub fn new(template: &str, dir: &Path) -> Result<Self, CameraError> {
        let mut words = template.split_whitespace().map(str::to_owned);
        let program = words.next().ok_or(CameraError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
            dir: dir.to_path_buf(),
        })
    }

    fn command_for(&self, path: &Path) -> Command {
        let path = path.to_string_lossy();
        let mut command = Command::new(&self.program);
        command.args(self.args.iter().map(|a| a.replace("{path}", &path)));
        command
    }
}

impl StillCamera for CommandCamera {
    type Error = CameraError;

    fn capture(&mut self, face: Face) -> Result<(), Self::Error> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CameraError::ImageDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = face_path(&self.dir, face);
        info!(face = ?face, path = %path.display(), "capturing");
        let output = self
            .command_for(&path)
            .output()
            .map_err(|source| CameraError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CameraError::Failed {
                path,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!(path = %path.display(), "captured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_template() {
        let result = CommandCamera::new("   ", Path::new("Cube"));
        assert!(matches!(result, Err(CameraError::EmptyCommand)));
    }

    #[test]
    fn test_path_is_substituted() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("Cube");
        let mut camera = CommandCamera::new("touch {path}", &images).unwrap();

        camera.capture(Face::Back).unwrap();
        assert!(images.join("face5.jpg").exists());
    }

    #[test]
    fn test_failing_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = CommandCamera::new("false {path}", dir.path()).unwrap();

        let result = camera.capture(Face::Up);
        assert!(matches!(result, Err(CameraError::Failed { .. })));
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = CommandCamera::new("cubot-no-such-camera -o {path}", dir.path()).unwrap();

        let result = camera.capture(Face::Up);
        assert!(matches!(result, Err(CameraError::Spawn { .. })));
    }
}
