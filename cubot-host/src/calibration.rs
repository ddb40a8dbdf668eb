//! Calibration file I/O

use std::io;
use std::path::{Path, PathBuf};

use cubot_core::config::{CalibrationError, CalibrationTable};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CalibrationLoadError {
    #[error("calibration file {0} not found (run `cubot calibrate` from an existing file)")]
    NotFound(PathBuf),

    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("{path}: {error}")]
    Malformed {
        path: PathBuf,
        error: CalibrationError,
    },
}

/// Read and validate a calibration file
pub fn load(path: &Path) -> Result<CalibrationTable, CalibrationLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CalibrationLoadError::NotFound(path.to_path_buf())
        } else {
            CalibrationLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let table = CalibrationTable::parse(&text).map_err(|error| CalibrationLoadError::Malformed {
        path: path.to_path_buf(),
        error,
    })?;
    info!(path = %path.display(), "calibration loaded");
    Ok(table)
}

/// Write a calibration file, replacing any previous one
pub fn save(path: &Path, table: &CalibrationTable) -> Result<(), CalibrationLoadError> {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = table.write_to(&mut text);

    std::fs::write(path, text).map_err(|source| CalibrationLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "calibration saved");
    Ok(())
}
