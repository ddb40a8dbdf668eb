//! Face photographs
//!
//! Each face is stored as `<dir>/face<index>.jpg`. The format is detected
//! from the file contents, so any format the `image` crate decodes works.

use std::io;
use std::path::{Path, PathBuf};

use cubot_core::scan::{classify, Classification, Face, SampleError, SampleGrid};
use cubot_core::traits::{Raster, Rgb};
use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("sample patch outside the image: {0:?}")]
    Sample(SampleError),
}

/// RGB photograph of one face
pub struct FaceImage(pub RgbImage);

impl Raster for FaceImage {
    fn width(&self) -> u32 {
        self.0.width()
    }

    fn height(&self) -> u32 {
        self.0.height()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.0.get_pixel(x, y).0
    }
}

/// File holding a face's photograph
pub fn face_path(dir: &Path, face: Face) -> PathBuf {
    dir.join(format!("{}.jpg", face.slot_name()))
}

pub fn load_face(dir: &Path, face: Face) -> Result<FaceImage, ImageError> {
    let path = face_path(dir, face);
    let reader = ImageReader::open(&path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| ImageError::Read {
            path: path.clone(),
            source,
        })?;
    let image = reader
        .decode()
        .map_err(|source| ImageError::Decode {
            path: path.clone(),
            source,
        })?
        .to_rgb8();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "loaded face");
    Ok(FaceImage(image))
}

/// Load all six photographs, indexed by face
pub fn load_faces(dir: &Path) -> Result<[FaceImage; 6], ImageError> {
    let [u, r, f, d, l, b] = Face::ALL.map(|face| load_face(dir, face));
    Ok([u?, r?, f?, d?, l?, b?])
}

/// Classify the photographs already in `dir`
pub fn classify_dir(dir: &Path, grid: &SampleGrid) -> Result<Classification, ImageError> {
    let faces = load_faces(dir)?;
    classify(&faces, grid).map_err(ImageError::Sample)
}
