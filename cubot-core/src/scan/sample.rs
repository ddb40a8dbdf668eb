//! Cell color sampling
//!
//! Each face photograph is sampled at nine fixed cell centers (three
//! columns by three rows). A cell's color is the mean of a small square
//! patch around its center.

use super::face::Face;
use crate::traits::{Raster, Rgb};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cells per face
pub const CELLS: usize = 9;

/// Index of the middle cell in raster order
pub const CENTER_CELL: usize = 4;

/// Sampling errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleError {
    /// Sample patch extends past the image edge
    OutOfBounds { x: u32, y: u32 },
}

/// Pixel locations of the nine cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleGrid {
    /// X coordinates of the left, middle and right columns
    pub columns: [u32; 3],
    /// Y coordinates of the top, middle and bottom rows
    pub rows: [u32; 3],
    /// Patch half-width; 2 gives a 5x5 patch
    pub radius: u32,
}

impl Default for SampleGrid {
    /// Cell centers for a 640x480 capture of the fixture
    fn default() -> Self {
        Self {
            columns: [180, 310, 430],
            rows: [45, 175, 300],
            radius: 2,
        }
    }
}

impl SampleGrid {
    /// Center of a cell in raster order (row-major, top-left first)
    pub const fn location(&self, cell: usize) -> (u32, u32) {
        (self.columns[cell % 3], self.rows[cell / 3])
    }
}

/// Mean color of a sampled cell
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellSample {
    pub rgb: [f32; 3],
}

impl CellSample {
    /// Sample with a known mean color
    pub const fn new(rgb: [f32; 3]) -> Self {
        Self { rgb }
    }

    /// Sample of a single 8-bit pixel color
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self::new([rgb[0] as f32, rgb[1] as f32, rgb[2] as f32])
    }

    /// Squared euclidean distance in RGB space
    pub fn distance_sq(&self, other: &CellSample) -> f32 {
        self.rgb
            .iter()
            .zip(other.rgb.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

/// Average the square patch centered on (x, y)
pub fn sample_cell<R: Raster>(
    raster: &R,
    x: u32,
    y: u32,
    radius: u32,
) -> Result<CellSample, SampleError> {
    let fits = |center: u32, extent: u32| {
        center >= radius && center.checked_add(radius).is_some_and(|edge| edge < extent)
    };
    let in_bounds = fits(x, raster.width()) && fits(y, raster.height());
    if !in_bounds {
        return Err(SampleError::OutOfBounds { x, y });
    }

    let mut sum = [0u32; 3];
    for px in x - radius..=x + radius {
        for py in y - radius..=y + radius {
            let pixel = raster.pixel(px, py);
            for (acc, channel) in sum.iter_mut().zip(pixel) {
                *acc += channel as u32;
            }
        }
    }

    let side = 2 * radius + 1;
    let count = (side * side) as f32;
    Ok(CellSample::new(sum.map(|s| s as f32 / count)))
}

/// Sample the nine cells of a face in raster order
///
/// The Down photograph is upside down, so its cells are read back to
/// front to restore the face's own raster order.
pub fn sample_face<R: Raster>(
    raster: &R,
    grid: &SampleGrid,
    face: Face,
) -> Result<[CellSample; CELLS], SampleError> {
    let mut cells = [CellSample::new([0.0; 3]); CELLS];
    for (cell, sample) in cells.iter_mut().enumerate() {
        let source = if face.is_inverted() {
            CELLS - 1 - cell
        } else {
            cell
        };
        let (x, y) = grid.location(source);
        *sample = sample_cell(raster, x, y, grid.radius)?;
    }
    Ok(cells)
}
