//! Nearest-center color classification
//!
//! Every face's middle cell is an anchor color labelled with that face.
//! Each of the 54 cells is labelled with the nearest anchor in RGB space;
//! ties go to the anchor earlier in U, R, F, D, L, B order. A scan is
//! complete only when every label appears exactly nine times.

use heapless::String;

use super::face::Face;
use super::sample::{sample_face, CellSample, SampleError, SampleGrid, CELLS, CENTER_CELL};
use crate::traits::Raster;

/// Facelets in a cube-state string
pub const FACELETS: usize = 54;

/// Cube-state string: 54 symbols over U, R, F, D, L, B
pub type CubeState = String<FACELETS>;

/// Reference color for one face label
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Anchor {
    pub color: CellSample,
    pub face: Face,
}

/// Result of classifying a scan
///
/// Returned whether or not the scan is complete, so an incomplete scan can
/// still be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Labels in face order, each face in raster order
    pub state: CubeState,
    /// Occurrences of each label, indexed by face
    pub counts: [u8; 6],
    /// Every label occurs exactly nine times
    pub success: bool,
}

impl Classification {
    /// Cube-state string
    pub fn as_str(&self) -> &str {
        self.state.as_str()
    }

    /// Occurrences of one label
    pub fn count(&self, face: Face) -> u8 {
        self.counts[face.index()]
    }
}

/// Anchors from the middle cell of each face
pub fn anchors(samples: &[[CellSample; CELLS]; 6]) -> [Anchor; 6] {
    Face::ALL.map(|face| Anchor {
        color: samples[face.index()][CENTER_CELL],
        face,
    })
}

/// Label of the anchor nearest to `sample`
///
/// Only a strictly smaller distance replaces the current best, so ties
/// resolve to the earlier anchor.
pub fn nearest(anchors: &[Anchor; 6], sample: &CellSample) -> Face {
    let mut best = anchors[0].face;
    let mut best_distance = f32::INFINITY;
    for anchor in anchors {
        let distance = sample.distance_sq(&anchor.color);
        if distance < best_distance {
            best_distance = distance;
            best = anchor.face;
        }
    }
    best
}

/// Classify already sampled cells
///
/// `samples` is indexed by face, each face's cells in its own raster order.
pub fn classify_samples(samples: &[[CellSample; CELLS]; 6]) -> Classification {
    let anchors = anchors(samples);
    let mut state = CubeState::new();
    let mut counts = [0u8; 6];

    for face_cells in samples {
        for cell in face_cells {
            let face = nearest(&anchors, cell);
            // 6 faces x 9 cells is exactly the capacity
            let _ = state.push(face.label());
            counts[face.index()] += 1;
        }
    }

    let success = counts.iter().all(|&c| c as usize == CELLS);
    Classification {
        state,
        counts,
        success,
    }
}

/// Sample and classify six face photographs, indexed by face
pub fn classify<R: Raster>(
    faces: &[R; 6],
    grid: &SampleGrid,
) -> Result<Classification, SampleError> {
    let mut samples = [[CellSample::new([0.0; 3]); CELLS]; 6];
    for face in Face::ALL {
        samples[face.index()] = sample_face(&faces[face.index()], grid, face)?;
    }
    Ok(classify_samples(&samples))
}
