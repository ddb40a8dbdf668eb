//! Face scanning and color classification
//!
//! The scan plan photographs all six faces, turning the cube between
//! captures. The classifier then samples nine cells per photograph and
//! labels each cell with the face whose center color is nearest.

pub mod classifier;
pub mod face;
pub mod plan;
pub mod sample;

pub use classifier::{classify, classify_samples, Anchor, Classification, CubeState, FACELETS};
pub use face::Face;
pub use plan::{run_scan, ScanError, ScanStep, SCAN_PLAN};
pub use sample::{sample_cell, sample_face, CellSample, SampleError, SampleGrid, CENTER_CELL};
