//! Face scan plan
//!
//! The camera looks at one face of the cube. Quarter turns of the whole
//! cube bring the four side faces into view, a left-arm turn followed by a
//! right-arm turn tips the top face toward the camera, and a final half
//! turn shows the bottom face. The right gripper is moved out of view
//! before every capture after the first.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::face::Face;
use crate::motion::{CubeOp, MotionController, MotionError, Rotation, Side};
use crate::traits::{AbortSource, ServoOutput, StillCamera};

/// One step of the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanStep {
    /// Photograph the face currently in view
    Capture(Face),
    /// Turn the cube
    Rotate(CubeOp),
    /// Move an arm's gripper out of the camera's view
    ClearCamera(Side),
}

const fn right_turn(rotation: Rotation) -> ScanStep {
    ScanStep::Rotate(CubeOp::cube(Side::Right, rotation))
}

const CLEAR: ScanStep = ScanStep::ClearCamera(Side::Right);

/// Captures and turns, in order
pub const SCAN_PLAN: [ScanStep; 17] = [
    ScanStep::Capture(Face::Front),
    right_turn(Rotation::Cw90),
    CLEAR,
    ScanStep::Capture(Face::Right),
    right_turn(Rotation::Cw90),
    CLEAR,
    ScanStep::Capture(Face::Back),
    right_turn(Rotation::Cw90),
    CLEAR,
    ScanStep::Capture(Face::Left),
    ScanStep::Rotate(CubeOp::cube(Side::Left, Rotation::Cw90)),
    right_turn(Rotation::Cw90),
    CLEAR,
    ScanStep::Capture(Face::Up),
    right_turn(Rotation::Half),
    CLEAR,
    ScanStep::Capture(Face::Down),
];

/// Scan failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanError<E> {
    /// A cube turn failed (cancelled)
    Motion(MotionError),
    /// The camera failed to capture a face
    Camera(E),
}

impl<E> From<MotionError> for ScanError<E> {
    fn from(e: MotionError) -> Self {
        ScanError::Motion(e)
    }
}

impl<S: ServoOutput, A: AbortSource, D: DelayNs> MotionController<S, A, D> {
    /// Execute a single scan step
    pub fn scan_step<C: StillCamera>(
        &mut self,
        camera: &mut C,
        step: ScanStep,
    ) -> Result<(), ScanError<C::Error>> {
        match step {
            ScanStep::Capture(face) => camera.capture(face).map_err(ScanError::Camera),
            ScanStep::Rotate(op) => Ok(self.perform(op)?),
            ScanStep::ClearCamera(side) => Ok(self.clear_camera(side)?),
        }
    }
}

/// Photograph all six faces
///
/// Returns the faces in the order they were captured. Stops at the first
/// failure; the cube is left wherever the failed step left it.
pub fn run_scan<S, A, D, C>(
    motion: &mut MotionController<S, A, D>,
    camera: &mut C,
) -> Result<Vec<Face, 6>, ScanError<C::Error>>
where
    S: ServoOutput,
    A: AbortSource,
    D: DelayNs,
    C: StillCamera,
{
    let mut captured = Vec::new();
    for step in SCAN_PLAN {
        motion.scan_step(camera, step)?;
        if let ScanStep::Capture(face) = step {
            let _ = captured.push(face);
        }
    }
    Ok(captured)
}
