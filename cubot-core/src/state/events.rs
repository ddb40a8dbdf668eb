//! Events that trigger state transitions

use super::machine::FailureKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// User asked for a session
    Start,
    /// Cube is clamped in both grips
    CubeLoaded,
    /// All six faces photographed
    ScanCaptured,
    /// Images classified; `success` when every face got nine cells
    Classified { success: bool },
    /// Solver produced a move sequence
    Solved,
    /// Cube released (or the release attempt ended)
    Released,
    /// User aborted during motion
    Cancelled,
    /// A step failed
    Fault(FailureKind),
    /// User acknowledged the outcome
    Acknowledge,
}
