//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod camera;
pub mod input;
pub mod servo;
pub mod solver;

pub use camera::{Raster, Rgb, StillCamera};
pub use input::{AbortSource, ButtonEvent, ButtonInput, NeverAbort};
pub use servo::ServoOutput;
pub use solver::Solver;
