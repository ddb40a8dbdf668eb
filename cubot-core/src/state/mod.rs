//! State machine for a solve session
//!
//! A session loads the cube, scans and classifies it, asks the solver for
//! a move sequence and always ends by releasing the cube. The machine is
//! explicit, finite and deterministic; the host drives it with events.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FailureKind, State};
