//! Configuration types
//!
//! Servo calibration table, its persisted text format, and the interactive
//! tuning procedure that produces it.

pub mod calibration;
pub mod tuning;

pub use calibration::*;
pub use tuning::{DriveCommand, ServoTuner, TuneSlot, TUNE_SLOTS};
