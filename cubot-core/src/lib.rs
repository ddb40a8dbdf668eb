//! Board-agnostic core logic for the Cubot cube fixture
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (servo output, camera, buttons, solver)
//! - Servo calibration table and its text format
//! - Actuator state tracking and motion choreography
//! - Face scan plan and color classification
//! - Solve session state machine

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod motion;
pub mod scan;
pub mod state;
pub mod traits;
