//! Servo output implementations

pub mod pwm;

pub use pwm::{PwmServoBank, COUNTS_PER_PERIOD};
