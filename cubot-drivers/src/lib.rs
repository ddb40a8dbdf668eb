//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in cubot-core:
//!
//! - Servo output over a bank of PWM channels (PCA9685-style 12-bit counts)

#![no_std]
#![deny(unsafe_code)]

pub mod servo;
