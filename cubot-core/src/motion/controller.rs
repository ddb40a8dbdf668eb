//! Actuator driver facade and state tracker
//!
//! Every servo move goes through [`MotionController::set_turntable`] or
//! [`MotionController::set_grip`]. A move to the position the actuator
//! already holds is skipped entirely. Otherwise the abort source is polled,
//! the calibrated raw value is written and the controller waits for the
//! servo to settle before recording the new position. Paired grip moves
//! record each grip right after its write and settle once at the end.
//!
//! A pending abort discards the event and fails the move with
//! [`MotionError::Cancelled`] without writing anything. The tracked
//! position of that actuator is left as it was; the caller must treat the
//! whole operation in progress as aborted.

use embedded_hal::delay::DelayNs;

use super::position::{ActuatorId, ActuatorState, GripPosition, Position, Side, TurntablePosition};
use crate::config::CalibrationTable;
use crate::traits::{AbortSource, ServoOutput};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// User requested an abort before a servo write
    Cancelled,
    /// Position kind does not match the actuator
    InvalidPosition,
}

/// Motion timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConfig {
    /// Wait after each servo move (ms)
    pub settle_ms: u32,
    /// Easing pulse hold is `settle_ms / ease_divisor`
    pub ease_divisor: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            settle_ms: 1000,
            ease_divisor: 4,
        }
    }
}

impl MotionConfig {
    /// Hold time for the grip easing pulse (ms)
    pub fn ease_ms(&self) -> u32 {
        self.settle_ms / self.ease_divisor.max(1)
    }
}

/// Owner of the servos, their calibration and their tracked positions
pub struct MotionController<S, A, D> {
    servos: S,
    abort: A,
    delay: D,
    calibration: CalibrationTable,
    config: MotionConfig,
    state: ActuatorState,
}

impl<S: ServoOutput, A: AbortSource, D: DelayNs> MotionController<S, A, D> {
    /// Create a controller and put every servo at its rest position
    ///
    /// Turntables are centered and grips opened unconditionally, since the
    /// physical positions are unknown at power-up.
    pub fn new(
        servos: S,
        abort: A,
        delay: D,
        calibration: CalibrationTable,
        config: MotionConfig,
    ) -> Self {
        let mut controller = Self {
            servos,
            abort,
            delay,
            calibration,
            config,
            state: ActuatorState::rest(),
        };

        for actuator in ActuatorId::ALL {
            let rest = controller.state.position(actuator);
            if let Some(raw) = controller.calibration.raw(actuator, rest) {
                let channel = controller.calibration.channel(actuator);
                controller.servos.drive(channel, raw);
            }
        }

        controller
    }

    /// Tracked actuator positions
    pub fn state(&self) -> &ActuatorState {
        &self.state
    }

    /// Servo output
    pub fn servos(&self) -> &S {
        &self.servos
    }

    /// Abort / button source
    pub fn abort_source(&mut self) -> &mut A {
        &mut self.abort
    }

    /// Tear down and return the owned parts
    pub fn into_parts(self) -> (S, A, D) {
        (self.servos, self.abort, self.delay)
    }

    /// Poll for abort, then write a raw value
    fn write(&mut self, actuator: ActuatorId, raw: u16) -> Result<(), MotionError> {
        if self.abort.has_pending_abort() {
            self.abort.consume_abort();
            return Err(MotionError::Cancelled);
        }
        self.servos.drive(self.calibration.channel(actuator), raw);
        Ok(())
    }

    fn settle(&mut self) {
        self.delay.delay_ms(self.config.settle_ms);
    }

    /// Move an arm's turntable
    pub fn set_turntable(
        &mut self,
        side: Side,
        target: TurntablePosition,
    ) -> Result<(), MotionError> {
        if self.state.turntable(side) == target {
            return Ok(());
        }
        let raw = self.calibration.turntable(side).raw(target);
        self.write(side.turntable(), raw)?;
        self.settle();
        self.state.set_turntable(side, target);
        Ok(())
    }

    /// Move an arm's grip
    ///
    /// Going straight from closed to open first eases the grip to halfway
    /// between closed and load so the cube is not dragged out of line.
    pub fn set_grip(&mut self, side: Side, target: GripPosition) -> Result<(), MotionError> {
        let current = self.state.grip(side);
        if current == target {
            return Ok(());
        }
        let cal = *self.calibration.grip(side);
        if current == GripPosition::Closed && target == GripPosition::Open {
            self.write(side.grip(), cal.ease())?;
            self.delay.delay_ms(self.config.ease_ms());
        }
        self.write(side.grip(), cal.raw(target))?;
        self.settle();
        self.state.set_grip(side, target);
        Ok(())
    }

    /// Move any actuator to a logical position
    pub fn set_position(
        &mut self,
        actuator: ActuatorId,
        target: Position,
    ) -> Result<(), MotionError> {
        match (actuator.is_turntable(), target) {
            (true, Position::Turntable(p)) => self.set_turntable(actuator.side(), p),
            (false, Position::Grip(p)) => self.set_grip(actuator.side(), p),
            _ => Err(MotionError::InvalidPosition),
        }
    }

    /// Move both grips together with a single settle
    ///
    /// Grips already at `target` are left alone; nothing settles if
    /// neither grip moved.
    pub fn set_grips(&mut self, target: GripPosition) -> Result<(), MotionError> {
        let moving = [Side::Right, Side::Left].map(|side| self.state.grip(side) != target);
        if !moving.contains(&true) {
            return Ok(());
        }

        let sides = [Side::Right, Side::Left];
        if target == GripPosition::Open {
            let mut eased = false;
            for (side, moves) in sides.into_iter().zip(moving) {
                if moves && self.state.grip(side) == GripPosition::Closed {
                    let ease = self.calibration.grip(side).ease();
                    self.write(side.grip(), ease)?;
                    eased = true;
                }
            }
            if eased {
                self.delay.delay_ms(self.config.ease_ms());
            }
        }

        // Each grip is tracked as soon as its own write goes out, so a
        // cancel between the two writes leaves the first one recorded
        for (side, moves) in sides.into_iter().zip(moving) {
            if moves {
                let raw = self.calibration.grip(side).raw(target);
                self.write(side.grip(), raw)?;
                self.state.set_grip(side, target);
            }
        }
        self.settle();
        Ok(())
    }
}
