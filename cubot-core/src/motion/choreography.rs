//! Cube-level motion choreography
//!
//! Each arm can turn the part of the cube it holds. To turn the whole cube
//! the other arm lets go while the driving arm turns; to turn a single face
//! the other arm keeps the rest of the cube clamped.
//!
//! A turntable only turns a quarter at a time. When the driving table is
//! already at the end of its travel in the requested direction, the
//! driving grip lets go and recenters first (a regrip) while the other arm
//! holds the cube. Half turns of a table from one extreme to the other are
//! always split into two quarter-turn commands through center.

use embedded_hal::delay::DelayNs;

use super::controller::{MotionController, MotionError};
use super::position::{GripPosition, Side, TurntablePosition};
use crate::traits::{AbortSource, ButtonEvent, ButtonInput, ServoOutput};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Amount and direction of a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// Quarter turn clockwise
    Cw90,
    /// Quarter turn counterclockwise
    Ccw90,
    /// Half turn
    Half,
}

/// What the driving arm turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationTarget {
    /// The whole cube
    Cube,
    /// Only the face held by the driving arm
    Face,
}

/// A cube-level operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubeOp {
    pub target: RotationTarget,
    /// Arm doing the turning
    pub driver: Side,
    pub rotation: Rotation,
}

impl CubeOp {
    /// Turn the whole cube with `driver`
    pub const fn cube(driver: Side, rotation: Rotation) -> Self {
        Self {
            target: RotationTarget::Cube,
            driver,
            rotation,
        }
    }

    /// Turn the face held by `driver`
    pub const fn face(driver: Side, rotation: Rotation) -> Self {
        Self {
            target: RotationTarget::Face,
            driver,
            rotation,
        }
    }
}

/// Table position that forces a regrip, and where the regrip goes
const fn regrip(rotation: Rotation) -> (TurntablePosition, TurntablePosition) {
    match rotation {
        Rotation::Cw90 => (TurntablePosition::Cw90, TurntablePosition::Center),
        Rotation::Ccw90 => (TurntablePosition::Ccw90, TurntablePosition::Center),
        Rotation::Half => (TurntablePosition::Center, TurntablePosition::Ccw90),
    }
}

impl<S: ServoOutput, A: AbortSource, D: DelayNs> MotionController<S, A, D> {
    /// Perform a cube-level operation
    pub fn perform(&mut self, op: CubeOp) -> Result<(), MotionError> {
        match op.target {
            RotationTarget::Cube => self.rotate_cube(op.driver, op.rotation),
            RotationTarget::Face => self.rotate_face(op.driver, op.rotation),
        }
    }

    /// Turn a table, splitting a half turn into two quarter turns
    ///
    /// Every caller goes through here, so no single command ever sweeps a
    /// table from -90 to +90, left and right arms alike.
    fn turn_to(&mut self, side: Side, target: TurntablePosition) -> Result<(), MotionError> {
        if self.state().turntable(side).is_half_turn_from(target) {
            self.set_turntable(side, TurntablePosition::Center)?;
        }
        self.set_turntable(side, target)
    }

    /// Let go with `side`, recenter its table, take hold again
    fn recenter(&mut self, side: Side) -> Result<(), MotionError> {
        self.set_grip(side, GripPosition::Open)?;
        self.set_turntable(side, TurntablePosition::Center)?;
        self.set_grip(side, GripPosition::Closed)
    }

    /// Turn the whole cube with `driver`
    ///
    /// The other arm is centered (open, so it does not drag the cube),
    /// regrips if needed, then opens while the driving table turns and
    /// closes again afterwards.
    pub fn rotate_cube(&mut self, driver: Side, rotation: Rotation) -> Result<(), MotionError> {
        let other = driver.other();

        if self.state().turntable(other) != TurntablePosition::Center {
            self.set_grip(other, GripPosition::Open)?;
            self.set_turntable(other, TurntablePosition::Center)?;
        }

        let (regrip_at, regrip_to) = regrip(rotation);
        if self.state().turntable(driver) == regrip_at {
            self.set_grip(other, GripPosition::Closed)?;
            self.set_grip(driver, GripPosition::Open)?;
            self.turn_to(driver, regrip_to)?;
            self.set_grip(driver, GripPosition::Closed)?;
        }

        self.set_grip(driver, GripPosition::Closed)?;
        self.set_grip(other, GripPosition::Open)?;

        let current = self.state().turntable(driver);
        let target = match rotation {
            Rotation::Cw90 if current == TurntablePosition::Center => TurntablePosition::Cw90,
            Rotation::Ccw90 if current == TurntablePosition::Center => TurntablePosition::Ccw90,
            Rotation::Cw90 | Rotation::Ccw90 => TurntablePosition::Center,
            Rotation::Half if current == TurntablePosition::Ccw90 => TurntablePosition::Cw90,
            Rotation::Half => TurntablePosition::Ccw90,
        };
        self.turn_to(driver, target)?;

        self.set_grip(other, GripPosition::Closed)
    }

    /// Turn only the face held by `driver`
    ///
    /// The other arm is brought to center and stays clamped for the whole
    /// operation.
    pub fn rotate_face(&mut self, driver: Side, rotation: Rotation) -> Result<(), MotionError> {
        let other = driver.other();

        if self.state().turntable(other) != TurntablePosition::Center {
            self.recenter(other)?;
        }
        self.set_grip(other, GripPosition::Closed)?;

        let (regrip_at, regrip_to) = regrip(rotation);
        if self.state().turntable(driver) == regrip_at {
            self.set_grip(driver, GripPosition::Open)?;
            self.turn_to(driver, regrip_to)?;
            self.set_grip(driver, GripPosition::Closed)?;
        }
        self.set_grip(driver, GripPosition::Closed)?;

        let current = self.state().turntable(driver);
        let target = match rotation {
            Rotation::Cw90 if current == TurntablePosition::Ccw90 => TurntablePosition::Center,
            Rotation::Cw90 => TurntablePosition::Cw90,
            Rotation::Ccw90 if current == TurntablePosition::Cw90 => TurntablePosition::Center,
            Rotation::Ccw90 => TurntablePosition::Ccw90,
            Rotation::Half if current == TurntablePosition::Cw90 => TurntablePosition::Ccw90,
            Rotation::Half => TurntablePosition::Cw90,
        };
        self.turn_to(driver, target)
    }

    /// Move `side`'s gripper out of the camera's view
    ///
    /// An off-center arm lets go, recenters and takes hold again.
    pub fn clear_camera(&mut self, side: Side) -> Result<(), MotionError> {
        if self.state().turntable(side) != TurntablePosition::Center {
            self.recenter(side)?;
        }
        Ok(())
    }

    /// Release the cube so it can be removed
    ///
    /// Recenters any off-center arm, then loosens both grips to the load
    /// position. Used after a normal solve and to clean up after an abort.
    pub fn cube_release(&mut self) -> Result<(), MotionError> {
        self.clear_camera(Side::Right)?;
        self.clear_camera(Side::Left)?;
        self.set_grips(GripPosition::Load)
    }
}

impl<S: ServoOutput, A: ButtonInput, D: DelayNs> MotionController<S, A, D> {
    /// Prepare for and accept a cube
    ///
    /// Centers both tables and opens the grips to the load position, waits
    /// for Enter, then clamps the cube with both grips. Other buttons are
    /// ignored. A closed button source counts as a cancellation.
    pub fn cube_load(&mut self) -> Result<(), MotionError> {
        self.set_turntable(Side::Right, TurntablePosition::Center)?;
        self.set_turntable(Side::Left, TurntablePosition::Center)?;
        self.set_grips(GripPosition::Load)?;

        loop {
            match self.abort_source().wait_for_button() {
                Some(ButtonEvent::Enter) => break,
                Some(_) => continue,
                None => return Err(MotionError::Cancelled),
            }
        }

        self.set_grips(GripPosition::Closed)
    }
}
