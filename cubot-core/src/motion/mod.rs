//! Actuator control and motion choreography
//!
//! [`MotionController`] is the single owner of the servo outputs, the
//! calibration table and the tracked actuator positions. Cube-level
//! operations ([`CubeOp`]) are expanded into safe sequences of servo moves
//! by the choreography methods on the controller.

pub mod choreography;
pub mod controller;
pub mod position;

pub use choreography::{CubeOp, Rotation, RotationTarget};
pub use controller::{MotionConfig, MotionController, MotionError};
pub use position::{ActuatorId, ActuatorState, GripPosition, Position, Side, TurntablePosition};

#[cfg(test)]
pub(crate) mod mock {
    //! Test doubles for the servo, abort and delay seams

    use std::collections::VecDeque;
    use std::vec::Vec;

    use embedded_hal::delay::DelayNs;

    use crate::config::CalibrationTable;
    use crate::traits::{AbortSource, ButtonEvent, ButtonInput, ServoOutput};

    use super::{ActuatorId, ActuatorState, GripPosition, TurntablePosition};

    /// Records every raw write
    #[derive(Debug, Default)]
    pub struct RecordingServos {
        pub writes: Vec<(u8, u16)>,
    }

    impl ServoOutput for RecordingServos {
        fn drive(&mut self, channel: u8, raw: u16) {
            self.writes.push((channel, raw));
        }
    }

    /// Records every settle request in milliseconds
    #[derive(Debug, Default)]
    pub struct RecordingDelay {
        pub waits_ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.waits_ms.push(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.waits_ms.push(ms);
        }
    }

    /// Abort source that fires before a chosen poll
    ///
    /// Also serves scripted button presses for the load procedure.
    #[derive(Debug, Default)]
    pub struct ScriptedAbort {
        polls: usize,
        fire_on_poll: Option<usize>,
        pending: bool,
        pub buttons: VecDeque<ButtonEvent>,
    }

    impl ScriptedAbort {
        /// Abort on the `n`th poll (1-based), counted from now
        pub fn fire_on(n: usize) -> Self {
            Self {
                fire_on_poll: Some(n),
                ..Default::default()
            }
        }

        pub fn with_buttons(buttons: &[ButtonEvent]) -> Self {
            Self {
                buttons: buttons.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl AbortSource for ScriptedAbort {
        fn has_pending_abort(&mut self) -> bool {
            self.polls += 1;
            if self.fire_on_poll == Some(self.polls) {
                self.pending = true;
            }
            self.pending
        }

        fn consume_abort(&mut self) {
            self.pending = false;
        }
    }

    impl ButtonInput for ScriptedAbort {
        fn wait_for_button(&mut self) -> Option<ButtonEvent> {
            self.buttons.pop_front()
        }
    }

    /// Servo output that tracks where the hardware physically is
    ///
    /// Decodes each raw write back to a logical position using the
    /// calibration table and checks, before every turntable write, that
    /// the other arm is not letting go of an off-center cube.
    #[derive(Debug)]
    pub struct PhysicalModel {
        calibration: CalibrationTable,
        pub physical: ActuatorState,
        pub writes: usize,
        pub violations: usize,
    }

    impl PhysicalModel {
        pub fn new(calibration: CalibrationTable) -> Self {
            Self {
                calibration,
                physical: ActuatorState::rest(),
                writes: 0,
                violations: 0,
            }
        }

        fn actuator_for(&self, channel: u8) -> ActuatorId {
            ActuatorId::ALL
                .into_iter()
                .find(|a| self.calibration.channel(*a) == channel)
                .expect("unknown channel")
        }
    }

    impl ServoOutput for PhysicalModel {
        fn drive(&mut self, channel: u8, raw: u16) {
            self.writes += 1;
            let actuator = self.actuator_for(channel);
            let side = actuator.side();
            if actuator.is_turntable() {
                if !self.physical.turn_is_safe(side) {
                    self.violations += 1;
                }
                let cal = self.calibration.turntable(side);
                let position = [
                    TurntablePosition::Ccw90,
                    TurntablePosition::Center,
                    TurntablePosition::Cw90,
                ]
                .into_iter()
                .find(|p| cal.raw(*p) == raw)
                .expect("uncalibrated turntable value");
                self.physical.set_turntable(side, position);
            } else {
                let cal = self.calibration.grip(side);
                // The easing pulse leaves the grip holding the cube
                let position = [GripPosition::Open, GripPosition::Load, GripPosition::Closed]
                    .into_iter()
                    .find(|p| cal.raw(*p) == raw)
                    .unwrap_or(GripPosition::Closed);
                self.physical.set_grip(side, position);
            }
        }
    }
}
