//! Interactive servo tuning
//!
//! Walks every calibrated position in file order. The servo under tune is
//! driven to the working value; Up and Down nudge the value one count at a
//! time within the PWM bounds, Enter accepts it and moves on. Once the
//! three positions of a servo are accepted, that servo goes back to its
//! rest position (turntable centered, grip open).

use heapless::Vec;

use super::calibration::CalibrationTable;
use crate::motion::{ActuatorId, GripPosition, Position, TurntablePosition};
use crate::traits::ButtonEvent;

/// A raw write requested by the tuner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveCommand {
    pub channel: u8,
    pub raw: u16,
}

/// One calibrated position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuneSlot {
    pub actuator: ActuatorId,
    pub position: Position,
    /// Short prompt label
    pub label: &'static str,
}

const fn turn(actuator: ActuatorId, position: TurntablePosition, label: &'static str) -> TuneSlot {
    TuneSlot {
        actuator,
        position: Position::Turntable(position),
        label,
    }
}

const fn grip(actuator: ActuatorId, position: GripPosition, label: &'static str) -> TuneSlot {
    TuneSlot {
        actuator,
        position: Position::Grip(position),
        label,
    }
}

/// Tuning order, three slots per servo
pub const TUNE_SLOTS: [TuneSlot; 12] = [
    turn(ActuatorId::RightTurntable, TurntablePosition::Ccw90, "RTM90"),
    turn(ActuatorId::RightTurntable, TurntablePosition::Center, "RT0"),
    turn(ActuatorId::RightTurntable, TurntablePosition::Cw90, "RT90"),
    grip(ActuatorId::RightGrip, GripPosition::Closed, "RGC"),
    grip(ActuatorId::RightGrip, GripPosition::Open, "RGO"),
    grip(ActuatorId::RightGrip, GripPosition::Load, "RGR"),
    turn(ActuatorId::LeftTurntable, TurntablePosition::Ccw90, "LTM90"),
    turn(ActuatorId::LeftTurntable, TurntablePosition::Center, "LT0"),
    turn(ActuatorId::LeftTurntable, TurntablePosition::Cw90, "LT90"),
    grip(ActuatorId::LeftGrip, GripPosition::Closed, "LGC"),
    grip(ActuatorId::LeftGrip, GripPosition::Open, "LGO"),
    grip(ActuatorId::LeftGrip, GripPosition::Load, "LGR"),
];

/// Rest position a servo returns to after tuning
fn rest_position(actuator: ActuatorId) -> Position {
    if actuator.is_turntable() {
        Position::Turntable(TurntablePosition::Center)
    } else {
        Position::Grip(GripPosition::Open)
    }
}

/// Interactive calibration state
#[derive(Debug, Clone)]
pub struct ServoTuner {
    table: CalibrationTable,
    slot: usize,
    value: u16,
}

impl ServoTuner {
    /// Start tuning from an existing table
    pub fn new(table: CalibrationTable) -> Self {
        let value = Self::stored(&table, 0);
        Self {
            table,
            slot: 0,
            value,
        }
    }

    fn stored(table: &CalibrationTable, slot: usize) -> u16 {
        let s = &TUNE_SLOTS[slot];
        table.raw(s.actuator, s.position).unwrap_or(table.pwm.min)
    }

    fn drive_current(&self) -> DriveCommand {
        DriveCommand {
            channel: self.table.channel(TUNE_SLOTS[self.slot].actuator),
            raw: self.value,
        }
    }

    /// Slot currently being tuned, `None` once finished
    pub fn current(&self) -> Option<&TuneSlot> {
        TUNE_SLOTS.get(self.slot)
    }

    /// Working value of the current slot
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Check if every slot has been accepted
    pub fn is_done(&self) -> bool {
        self.slot >= TUNE_SLOTS.len()
    }

    /// Command that puts the current servo at the working value
    pub fn start(&self) -> Option<DriveCommand> {
        (!self.is_done()).then(|| self.drive_current())
    }

    /// Apply a button press
    ///
    /// Returns the raw writes to issue, in order.
    pub fn handle(&mut self, event: ButtonEvent) -> Vec<DriveCommand, 2> {
        let mut commands = Vec::new();
        if self.is_done() {
            return commands;
        }

        match event {
            ButtonEvent::Up => {
                self.value = self.table.pwm.clamp(self.value as i32 + 1);
                let _ = commands.push(self.drive_current());
            }
            ButtonEvent::Down => {
                self.value = self.table.pwm.clamp(self.value as i32 - 1);
                let _ = commands.push(self.drive_current());
            }
            ButtonEvent::Enter => {
                let slot = TUNE_SLOTS[self.slot];
                self.table.set_raw(slot.actuator, slot.position, self.value);
                self.slot += 1;

                let servo_finished = TUNE_SLOTS
                    .get(self.slot)
                    .map_or(true, |next| next.actuator != slot.actuator);
                if servo_finished {
                    if let Some(raw) = self.table.raw(slot.actuator, rest_position(slot.actuator)) {
                        let _ = commands.push(DriveCommand {
                            channel: self.table.channel(slot.actuator),
                            raw,
                        });
                    }
                }

                if !self.is_done() {
                    self.value = Self::stored(&self.table, self.slot);
                    let _ = commands.push(self.drive_current());
                }
            }
        }

        commands
    }

    /// Table with every accepted value
    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    /// Finish and take the tuned table
    pub fn finish(self) -> CalibrationTable {
        self.table
    }
}
