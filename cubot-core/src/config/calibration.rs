//! Servo calibration table
//!
//! Maps every (actuator, logical position) pair to the raw PWM count that
//! puts the servo there. Loaded once at startup and read-only afterwards.
//!
//! The persisted format is one entry per line. The first whitespace
//! separated token of a line is a signed integer; the rest of the line is a
//! description for humans:
//!
//! ```text
//! 50 PWM frequency
//! 150 PWM count minimum
//! 600 PWM count maximum
//! 0 Right Grip PWM port
//! ...
//! ```

use core::fmt;

use crate::motion::{ActuatorId, GripPosition, Position, Side, TurntablePosition};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of entries in a calibration file
pub const CALIBRATION_ENTRIES: usize = 19;

/// Highest PWM channel index on the servo board
pub const MAX_CHANNEL: i32 = 15;

/// Description written after each value, in file order
pub const ENTRY_LABELS: [&str; CALIBRATION_ENTRIES] = [
    "PWM frequency",
    "PWM count minimum",
    "PWM count maximum",
    "Right Grip PWM port",
    "Right Turn PWM port",
    "Left Grip PWM port",
    "Left Turn PWM port",
    "Right turn minus 90 degrees",
    "Right turn 0 degrees",
    "Right turn 90 degrees",
    "Right grip closed",
    "Right grip open",
    "Right grip cube load",
    "Left turn minus 90 degrees",
    "Left turn 0 degrees",
    "Left turn 90 degrees",
    "Left grip closed",
    "Left grip open",
    "Left grip cube load",
];

/// Calibration parse errors
///
/// `index` is the zero-based entry (line) number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// File ended before this entry
    Missing { index: usize },
    /// Entry does not start with an integer
    Malformed { index: usize },
    /// Entry is an integer but not a usable value
    OutOfRange { index: usize },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::Missing { index } => {
                write!(f, "missing entry {} ({})", index + 1, ENTRY_LABELS[*index])
            }
            CalibrationError::Malformed { index } => {
                write!(f, "malformed entry {} ({})", index + 1, ENTRY_LABELS[*index])
            }
            CalibrationError::OutOfRange { index } => {
                write!(f, "entry {} ({}) out of range", index + 1, ENTRY_LABELS[*index])
            }
        }
    }
}

/// Global PWM settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmSettings {
    /// PWM frequency in Hz
    pub frequency: u32,
    /// Lowest raw count any servo may be driven to
    pub min: u16,
    /// Highest raw count any servo may be driven to
    pub max: u16,
}

impl PwmSettings {
    /// Clamp a raw count into the allowed range
    pub fn clamp(&self, raw: i32) -> u16 {
        raw.clamp(self.min as i32, self.max as i32) as u16
    }
}

/// PWM channel of each servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMap {
    pub right_grip: u8,
    pub right_turntable: u8,
    pub left_grip: u8,
    pub left_turntable: u8,
}

/// Raw counts for the three turntable positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurntableCalibration {
    pub ccw90: u16,
    pub center: u16,
    pub cw90: u16,
}

impl TurntableCalibration {
    /// Raw count for a position
    pub const fn raw(&self, position: TurntablePosition) -> u16 {
        match position {
            TurntablePosition::Ccw90 => self.ccw90,
            TurntablePosition::Center => self.center,
            TurntablePosition::Cw90 => self.cw90,
        }
    }

    fn set(&mut self, position: TurntablePosition, raw: u16) {
        match position {
            TurntablePosition::Ccw90 => self.ccw90 = raw,
            TurntablePosition::Center => self.center = raw,
            TurntablePosition::Cw90 => self.cw90 = raw,
        }
    }
}

/// Raw counts for the three grip positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GripCalibration {
    pub closed: u16,
    pub open: u16,
    pub load: u16,
}

impl GripCalibration {
    /// Raw count for a position
    pub const fn raw(&self, position: GripPosition) -> u16 {
        match position {
            GripPosition::Open => self.open,
            GripPosition::Load => self.load,
            GripPosition::Closed => self.closed,
        }
    }

    /// Intermediate count used when easing a closed grip open
    ///
    /// Halfway between closed and load, rounded toward zero.
    pub const fn ease(&self) -> u16 {
        ((self.closed as u32 + self.load as u32) / 2) as u16
    }

    fn set(&mut self, position: GripPosition, raw: u16) {
        match position {
            GripPosition::Open => self.open = raw,
            GripPosition::Load => self.load = raw,
            GripPosition::Closed => self.closed = raw,
        }
    }
}

/// Complete servo calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationTable {
    pub pwm: PwmSettings,
    pub channels: ChannelMap,
    pub right_turntable: TurntableCalibration,
    pub right_grip: GripCalibration,
    pub left_turntable: TurntableCalibration,
    pub left_grip: GripCalibration,
}

impl CalibrationTable {
    /// Parse the persisted text format
    pub fn parse(input: &str) -> Result<Self, CalibrationError> {
        let mut values = [0i32; CALIBRATION_ENTRIES];
        let mut lines = input.lines();

        for (index, value) in values.iter_mut().enumerate() {
            let line = lines.next().ok_or(CalibrationError::Missing { index })?;
            *value = line
                .split_whitespace()
                .next()
                .and_then(|token| token.parse().ok())
                .ok_or(CalibrationError::Malformed { index })?;
        }

        Self::from_values(&values)
    }

    /// Build a table from the 19 values in file order
    pub fn from_values(values: &[i32; CALIBRATION_ENTRIES]) -> Result<Self, CalibrationError> {
        let frequency =
            u32::try_from(values[0]).map_err(|_| CalibrationError::OutOfRange { index: 0 })?;
        if frequency == 0 {
            return Err(CalibrationError::OutOfRange { index: 0 });
        }
        let min = u16::try_from(values[1]).map_err(|_| CalibrationError::OutOfRange { index: 1 })?;
        let max = u16::try_from(values[2]).map_err(|_| CalibrationError::OutOfRange { index: 2 })?;
        if max < min {
            return Err(CalibrationError::OutOfRange { index: 2 });
        }
        let pwm = PwmSettings { frequency, min, max };

        let channel = |index: usize| -> Result<u8, CalibrationError> {
            if (0..=MAX_CHANNEL).contains(&values[index]) {
                Ok(values[index] as u8)
            } else {
                Err(CalibrationError::OutOfRange { index })
            }
        };
        let raw = |index: usize| -> Result<u16, CalibrationError> {
            if (min as i32..=max as i32).contains(&values[index]) {
                Ok(values[index] as u16)
            } else {
                Err(CalibrationError::OutOfRange { index })
            }
        };

        Ok(Self {
            pwm,
            channels: ChannelMap {
                right_grip: channel(3)?,
                right_turntable: channel(4)?,
                left_grip: channel(5)?,
                left_turntable: channel(6)?,
            },
            right_turntable: TurntableCalibration {
                ccw90: raw(7)?,
                center: raw(8)?,
                cw90: raw(9)?,
            },
            right_grip: GripCalibration {
                closed: raw(10)?,
                open: raw(11)?,
                load: raw(12)?,
            },
            left_turntable: TurntableCalibration {
                ccw90: raw(13)?,
                center: raw(14)?,
                cw90: raw(15)?,
            },
            left_grip: GripCalibration {
                closed: raw(16)?,
                open: raw(17)?,
                load: raw(18)?,
            },
        })
    }

    /// The 19 values in file order
    pub fn values(&self) -> [i32; CALIBRATION_ENTRIES] {
        let c = &self.channels;
        let (rt, rg, lt, lg) = (
            &self.right_turntable,
            &self.right_grip,
            &self.left_turntable,
            &self.left_grip,
        );
        [
            self.pwm.frequency as i32,
            self.pwm.min as i32,
            self.pwm.max as i32,
            c.right_grip as i32,
            c.right_turntable as i32,
            c.left_grip as i32,
            c.left_turntable as i32,
            rt.ccw90 as i32,
            rt.center as i32,
            rt.cw90 as i32,
            rg.closed as i32,
            rg.open as i32,
            rg.load as i32,
            lt.ccw90 as i32,
            lt.center as i32,
            lt.cw90 as i32,
            lg.closed as i32,
            lg.open as i32,
            lg.load as i32,
        ]
    }

    /// Write the persisted text format
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (value, label) in self.values().iter().zip(ENTRY_LABELS) {
            writeln!(out, "{} {}", value, label)?;
        }
        Ok(())
    }

    /// PWM channel of an actuator
    pub const fn channel(&self, actuator: ActuatorId) -> u8 {
        match actuator {
            ActuatorId::RightTurntable => self.channels.right_turntable,
            ActuatorId::LeftTurntable => self.channels.left_turntable,
            ActuatorId::RightGrip => self.channels.right_grip,
            ActuatorId::LeftGrip => self.channels.left_grip,
        }
    }

    /// Turntable calibration of an arm
    pub const fn turntable(&self, side: Side) -> &TurntableCalibration {
        match side {
            Side::Right => &self.right_turntable,
            Side::Left => &self.left_turntable,
        }
    }

    /// Grip calibration of an arm
    pub const fn grip(&self, side: Side) -> &GripCalibration {
        match side {
            Side::Right => &self.right_grip,
            Side::Left => &self.left_grip,
        }
    }

    /// Raw count for an actuator position
    ///
    /// Returns `None` when the position kind does not match the actuator
    /// (for example a grip position on a turntable).
    pub fn raw(&self, actuator: ActuatorId, position: Position) -> Option<u16> {
        match (actuator.is_turntable(), position) {
            (true, Position::Turntable(p)) => Some(self.turntable(actuator.side()).raw(p)),
            (false, Position::Grip(p)) => Some(self.grip(actuator.side()).raw(p)),
            _ => None,
        }
    }

    /// Replace the raw count for an actuator position
    ///
    /// Ignored when the position kind does not match the actuator.
    pub fn set_raw(&mut self, actuator: ActuatorId, position: Position, raw: u16) {
        let side = actuator.side();
        match (actuator.is_turntable(), position) {
            (true, Position::Turntable(p)) => match side {
                Side::Right => self.right_turntable.set(p, raw),
                Side::Left => self.left_turntable.set(p, raw),
            },
            (false, Position::Grip(p)) => match side {
                Side::Right => self.right_grip.set(p, raw),
                Side::Left => self.left_grip.set(p, raw),
            },
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use heapless::String;

    /// Calibration with a distinct raw count for every position
    pub(crate) const SAMPLE: &str = "50 PWM frequency
150 PWM count minimum
600 PWM count maximum
0 Right Grip PWM port
1 Right Turn PWM port
2 Left Grip PWM port
3 Left Turn PWM port
200 Right turn minus 90 degrees
350 Right turn 0 degrees
500 Right turn 90 degrees
420 Right grip closed
250 Right grip open
380 Right grip cube load
210 Left turn minus 90 degrees
360 Left turn 0 degrees
510 Left turn 90 degrees
430 Left grip closed
260 Left grip open
390 Left grip cube load
";

    pub(crate) fn sample_table() -> CalibrationTable {
        CalibrationTable::parse(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let table = sample_table();
        assert_eq!(table.pwm.frequency, 50);
        assert_eq!(table.pwm.min, 150);
        assert_eq!(table.pwm.max, 600);
        assert_eq!(table.channel(ActuatorId::RightGrip), 0);
        assert_eq!(table.channel(ActuatorId::LeftTurntable), 3);
        assert_eq!(table.turntable(Side::Right).raw(TurntablePosition::Cw90), 500);
        assert_eq!(table.grip(Side::Left).raw(GripPosition::Load), 390);
    }

    #[test]
    fn test_ease_is_midpoint_of_closed_and_load() {
        let table = sample_table();
        assert_eq!(table.right_grip.ease(), 400);
        // (430 + 390) / 2
        assert_eq!(table.left_grip.ease(), 410);

        let odd = GripCalibration {
            closed: 401,
            open: 250,
            load: 380,
        };
        assert_eq!(odd.ease(), 390);
    }

    #[test]
    fn test_missing_entry() {
        let truncated: String<256> = SAMPLE.lines().take(10).fold(String::new(), |mut s, l| {
            s.push_str(l).unwrap();
            s.push('\n').unwrap();
            s
        });
        assert_eq!(
            CalibrationTable::parse(&truncated),
            Err(CalibrationError::Missing { index: 10 })
        );
        assert_eq!(
            CalibrationTable::parse(""),
            Err(CalibrationError::Missing { index: 0 })
        );
    }

    #[test]
    fn test_malformed_entry() {
        let input = "50 PWM frequency\nabc PWM count minimum\n";
        assert_eq!(
            CalibrationTable::parse(input),
            Err(CalibrationError::Malformed { index: 1 })
        );

        let blank = "50 PWM frequency\n\n";
        assert_eq!(
            CalibrationTable::parse(blank),
            Err(CalibrationError::Malformed { index: 1 })
        );
    }

    #[test]
    fn test_out_of_range_entries() {
        let mut values = sample_table().values();
        values[4] = 16;
        assert_eq!(
            CalibrationTable::from_values(&values),
            Err(CalibrationError::OutOfRange { index: 4 })
        );

        let mut values = sample_table().values();
        values[12] = 601;
        assert_eq!(
            CalibrationTable::from_values(&values),
            Err(CalibrationError::OutOfRange { index: 12 })
        );

        let mut values = sample_table().values();
        values[1] = -5;
        assert_eq!(
            CalibrationTable::from_values(&values),
            Err(CalibrationError::OutOfRange { index: 1 })
        );

        let mut values = sample_table().values();
        values[2] = 100;
        assert_eq!(
            CalibrationTable::from_values(&values),
            Err(CalibrationError::OutOfRange { index: 2 })
        );
    }

    #[test]
    fn test_write_then_parse_preserves_table() {
        let table = sample_table();
        let mut out: String<1024> = String::new();
        table.write_to(&mut out).unwrap();

        assert!(out.starts_with("50 PWM frequency\n150 PWM count minimum\n"));
        assert!(out.ends_with("390 Left grip cube load\n"));
        assert_eq!(CalibrationTable::parse(&out), Ok(table));
    }

    #[test]
    fn test_raw_rejects_mismatched_kind() {
        let table = sample_table();
        assert_eq!(
            table.raw(
                ActuatorId::RightTurntable,
                Position::Grip(GripPosition::Open)
            ),
            None
        );
        assert_eq!(
            table.raw(
                ActuatorId::LeftGrip,
                Position::Grip(GripPosition::Closed)
            ),
            Some(430)
        );
    }

    #[test]
    fn test_set_raw() {
        let mut table = sample_table();
        table.set_raw(
            ActuatorId::LeftTurntable,
            Position::Turntable(TurntablePosition::Ccw90),
            222,
        );
        assert_eq!(table.left_turntable.ccw90, 222);

        let before = table;
        table.set_raw(
            ActuatorId::LeftTurntable,
            Position::Grip(GripPosition::Open),
            999,
        );
        assert_eq!(table, before);
    }

    #[test]
    fn test_pwm_clamp() {
        let pwm = sample_table().pwm;
        assert_eq!(pwm.clamp(100), 150);
        assert_eq!(pwm.clamp(700), 600);
        assert_eq!(pwm.clamp(300), 300);
    }
}
