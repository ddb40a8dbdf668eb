//! Actuator identifiers and logical positions
//!
//! The fixture has two arms. Each arm carries a turntable servo that turns
//! its gripper and a grip servo that opens and closes the gripper.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which arm of the fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// The arm on the other side
    pub const fn other(self) -> Self {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
        }
    }

    /// Turntable servo of this arm
    pub const fn turntable(self) -> ActuatorId {
        match self {
            Side::Right => ActuatorId::RightTurntable,
            Side::Left => ActuatorId::LeftTurntable,
        }
    }

    /// Grip servo of this arm
    pub const fn grip(self) -> ActuatorId {
        match self {
            Side::Right => ActuatorId::RightGrip,
            Side::Left => ActuatorId::LeftGrip,
        }
    }
}

/// One of the four servos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActuatorId {
    RightTurntable,
    LeftTurntable,
    RightGrip,
    LeftGrip,
}

impl ActuatorId {
    /// All actuators
    pub const ALL: [ActuatorId; 4] = [
        ActuatorId::RightTurntable,
        ActuatorId::LeftTurntable,
        ActuatorId::RightGrip,
        ActuatorId::LeftGrip,
    ];

    /// Arm this actuator belongs to
    pub const fn side(self) -> Side {
        match self {
            ActuatorId::RightTurntable | ActuatorId::RightGrip => Side::Right,
            ActuatorId::LeftTurntable | ActuatorId::LeftGrip => Side::Left,
        }
    }

    /// Check if this is a turntable servo
    pub const fn is_turntable(self) -> bool {
        matches!(self, ActuatorId::RightTurntable | ActuatorId::LeftTurntable)
    }
}

/// Turntable positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TurntablePosition {
    /// Counterclockwise 90 degrees
    Ccw90,
    /// Horizontal
    #[default]
    Center,
    /// Clockwise 90 degrees
    Cw90,
}

impl TurntablePosition {
    /// Mirror position on the other side of center
    pub const fn opposite(self) -> Self {
        match self {
            TurntablePosition::Ccw90 => TurntablePosition::Cw90,
            TurntablePosition::Center => TurntablePosition::Center,
            TurntablePosition::Cw90 => TurntablePosition::Ccw90,
        }
    }

    /// Check if moving between `self` and `other` is a half turn
    pub fn is_half_turn_from(self, other: Self) -> bool {
        self != TurntablePosition::Center && other == self.opposite()
    }
}

/// Grip positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GripPosition {
    /// Fully open, clear of the cube
    #[default]
    Open,
    /// Loosely holding the cube for loading and removal
    Load,
    /// Clamped on the cube
    Closed,
}

/// Position of any actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    Turntable(TurntablePosition),
    Grip(GripPosition),
}

/// Last commanded position of every actuator
///
/// Updated once a command has been written. Single moves record the
/// position after settling; paired grip moves record each grip as its
/// write goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorState {
    pub right_turntable: TurntablePosition,
    pub left_turntable: TurntablePosition,
    pub right_grip: GripPosition,
    pub left_grip: GripPosition,
}

impl ActuatorState {
    /// Rest state: both turntables centered, both grips open
    pub const fn rest() -> Self {
        Self {
            right_turntable: TurntablePosition::Center,
            left_turntable: TurntablePosition::Center,
            right_grip: GripPosition::Open,
            left_grip: GripPosition::Open,
        }
    }

    /// Turntable position of an arm
    pub const fn turntable(&self, side: Side) -> TurntablePosition {
        match side {
            Side::Right => self.right_turntable,
            Side::Left => self.left_turntable,
        }
    }

    /// Grip position of an arm
    pub const fn grip(&self, side: Side) -> GripPosition {
        match side {
            Side::Right => self.right_grip,
            Side::Left => self.left_grip,
        }
    }

    /// Position of any actuator
    pub const fn position(&self, actuator: ActuatorId) -> Position {
        match actuator {
            ActuatorId::RightTurntable => Position::Turntable(self.right_turntable),
            ActuatorId::LeftTurntable => Position::Turntable(self.left_turntable),
            ActuatorId::RightGrip => Position::Grip(self.right_grip),
            ActuatorId::LeftGrip => Position::Grip(self.left_grip),
        }
    }

    pub(crate) fn set_turntable(&mut self, side: Side, position: TurntablePosition) {
        match side {
            Side::Right => self.right_turntable = position,
            Side::Left => self.left_turntable = position,
        }
    }

    pub(crate) fn set_grip(&mut self, side: Side, position: GripPosition) {
        match side {
            Side::Right => self.right_grip = position,
            Side::Left => self.left_grip = position,
        }
    }

    /// Check that turning `side`'s table cannot drop the cube
    ///
    /// The other arm must either hold the cube or be centered.
    pub fn turn_is_safe(&self, side: Side) -> bool {
        let other = side.other();
        !(self.grip(other) == GripPosition::Open
            && self.turntable(other) != TurntablePosition::Center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Right.other(), Side::Left);
        assert_eq!(Side::Left.other(), Side::Right);
    }

    #[test]
    fn test_actuator_side_mapping() {
        for side in [Side::Right, Side::Left] {
            assert_eq!(side.turntable().side(), side);
            assert_eq!(side.grip().side(), side);
            assert!(side.turntable().is_turntable());
            assert!(!side.grip().is_turntable());
        }
    }

    #[test]
    fn test_half_turn_detection() {
        use TurntablePosition::*;
        assert!(Ccw90.is_half_turn_from(Cw90));
        assert!(Cw90.is_half_turn_from(Ccw90));
        assert!(!Center.is_half_turn_from(Cw90));
        assert!(!Cw90.is_half_turn_from(Center));
        assert!(!Cw90.is_half_turn_from(Cw90));
    }

    #[test]
    fn test_rest_state() {
        let state = ActuatorState::rest();
        assert_eq!(state, ActuatorState::default());
        assert_eq!(state.turntable(Side::Right), TurntablePosition::Center);
        assert_eq!(state.grip(Side::Left), GripPosition::Open);
    }

    #[test]
    fn test_turn_safety() {
        let mut state = ActuatorState::rest();
        assert!(state.turn_is_safe(Side::Right));

        state.set_turntable(Side::Left, TurntablePosition::Cw90);
        assert!(!state.turn_is_safe(Side::Right));

        state.set_grip(Side::Left, GripPosition::Closed);
        assert!(state.turn_is_safe(Side::Right));
        assert_eq!(
            state.position(ActuatorId::LeftGrip),
            Position::Grip(GripPosition::Closed)
        );
    }
}
