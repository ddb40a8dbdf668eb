//! Cube faces

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cube face, in cube-state string order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Face {
    Up,
    Right,
    Front,
    Down,
    Left,
    Back,
}

impl Face {
    /// All faces in cube-state string order
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Right,
        Face::Front,
        Face::Down,
        Face::Left,
        Face::Back,
    ];

    /// Position in cube-state string order
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Face at a position in cube-state string order
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Facelet symbol
    pub const fn label(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Right => 'R',
            Face::Front => 'F',
            Face::Down => 'D',
            Face::Left => 'L',
            Face::Back => 'B',
        }
    }

    /// Name of the image slot holding this face's photograph
    pub const fn slot_name(self) -> &'static str {
        match self {
            Face::Up => "face0",
            Face::Right => "face1",
            Face::Front => "face2",
            Face::Down => "face3",
            Face::Left => "face4",
            Face::Back => "face5",
        }
    }

    /// Check if the photograph of this face is mounted upside down
    pub const fn is_inverted(self) -> bool {
        matches!(self, Face::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(Face::from_index(i), Some(*face));
        }
        assert_eq!(Face::from_index(6), None);
    }

    #[test]
    fn test_labels_and_slots() {
        let labels: String = Face::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, "URFDLB");
        assert_eq!(Face::Down.slot_name(), "face3");
        assert!(Face::Down.is_inverted());
        assert!(!Face::Up.is_inverted());
    }
}
