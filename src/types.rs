//! Shared vocabulary types for the state space and transition models.

use std::fmt;

/// A discrete state identifier.
///
/// States are dense integers in `[0, state_count)`, bijective with grid
/// coordinates via [`GridEncoder`][crate::encoder::GridEncoder]. In a hybrid
/// model the range is partitioned by mode.
pub type State = usize;

/// A mode identifier inside a hybrid model (index into the mode list).
pub type ModeId = usize;

/// Direction across a facet of a grid cell.
///
/// `Positive` crosses toward higher coordinates in the given dimension,
/// `Negative` toward lower ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Both directions, in the order successors are enumerated.
    pub const BOTH: [Direction; 2] = [Direction::Positive, Direction::Negative];

    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Index used for facet cache addressing (Positive = 0, Negative = 1).
    pub fn index(self) -> usize {
        match self {
            Direction::Positive => 0,
            Direction::Negative => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "+"),
            Direction::Negative => write!(f, "-"),
        }
    }
}
