//! Eight-way compass buckets in image space (row index grows southward).

use crate::points::PixelPoint;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassDirection {
    /// All buckets in index order, N = 0 increasing clockwise.
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bucket for any integer index, wrapping modulo 8.
    #[inline]
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(8) as usize]
    }

    /// Rotate by `steps` eighths of a turn (positive is clockwise).
    #[inline]
    pub fn rotated(self, steps: i32) -> Self {
        Self::from_index(self.index() as i32 + steps)
    }

    pub fn label(self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NE => "NE",
            CompassDirection::E => "E",
            CompassDirection::SE => "SE",
            CompassDirection::S => "S",
            CompassDirection::SW => "SW",
            CompassDirection::W => "W",
            CompassDirection::NW => "NW",
        }
    }

    /// Unit offset `(dcol, drow)` pointing in this direction.
    #[inline]
    pub fn step(self) -> (i32, i32) {
        match self {
            CompassDirection::N => (0, -1),
            CompassDirection::NE => (1, -1),
            CompassDirection::E => (1, 0),
            CompassDirection::SE => (1, 1),
            CompassDirection::S => (0, 1),
            CompassDirection::SW => (-1, 1),
            CompassDirection::W => (-1, 0),
            CompassDirection::NW => (-1, -1),
        }
    }

    /// Offset walked along the ring from this direction's anchor toward the
    /// next compass point clockwise.
    #[inline]
    pub fn ring_advance(self) -> (i32, i32) {
        match self {
            CompassDirection::N => (1, 0),
            CompassDirection::NE => (0, 1),
            CompassDirection::E => (0, 1),
            CompassDirection::SE => (-1, 0),
            CompassDirection::S => (-1, 0),
            CompassDirection::SW => (0, -1),
            CompassDirection::W => (0, -1),
            CompassDirection::NW => (1, 0),
        }
    }
}

/// Classify the bearing `from -> to` using sign comparisons only.
///
/// Pure vertical and horizontal moves win over the diagonal buckets; a zero
/// move reports `N`.
pub fn calculate_direction(from: &PixelPoint, to: &PixelPoint) -> CompassDirection {
    if from.col == to.col {
        if to.row > from.row {
            CompassDirection::S
        } else {
            CompassDirection::N
        }
    } else if from.row == to.row {
        if to.col > from.col {
            CompassDirection::E
        } else {
            CompassDirection::W
        }
    } else if to.col > from.col {
        if to.row > from.row {
            CompassDirection::SE
        } else {
            CompassDirection::NE
        }
    } else if to.row > from.row {
        CompassDirection::SW
    } else {
        CompassDirection::NW
    }
}
