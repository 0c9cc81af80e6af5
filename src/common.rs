//! Common types for the match server: shot outcomes, player ids and board errors.

use core::fmt;
use core::str::FromStr;

/// Classification of a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// Shot landed on open water.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot sank a ship, but the fleet still has ships afloat.
    Sunk,
    /// Shot sank the last ship afloat.
    GameOver,
    /// Target cell had already been fired upon.
    AlreadyHit,
    /// Target cell lies outside the grid.
    Invalid,
}

impl ShotOutcome {
    pub const ALL: [ShotOutcome; 6] = [
        ShotOutcome::Miss,
        ShotOutcome::Hit,
        ShotOutcome::Sunk,
        ShotOutcome::GameOver,
        ShotOutcome::AlreadyHit,
        ShotOutcome::Invalid,
    ];

    /// Name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotOutcome::Miss => "MISS",
            ShotOutcome::Hit => "HIT",
            ShotOutcome::Sunk => "SUNK",
            ShotOutcome::GameOver => "GAME_OVER",
            ShotOutcome::AlreadyHit => "ALREADY_HIT",
            ShotOutcome::Invalid => "INVALID",
        }
    }

    /// `true` when the shot struck a ship segment for the first time.
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotOutcome::Hit | ShotOutcome::Sunk | ShotOutcome::GameOver)
    }
}

impl fmt::Display for ShotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShotOutcome {
    type Err = UnknownOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShotOutcome::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or(UnknownOutcome)
    }
}

/// Returned when an outcome name is not one of the six wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOutcome;

impl fmt::Display for UnknownOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown shot outcome")
    }
}

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Cells run along increasing `x`.
    Horizontal,
    /// Cells run along increasing `y`.
    Vertical,
}

impl Orientation {
    /// Offset of the `i`-th cell from the ship's origin.
    pub fn step(&self, i: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (i, 0),
            Orientation::Vertical => (0, i),
        }
    }
}

/// Player number as announced on the wire: 1 for the first connection, 2 for
/// the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(1);
    pub const TWO: PlayerId = PlayerId(2);

    /// Player occupying slot `slot` (0 or 1).
    pub fn from_slot(slot: usize) -> Self {
        PlayerId(slot as u8 + 1)
    }

    /// Slot index, or `None` for ids other than 1 and 2.
    pub fn slot(&self) -> Option<usize> {
        match self.0 {
            1 | 2 => Some(self.0 as usize - 1),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors returned by board placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A covered cell falls outside the grid.
    OutOfBounds,
    /// A covered cell already holds a ship.
    Overlaps,
    /// Ships must cover at least one cell.
    EmptyShip,
    /// The ship was already placed on a board.
    ShipAlreadyPlaced,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::Overlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::EmptyShip => write!(f, "Ship has no cells"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on a board"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
