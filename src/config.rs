use crate::ship::ShipType;

pub const DEFAULT_BOARD_SIZE: usize = 10;
pub const DEFAULT_PORT: u16 = 12345;

/// Longest inbound line accepted from a client, in bytes.
pub const MAX_LINE_LEN: usize = 4096;

pub const NUM_SHIPS: usize = 5;
pub const STANDARD_FLEET: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Settings shared by the listener and the coordinator of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Side length of each player's square grid.
    pub board_size: usize,
    /// Inbound lines longer than this close the connection.
    pub max_line_len: usize,
}

impl GameConfig {
    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            max_line_len: MAX_LINE_LEN,
        }
    }
}
