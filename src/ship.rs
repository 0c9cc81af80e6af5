//! Ships and fleet definitions.

use alloc::vec::Vec;

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// Index of a ship within the board that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipId(pub usize);

/// A ship of fixed length. Its cells are assigned once, when a board accepts
/// the placement, and the hit count only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    length: usize,
    cells: Vec<(usize, usize)>,
    hits: usize,
}

impl Ship {
    /// An unplaced ship covering `length` cells.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            cells: Vec::new(),
            hits: 0,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Cells covered by the ship, in placement order. Empty until placed.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn is_placed(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Whether the ship covers (`x`, `y`).
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&(x, y))
    }

    pub fn hit_count(&self) -> usize {
        self.hits
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits == self.length
    }

    /// Register one hit. Returns `true` if this hit sank the ship.
    pub(crate) fn hit(&mut self) -> bool {
        if self.is_sunk() {
            return false;
        }
        self.hits += 1;
        self.is_sunk()
    }

    pub(crate) fn assign_cells(&mut self, cells: Vec<(usize, usize)>) {
        debug_assert_eq!(cells.len(), self.length);
        self.cells = cells;
    }
}
