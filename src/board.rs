//! A player's grid: cells, placed ships and shot resolution.

use alloc::vec::Vec;
use core::fmt;

use crate::common::{BoardError, Orientation, ShotOutcome};
use crate::ship::{Ship, ShipId};

/// One square of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    ship: Option<ShipId>,
    hit: bool,
}

impl Cell {
    fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            ship: None,
            hit: false,
        }
    }

    pub fn has_ship(&self) -> bool {
        self.ship.is_some()
    }

    /// Ship occupying this cell, if any.
    pub fn ship(&self) -> Option<ShipId> {
        self.ship
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

/// Board state: a square grid of cells plus the ships placed on it.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    ships: Vec<Ship>,
    ships_sunk: usize,
    total_hits: usize,
}

impl Board {
    /// Create an empty `size`×`size` board.
    pub fn new(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(Cell::new(x, y));
            }
        }
        Board {
            size,
            cells,
            ships: Vec::new(),
            ships_sunk: 0,
            total_hits: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at (`x`, `y`), or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x as i64, y as i64).map(|i| &self.cells[i])
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id.0)
    }

    /// Number of ships sunk so far.
    pub fn ships_sunk(&self) -> usize {
        self.ships_sunk
    }

    /// Number of cells fired upon so far, hits and misses alike.
    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let size = self.size as i64;
        if x < 0 || y < 0 || x >= size || y >= size {
            return None;
        }
        Some(y as usize * self.size + x as usize)
    }

    /// Place `ship` with its first cell at (`x`, `y`), extending
    /// `ship.length()` cells along `orientation`. Nothing changes on error.
    pub fn place_ship(
        &mut self,
        mut ship: Ship,
        x: i32,
        y: i32,
        orientation: Orientation,
    ) -> Result<ShipId, BoardError> {
        if ship.length() == 0 {
            return Err(BoardError::EmptyShip);
        }
        if ship.is_placed() {
            return Err(BoardError::ShipAlreadyPlaced);
        }

        let mut covered = Vec::with_capacity(ship.length());
        for i in 0..ship.length() {
            let (dx, dy) = orientation.step(i);
            let idx = self
                .index(x as i64 + dx as i64, y as i64 + dy as i64)
                .ok_or(BoardError::OutOfBounds)?;
            if self.cells[idx].has_ship() {
                return Err(BoardError::Overlaps);
            }
            covered.push(idx);
        }

        let id = ShipId(self.ships.len());
        for &idx in &covered {
            self.cells[idx].ship = Some(id);
        }
        ship.assign_cells(covered.iter().map(|&i| (self.cells[i].x, self.cells[i].y)).collect());
        self.ships.push(ship);
        Ok(id)
    }

    /// Resolve a shot at (`x`, `y`).
    pub fn receive_shot(&mut self, x: i32, y: i32) -> ShotOutcome {
        let Some(idx) = self.index(x as i64, y as i64) else {
            return ShotOutcome::Invalid;
        };
        let cell = &mut self.cells[idx];
        if cell.hit {
            return ShotOutcome::AlreadyHit;
        }
        cell.hit = true;
        self.total_hits += 1;

        let Some(id) = cell.ship else {
            return ShotOutcome::Miss;
        };
        if !self.ships[id.0].hit() {
            return ShotOutcome::Hit;
        }

        self.ships_sunk += 1;
        let remaining = self.ships.len() - self.ships_sunk;
        log::debug!(
            "ship {} sunk at ({}, {}), {}/{} ships remaining",
            id.0,
            x,
            y,
            remaining,
            self.ships.len()
        );
        if remaining == 0 {
            log::info!("all {} ships sunk", self.ships.len());
            ShotOutcome::GameOver
        } else {
            ShotOutcome::Sunk
        }
    }

    /// Returns `true` when at least one ship was placed and every ship is sunk.
    pub fn all_ships_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships_sunk == self.ships.len()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            for (i, cell) in row.iter().enumerate() {
                let c = match (cell.has_ship(), cell.hit) {
                    (true, true) => 'X',
                    (true, false) => 'S',
                    (false, true) => 'O',
                    (false, false) => '.',
                };
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{ size: {}, ships: {}, sunk: {}, shots: {} }}",
            self.size,
            self.ships.len(),
            self.ships_sunk,
            self.total_hits
        )?;
        write!(f, "{}", self)
    }
}
