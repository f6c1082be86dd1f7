use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::EngineError;

pub const SIDE: usize = 4;
pub const CELLS: usize = SIDE * SIDE;
/// Tile value that wins the game.
pub const TARGET_TILE: u32 = 2048;
/// Largest tile a 4x4 board can hold.
pub const MAX_TILE: u32 = 1 << 17;

/// 4x4 grid of tile values in row-major order; 0 is an empty cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[u32; CELLS]", into = "[u32; CELLS]")]
pub struct Board([u32; CELLS]);

impl Board {
    pub const EMPTY: Board = Board([0; CELLS]);

    /// Build a board from raw cells, rejecting anything that is not 0 or a power of two >= 2.
    pub fn from_cells(cells: [u32; CELLS]) -> Result<Self, EngineError> {
        for (index, &value) in cells.iter().enumerate() {
            if !is_tile_value(value) {
                return Err(EngineError::InvalidTile { index, value });
            }
        }
        Ok(Board(cells))
    }

    pub fn cells(&self) -> &[u32; CELLS] { &self.0 }

    pub fn get(&self, index: usize) -> Option<u32> { self.0.get(index).copied() }

    pub(crate) fn set(&mut self, index: usize, value: u32) { self.0[index] = value; }

    pub(crate) fn clear(&mut self) { self.0 = [0; CELLS]; }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.0.iter().enumerate().filter(|(_, &v)| v == 0).map(|(i, _)| i).collect()
    }

    pub fn count_empty(&self) -> usize { self.0.iter().filter(|&&v| v == 0).count() }

    pub fn tile_count(&self) -> usize { CELLS - self.count_empty() }

    pub fn is_full(&self) -> bool { self.0.iter().all(|&v| v != 0) }

    pub fn highest_tile(&self) -> u32 { self.0.iter().copied().max().unwrap_or(0) }

    /// Neighbouring index one step in `dir`, or `None` at the wall.
    pub fn neighbor(index: usize, dir: Direction) -> Option<usize> {
        let (dr, dc) = dir.delta();
        let row = (index / SIDE) as isize + dr;
        let col = (index % SIDE) as isize + dc;
        if (0..SIDE as isize).contains(&row) && (0..SIDE as isize).contains(&col) {
            Some(row as usize * SIDE + col as usize)
        } else {
            None
        }
    }

    /// Terminal when every cell is filled and no right/down neighbour pair is equal.
    pub fn is_game_over(&self) -> bool {
        for i in 0..CELLS {
            let v = self.0[i];
            if v == 0 { return false; }
            let (row, col) = (i / SIDE, i % SIDE);
            if col < SIDE - 1 && v == self.0[i + 1] { return false; }
            if row < SIDE - 1 && v == self.0[i + SIDE] { return false; }
        }
        true
    }
}

/// 0, or a power of two in `2..=MAX_TILE`.
pub fn is_tile_value(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

impl Index<usize> for Board {
    type Output = u32;
    fn index(&self, index: usize) -> &u32 { &self.0[index] }
}

impl From<Board> for [u32; CELLS] {
    fn from(b: Board) -> Self { b.0 }
}

impl TryFrom<[u32; CELLS]> for Board {
    type Error = EngineError;
    fn try_from(cells: [u32; CELLS]) -> Result<Self, EngineError> { Board::from_cells(cells) }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIDE {
            if row > 0 { writeln!(f, "-----+-----+-----+-----")?; }
            let line: Vec<String> = (0..SIDE).map(|col| format_val(self.0[row * SIDE + col])).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(v: u32) -> String {
    if v == 0 { "     ".to_string() } else { format!("{:^5}", v) }
}
