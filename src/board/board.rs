//! Board structure with move log

use super::bitboard::Bitboard;
use super::{Player, Pos, Stone, BOARD_SIZE, TOTAL_CELLS};
use crate::error::MoveError;

/// One accepted placement, in the order it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub pos: Pos,
    pub player: Player,
}

impl MoveRecord {
    pub fn new(pos: Pos, player: Player) -> Self {
        Self { pos, player }
    }
}

/// Game board: cell occupancy plus the replay log.
///
/// Cells only change through [`Board::place`] and [`Board::undo_last`], so the
/// log and the grid always describe the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    black: Bitboard,
    white: Bitboard,
    history: Vec<MoveRecord>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
            history: Vec::with_capacity(TOTAL_CELLS),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone and append it to the log.
    ///
    /// Fails without touching the board when the cell is taken.
    pub fn place(&mut self, pos: Pos, player: Player) -> Result<(), MoveError> {
        if !self.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }
        match player {
            Player::Black => self.black.set(pos),
            Player::White => self.white.set(pos),
        }
        self.history.push(MoveRecord::new(pos, player));
        Ok(())
    }

    /// Pop the most recent placement and empty its cell.
    ///
    /// Returns `None` on an empty log.
    pub fn undo_last(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.black.clear(record.pos);
        self.white.clear(record.pos);
        Some(record)
    }

    /// True iff no cell is empty
    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == TOTAL_CELLS
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// Replay log, oldest first
    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<MoveRecord> {
        self.history.last().copied()
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let occupied = self.black.union(&self.white);
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(move |&pos| !occupied.get(pos))
    }

    /// Full-grid copy for renderers
    pub fn grid(&self) -> [[Stone; BOARD_SIZE]; BOARD_SIZE] {
        let mut grid = [[Stone::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (pos, stone) in self
            .black
            .iter_ones()
            .map(|p| (p, Stone::Black))
            .chain(self.white.iter_ones().map(|p| (p, Stone::White)))
        {
            grid[pos.row as usize][pos.col as usize] = stone;
        }
        grid
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for c in 0..BOARD_SIZE {
            write!(f, "{c:3}")?;
        }
        writeln!(f)?;
        for (r, row) in self.grid().iter().enumerate() {
            write!(f, "{r:3}")?;
            for cell in row {
                let ch = match cell {
                    Stone::Black => "  X",
                    Stone::White => "  O",
                    Stone::Empty => "  .",
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
