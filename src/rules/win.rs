//! Win and draw detection
//!
//! Only the four lines through the last stone can have changed, so the
//! result is computed from that stone outward. Five or more in a row wins;
//! there is no exact-five restriction here.

use crate::board::{Board, Player, Pos, Stone};

/// The four line directions through a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right
    DiagonalDown,
    /// Bottom-left to top-right
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// Forward step `(dr, dc)`; the backward step is its negation
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (1, -1),
        }
    }
}

/// Result of the game after a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Win {
        player: Player,
        direction: Direction,
    },
    Draw,
}

impl GameOutcome {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win { player, .. } => Some(player),
            _ => None,
        }
    }
}

/// Count consecutive `stone` cells walking away from `pos` along `(dr, dc)`.
///
/// `pos` itself is not read.
#[inline]
pub fn count_direction(board: &Board, pos: Pos, stone: Stone, dr: i32, dc: i32) -> usize {
    (1..)
        .map_while(|i| pos.offset(dr, dc, i))
        .take_while(|&p| board.get(p) == stone)
        .count()
}

/// Length of the contiguous run through `pos` as if `pos` held `stone`.
///
/// The cell at `pos` is never read, so this also evaluates a candidate move
/// on the current board without copying it.
#[inline]
pub fn run_length(board: &Board, pos: Pos, stone: Stone, direction: Direction) -> usize {
    let (dr, dc) = direction.delta();
    1 + count_direction(board, pos, stone, dr, dc) + count_direction(board, pos, stone, -dr, -dc)
}

/// Fast five-in-a-row check at a specific position.
///
/// Returns the first direction holding 5+ stones of `stone` through `pos`.
#[inline]
pub fn five_direction_at(board: &Board, pos: Pos, stone: Stone) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&dir| run_length(board, pos, stone, dir) >= 5)
}

/// Evaluate the game after a stone was placed at `pos`.
///
/// Win if any line through `pos` holds 5+ of that stone's color, otherwise
/// Draw on a full board, otherwise InProgress.
pub fn check_result(board: &Board, pos: Pos) -> GameOutcome {
    if let Some(player) = board.get(pos).player() {
        if let Some(direction) = five_direction_at(board, pos, player.stone()) {
            return GameOutcome::Win { player, direction };
        }
    }
    if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

/// Positions of the winning run through `pos`, ordered along the line.
pub fn find_five_line_at_pos(board: &Board, pos: Pos) -> Option<Vec<Pos>> {
    let stone = board.get(pos);
    if stone == Stone::Empty {
        return None;
    }
    let direction = five_direction_at(board, pos, stone)?;
    let (dr, dc) = direction.delta();
    let back = count_direction(board, pos, stone, -dr, -dc) as i32;
    let forward = count_direction(board, pos, stone, dr, dc) as i32;
    (-back..=forward)
        .map(|i| pos.offset(dr, dc, i))
        .collect()
}
