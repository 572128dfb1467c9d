//! Single-ply cell scoring
//!
//! Each empty cell is scored twice: once as if the mover played there
//! (offense) and once as if the opponent did (defense). Neither pass copies
//! the board; the line scan never reads the candidate cell itself.

use crate::board::{Board, Player, Pos, Stone};
use crate::rules::{count_direction, Direction};

use super::patterns::{defense_score, offense_score};

/// Run through a candidate cell along one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineShape {
    /// Contiguous stones including the candidate
    pub count: usize,
    /// Ends whose next cell is on the board and occupied (0-2)
    pub blocked: u8,
}

/// Classify the run `stone` would have through `pos` along `direction`
pub fn line_shape(board: &Board, pos: Pos, stone: Stone, direction: Direction) -> LineShape {
    let (dr, dc) = direction.delta();
    let forward = count_direction(board, pos, stone, dr, dc);
    let backward = count_direction(board, pos, stone, -dr, -dc);

    // An end is blocked when the cell past the run exists and holds any stone
    let is_blocked = |dr: i32, dc: i32, run: usize| {
        pos.offset(dr, dc, run as i32 + 1)
            .is_some_and(|p| !board.is_empty(p))
    };
    let blocked = u8::from(is_blocked(dr, dc, forward)) + u8::from(is_blocked(-dr, -dc, backward));

    LineShape {
        count: 1 + forward + backward,
        blocked,
    }
}

/// Offense half of a cell's score
pub fn offense(board: &Board, pos: Pos, player: Player) -> i32 {
    Direction::ALL
        .into_iter()
        .map(|dir| {
            let shape = line_shape(board, pos, player.stone(), dir);
            offense_score(shape.count, shape.blocked)
        })
        .sum()
}

/// Defense half of a cell's score
pub fn defense(board: &Board, pos: Pos, player: Player) -> i32 {
    let opponent = player.opponent();
    Direction::ALL
        .into_iter()
        .map(|dir| {
            let shape = line_shape(board, pos, opponent.stone(), dir);
            defense_score(shape.count, shape.blocked)
        })
        .sum()
}

/// Total score of playing `player` at the empty cell `pos`
#[must_use]
pub fn score_cell(board: &Board, pos: Pos, player: Player) -> i32 {
    offense(board, pos, player) + defense(board, pos, player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::PatternScore;

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::new();
        assert_eq!(score_cell(&board, Pos::new(7, 7), Player::White), 0);
    }

    #[test]
    fn test_line_shape_open_and_blocked() {
        let mut board = Board::new();
        board.place(Pos::new(7, 5), Player::White).unwrap();
        board.place(Pos::new(7, 6), Player::White).unwrap();
        board.place(Pos::new(7, 8), Player::Black).unwrap();

        let shape = line_shape(&board, Pos::new(7, 7), Stone::White, Direction::Horizontal);
        assert_eq!(shape, LineShape { count: 3, blocked: 1 });

        let shape = line_shape(&board, Pos::new(7, 7), Stone::White, Direction::Vertical);
        assert_eq!(shape, LineShape { count: 1, blocked: 0 });
    }

    #[test]
    fn test_board_edge_is_not_blocked() {
        let mut board = Board::new();
        board.place(Pos::new(0, 1), Player::White).unwrap();
        let shape = line_shape(&board, Pos::new(0, 0), Stone::White, Direction::Horizontal);
        assert_eq!(shape, LineShape { count: 2, blocked: 0 });
    }

    #[test]
    fn test_offense_open_three() {
        let mut board = Board::new();
        board.place(Pos::new(7, 6), Player::White).unwrap();
        board.place(Pos::new(7, 8), Player::White).unwrap();
        assert_eq!(offense(&board, Pos::new(7, 7), Player::White), PatternScore::OPEN_THREE);
        assert_eq!(defense(&board, Pos::new(7, 7), Player::White), 0);
    }

    #[test]
    fn test_defense_against_closed_four() {
        let mut board = Board::new();
        for c in 1..4 {
            board.place(Pos::new(3, c), Player::Black).unwrap();
        }
        board.place(Pos::new(3, 0), Player::White).unwrap();
        assert_eq!(
            defense(&board, Pos::new(3, 4), Player::White),
            PatternScore::BLOCK_CLOSED_FOUR
        );
    }

    #[test]
    fn test_defense_against_five() {
        let mut board = Board::new();
        for c in [2, 3, 5, 6] {
            board.place(Pos::new(9, c), Player::Black).unwrap();
        }
        assert_eq!(defense(&board, Pos::new(9, 4), Player::White), PatternScore::FIVE);
    }
}
