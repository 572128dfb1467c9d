//! Forbidden-move rules for Black under the professional variant
//!
//! - Overline: the move makes a run of six or more. Always enforced.
//! - Double-four / double-three: the move makes fours, or open threes, in two
//!   or more directions at once. Only a partial heuristic, enabled with
//!   [`RuleConfig::double_patterns`].
//!
//! A move completing exactly five is never forbidden by the double patterns.
//! White is never restricted, and the normal variant bypasses every check.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Pos, Stone};

use super::win::{run_length, Direction};

/// Cells examined on each side of the candidate
const RADIUS: usize = 5;
const WIDTH: usize = 2 * RADIUS + 1;

/// Rule variant selected for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleVariant {
    /// Free-style: no forbidden points
    #[default]
    Normal,
    /// Black is restricted by forbidden points
    Professional,
}

/// Rule configuration for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub variant: RuleVariant,
    /// Also forbid double-three and double-four (off: overline only)
    pub double_patterns: bool,
}

impl RuleConfig {
    pub fn normal() -> Self {
        Self::default()
    }

    pub fn professional() -> Self {
        Self {
            variant: RuleVariant::Professional,
            double_patterns: false,
        }
    }
}

/// Which restriction a candidate move violates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForbiddenKind {
    Overline,
    DoubleFour,
    DoubleThree,
}

impl std::fmt::Display for ForbiddenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForbiddenKind::Overline => write!(f, "overline"),
            ForbiddenKind::DoubleFour => write!(f, "double-four"),
            ForbiddenKind::DoubleThree => write!(f, "double-three"),
        }
    }
}

/// The line through a candidate cell, candidate set to Black.
///
/// `None` marks cells past the board edge.
#[derive(Debug, Clone, Copy)]
struct LineWindow {
    cells: [Option<Stone>; WIDTH],
}

impl LineWindow {
    fn new(board: &Board, pos: Pos, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        let mut cells = [None; WIDTH];
        for (i, cell) in cells.iter_mut().enumerate() {
            let step = i as i32 - RADIUS as i32;
            *cell = pos.offset(dr, dc, step).map(|p| board.get(p));
        }
        cells[RADIUS] = Some(Stone::Black);
        Self { cells }
    }

    #[inline]
    fn is_empty(&self, idx: usize) -> bool {
        self.cells[idx] == Some(Stone::Empty)
    }

    fn with_black(&self, idx: usize) -> Self {
        let mut next = *self;
        next.cells[idx] = Some(Stone::Black);
        next
    }

    /// Bounds of the Black run containing the candidate
    fn run(&self) -> (usize, usize) {
        let black = |i: usize| self.cells[i] == Some(Stone::Black);
        let mut start = RADIUS;
        while start > 0 && black(start - 1) {
            start -= 1;
        }
        let mut end = RADIUS;
        while end + 1 < WIDTH && black(end + 1) {
            end += 1;
        }
        (start, end)
    }

    /// Filling `idx` makes a run of exactly five through the candidate.
    ///
    /// A run touching the window edge is at least six long, so it never counts.
    fn makes_five(&self, idx: usize) -> bool {
        if !self.is_empty(idx) {
            return false;
        }
        let (start, end) = self.with_black(idx).run();
        start <= idx && idx <= end && end - start + 1 == 5
    }

    /// Some empty cell completes exactly five
    fn has_four(&self) -> bool {
        (1..WIDTH - 1).any(|idx| idx != RADIUS && self.makes_five(idx))
    }

    /// Straight four `_BBBB_` where both ends complete exactly five
    fn has_open_four(&self) -> bool {
        let (start, end) = self.run();
        end - start + 1 == 4
            && start > 0
            && end + 1 < WIDTH
            && self.makes_five(start - 1)
            && self.makes_five(end + 1)
    }

    /// One more stone turns the line into a straight four
    fn has_open_three(&self) -> bool {
        (RADIUS - 3..=RADIUS + 3)
            .any(|idx| idx != RADIUS && self.is_empty(idx) && self.with_black(idx).has_open_four())
    }
}

/// Black makes a run longer than five through `pos`
pub fn is_overline(board: &Board, pos: Pos) -> bool {
    Direction::ALL
        .into_iter()
        .any(|dir| run_length(board, pos, Stone::Black, dir) > 5)
}

/// Number of directions in which Black placing at `pos` makes a four
pub fn count_fours(board: &Board, pos: Pos) -> u8 {
    Direction::ALL
        .into_iter()
        .filter(|&dir| LineWindow::new(board, pos, dir).has_four())
        .count() as u8
}

/// Number of directions in which Black placing at `pos` makes an open three
pub fn count_open_threes(board: &Board, pos: Pos) -> u8 {
    Direction::ALL
        .into_iter()
        .filter(|&dir| LineWindow::new(board, pos, dir).has_open_three())
        .count() as u8
}

/// Check a candidate move before it is committed.
///
/// Returns the violated restriction, or `None` when the move is allowed.
/// Occupancy is not checked here.
pub fn forbidden_kind(board: &Board, pos: Pos, player: Player, rules: &RuleConfig) -> Option<ForbiddenKind> {
    if rules.variant == RuleVariant::Normal || player != Player::Black {
        return None;
    }

    if is_overline(board, pos) {
        return Some(ForbiddenKind::Overline);
    }

    if !rules.double_patterns {
        return None;
    }

    // Completing five wins outright
    if Direction::ALL
        .into_iter()
        .any(|dir| run_length(board, pos, Stone::Black, dir) == 5)
    {
        return None;
    }

    if count_fours(board, pos) >= 2 {
        return Some(ForbiddenKind::DoubleFour);
    }
    if count_open_threes(board, pos) >= 2 {
        return Some(ForbiddenKind::DoubleThree);
    }
    None
}

/// Check if `player` may not play at `pos` under `rules`
#[inline]
pub fn is_forbidden_move(board: &Board, pos: Pos, player: Player, rules: &RuleConfig) -> bool {
    forbidden_kind(board, pos, player, rules).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> RuleConfig {
        RuleConfig {
            variant: RuleVariant::Professional,
            double_patterns: true,
        }
    }

    fn black_at(board: &mut Board, cells: &[(u8, u8)]) {
        for &(r, c) in cells {
            board.place(Pos::new(r, c), Player::Black).unwrap();
        }
    }

    #[test]
    fn test_normal_variant_never_forbidden() {
        let mut board = Board::new();
        black_at(&mut board, &[(7, 2), (7, 3), (7, 4), (7, 6), (7, 7)]);
        let pos = Pos::new(7, 5);
        assert!(is_overline(&board, pos));
        assert!(!is_forbidden_move(&board, pos, Player::Black, &RuleConfig::normal()));
        let normal_strict = RuleConfig {
            variant: RuleVariant::Normal,
            double_patterns: true,
        };
        assert!(!is_forbidden_move(&board, pos, Player::Black, &normal_strict));
    }

    #[test]
    fn test_black_overline_forbidden() {
        let mut board = Board::new();
        // B B B _ B B: filling the gap makes six
        black_at(&mut board, &[(7, 2), (7, 3), (7, 4), (7, 6), (7, 7)]);
        assert_eq!(
            forbidden_kind(&board, Pos::new(7, 5), Player::Black, &RuleConfig::professional()),
            Some(ForbiddenKind::Overline)
        );
    }

    #[test]
    fn test_exact_five_allowed() {
        let mut board = Board::new();
        black_at(&mut board, &[(7, 3), (7, 4), (7, 6), (7, 7)]);
        assert!(!is_forbidden_move(&board, Pos::new(7, 5), Player::Black, &strict()));
    }

    #[test]
    fn test_white_never_forbidden() {
        let mut board = Board::new();
        for c in [2, 3, 4, 6, 7] {
            board.place(Pos::new(7, c), Player::White).unwrap();
        }
        assert!(!is_forbidden_move(&board, Pos::new(7, 5), Player::White, &strict()));
    }

    #[test]
    fn test_double_three_only_with_double_patterns() {
        let mut board = Board::new();
        // + pattern: _ B _ B _ both ways through (7,7)
        black_at(&mut board, &[(7, 6), (7, 8), (6, 7), (8, 7)]);
        let pos = Pos::new(7, 7);
        assert_eq!(count_open_threes(&board, pos), 2);
        assert!(!is_forbidden_move(&board, pos, Player::Black, &RuleConfig::professional()));
        assert_eq!(
            forbidden_kind(&board, pos, Player::Black, &strict()),
            Some(ForbiddenKind::DoubleThree)
        );
    }

    #[test]
    fn test_double_three_diagonal_cross() {
        let mut board = Board::new();
        black_at(&mut board, &[(6, 6), (8, 8), (6, 8), (8, 6)]);
        let pos = Pos::new(7, 7);
        assert_eq!(count_open_threes(&board, pos), 2);
        assert!(is_forbidden_move(&board, pos, Player::Black, &strict()));
    }

    #[test]
    fn test_single_open_three_allowed() {
        let mut board = Board::new();
        black_at(&mut board, &[(7, 6), (7, 8)]);
        assert_eq!(count_open_threes(&board, Pos::new(7, 7)), 1);
        assert!(!is_forbidden_move(&board, Pos::new(7, 7), Player::Black, &strict()));
    }

    #[test]
    fn test_open_three_with_gap() {
        let mut board = Board::new();
        // _ B B _ X _
        black_at(&mut board, &[(7, 4), (7, 5)]);
        assert_eq!(count_open_threes(&board, Pos::new(7, 7)), 1);
    }

    #[test]
    fn test_three_blocked_by_opponent_not_open() {
        let mut board = Board::new();
        board.place(Pos::new(7, 3), Player::White).unwrap();
        black_at(&mut board, &[(7, 4), (7, 6)]);
        assert_eq!(count_open_threes(&board, Pos::new(7, 5)), 0);
    }

    #[test]
    fn test_three_blocked_by_edge_not_open() {
        let mut board = Board::new();
        black_at(&mut board, &[(0, 0), (0, 2)]);
        assert_eq!(count_open_threes(&board, Pos::new(0, 1)), 0);
    }

    #[test]
    fn test_three_near_edge_with_space_is_open() {
        let mut board = Board::new();
        // _ B X B _ _ starting at column 0
        black_at(&mut board, &[(0, 1), (0, 3)]);
        assert_eq!(count_open_threes(&board, Pos::new(0, 2)), 1);
    }

    #[test]
    fn test_four_is_not_three() {
        let mut board = Board::new();
        black_at(&mut board, &[(7, 4), (7, 5), (7, 7)]);
        let pos = Pos::new(7, 6);
        assert_eq!(count_open_threes(&board, pos), 0);
        assert_eq!(count_fours(&board, pos), 1);
    }

    #[test]
    fn test_double_four_forbidden() {
        let mut board = Board::new();
        // Horizontal B B B X and vertical B B B X meeting at (7,7)
        black_at(&mut board, &[(7, 4), (7, 5), (7, 6), (4, 7), (5, 7), (6, 7)]);
        let pos = Pos::new(7, 7);
        assert_eq!(count_fours(&board, pos), 2);
        assert_eq!(
            forbidden_kind(&board, pos, Player::Black, &strict()),
            Some(ForbiddenKind::DoubleFour)
        );
        assert!(!is_forbidden_move(&board, pos, Player::Black, &RuleConfig::professional()));
    }

    #[test]
    fn test_blocked_four_still_counts_as_four() {
        let mut board = Board::new();
        board.place(Pos::new(7, 3), Player::White).unwrap();
        black_at(&mut board, &[(7, 4), (7, 5), (7, 6)]);
        assert_eq!(count_fours(&board, Pos::new(7, 7)), 1);
    }

    #[test]
    fn test_empty_board_allowed() {
        let board = Board::new();
        assert!(!is_forbidden_move(&board, Pos::new(7, 7), Player::Black, &strict()));
    }

    #[test]
    fn test_variant_serde_names() {
        let rules: RuleConfig =
            toml::from_str("variant = \"professional\"\ndouble_patterns = true").unwrap();
        assert_eq!(rules, strict());
        let defaults: RuleConfig = toml::from_str("").unwrap();
        assert_eq!(defaults, RuleConfig::normal());
    }
}
