//! Pattern scores for move evaluation
//!
//! A line through a candidate cell is classified by its run length and by how
//! many of its two ends are occupied. Defense weights are higher than offense
//! for fours and open threes, so blocking the opponent comes first.

/// Pattern scores for the single-ply evaluator
pub struct PatternScore;

impl PatternScore {
    /// Five or more in a row, either side
    pub const FIVE: i32 = 10_000;

    // Own stone at the cell
    pub const OPEN_FOUR: i32 = 1_000;
    pub const CLOSED_FOUR: i32 = 100;
    pub const OPEN_THREE: i32 = 50;
    pub const CLOSED_THREE: i32 = 10;
    pub const OPEN_TWO: i32 = 5;

    // Opponent stone at the cell
    pub const BLOCK_OPEN_FOUR: i32 = 2_000;
    pub const BLOCK_CLOSED_FOUR: i32 = 500;
    pub const BLOCK_OPEN_THREE: i32 = 200;
}

/// Score for the mover's own run of `count` with `blocked` occupied ends
pub fn offense_score(count: usize, blocked: u8) -> i32 {
    match (count, blocked) {
        (5.., _) => PatternScore::FIVE,
        (4, 0) => PatternScore::OPEN_FOUR,
        (4, 1) => PatternScore::CLOSED_FOUR,
        (3, 0) => PatternScore::OPEN_THREE,
        (3, 1) => PatternScore::CLOSED_THREE,
        (2, 0) => PatternScore::OPEN_TWO,
        _ => 0,
    }
}

/// Score for denying the opponent a run of `count` with `blocked` occupied ends
pub fn defense_score(count: usize, blocked: u8) -> i32 {
    match (count, blocked) {
        (5.., _) => PatternScore::FIVE,
        (4, 0) => PatternScore::BLOCK_OPEN_FOUR,
        (4, 1) => PatternScore::BLOCK_CLOSED_FOUR,
        (3, 0) => PatternScore::BLOCK_OPEN_THREE,
        _ => 0,
    }
}
