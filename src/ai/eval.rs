use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::{BOARD_WIDTH, Player, Position};

/// Classic positional table, indexed `[y][x]`.
pub const DEFAULT_WEIGHTS: [[i32; BOARD_WIDTH]; BOARD_WIDTH] = [
    [100, -20, 10, 5, 5, 10, -20, 100],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [100, -20, 10, 5, 5, 10, -20, 100],
];
pub const DEFAULT_STONE_WEIGHT: i32 = 2;
pub const DEFAULT_ENDGAME_EMPTIES: u8 = 14;
pub const DEFAULT_EXACT_SCALE: i32 = 1000;

/// Each corner with the squares whose penalty depends on it being empty.
const CORNERS: [((u8, u8), [(u8, u8); 3]); 4] = [
    ((0, 0), [(1, 0), (0, 1), (1, 1)]),
    ((7, 0), [(6, 0), (7, 1), (6, 1)]),
    ((0, 7), [(0, 6), (1, 7), (1, 6)]),
    ((7, 7), [(6, 7), (7, 6), (6, 6)]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvalConfig {
    pub weights: [[i32; BOARD_WIDTH]; BOARD_WIDTH],
    pub stone_weight: i32,
    /// At or below this many empty squares only the stone count matters.
    pub endgame_empties: u8,
    pub exact_scale: i32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            stone_weight: DEFAULT_STONE_WEIGHT,
            endgame_empties: DEFAULT_ENDGAME_EMPTIES,
            exact_scale: DEFAULT_EXACT_SCALE,
        }
    }
}

/// Static evaluation. Positive scores favour White, negative favour Black.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, board: &Board) -> i32 {
        if board.empty_count() <= self.config.endgame_empties {
            return self.final_score(board);
        }

        let weights = self.effective_weights(board);
        let positional = weighted_sum(&weights, board.stones(Player::White))
            - weighted_sum(&weights, board.stones(Player::Black));

        positional + board.stone_differential(Player::White) * self.config.stone_weight
    }

    /// Exact outcome of a finished (or nearly finished) game.
    pub fn final_score(&self, board: &Board) -> i32 {
        board.stone_differential(Player::White) * self.config.exact_scale
    }

    /// Score from `player`'s point of view.
    pub fn evaluate_for(&self, board: &Board, player: Player) -> i32 {
        match player {
            Player::White => self.evaluate(board),
            Player::Black => -self.evaluate(board),
        }
    }

    /// The penalties around a corner only hold while the corner is empty.
    fn effective_weights(&self, board: &Board) -> [[i32; BOARD_WIDTH]; BOARD_WIDTH] {
        let mut weights = self.config.weights;
        let occupied = board.occupied();
        for ((cx, cy), neighbours) in CORNERS {
            if occupied & Position::new(cx, cy).bit() == 0 {
                continue;
            }
            for (x, y) in neighbours {
                let weight = &mut weights[y as usize][x as usize];
                if *weight < 0 {
                    *weight = 0;
                }
            }
        }
        weights
    }
}

fn weighted_sum(weights: &[[i32; BOARD_WIDTH]; BOARD_WIDTH], mut stones: u64) -> i32 {
    let mut sum = 0;
    while stones != 0 {
        let pos = Position::from_index(stones.trailing_zeros() as usize);
        sum += weights[pos.y() as usize][pos.x() as usize];
        stones &= stones - 1;
    }
    sum
}
