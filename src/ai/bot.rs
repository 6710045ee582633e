use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::ai::eval::{EvalConfig, Evaluator};
use crate::ai::search::{SearchLimits, Searcher};
use crate::board::Board;
use crate::error::UnknownDifficulty;
use crate::game::GameState;
use crate::rules;
use crate::types::{Player, Position};

/// Picks a move for `player`. Implementations only see a copy of the board.
pub trait MoveSelector: Send {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Position>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Weak,
    Normal,
    Strong,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Weak,
        Difficulty::Normal,
        Difficulty::Strong,
        Difficulty::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Weak => "weak",
            Difficulty::Normal => "normal",
            Difficulty::Strong => "strong",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" | "random" => Ok(Difficulty::Beginner),
            "weak" | "easy" => Ok(Difficulty::Weak),
            "normal" | "medium" => Ok(Difficulty::Normal),
            "strong" | "hard" => Ok(Difficulty::Strong),
            "expert" | "extreme" => Ok(Difficulty::Expert),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Heuristic {
    /// Uniformly random legal move.
    Random,
    /// Legal move flipping the most stones right now.
    MaxFlips,
    /// Alpha-beta search.
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BotConfig {
    pub heuristic: Heuristic,
    pub depth: u8,
    /// Search to the end of the game once this few squares are empty.
    pub exact_endgame_empties: Option<u8>,
    pub limits: SearchLimits,
    pub eval: EvalConfig,
    /// Fixed seed for the random heuristic; entropy when absent.
    pub seed: Option<u64>,
}

impl BotConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let base = Self {
            heuristic: Heuristic::Search,
            depth: 0,
            exact_endgame_empties: None,
            limits: SearchLimits::default(),
            eval: EvalConfig::default(),
            seed: None,
        };
        match difficulty {
            Difficulty::Beginner => Self {
                heuristic: Heuristic::Random,
                ..base
            },
            Difficulty::Weak => Self {
                heuristic: Heuristic::MaxFlips,
                ..base
            },
            Difficulty::Normal => Self { depth: 3, ..base },
            Difficulty::Strong => Self {
                depth: 5,
                exact_endgame_empties: Some(10),
                limits: SearchLimits {
                    time_limit_ms: Some(2_000),
                    node_limit: None,
                },
                ..base
            },
            Difficulty::Expert => Self {
                depth: 7,
                exact_endgame_empties: Some(14),
                limits: SearchLimits {
                    time_limit_ms: Some(5_000),
                    node_limit: None,
                },
                ..base
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Normal)
    }
}

pub struct RandomSelector {
    rng: SmallRng,
}

impl RandomSelector {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng }
    }
}

impl MoveSelector for RandomSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        rules::legal_moves(board, player).choose(&mut self.rng).copied()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MaxFlipsSelector;

impl MoveSelector for MaxFlipsSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        let mut best: Option<(Position, u32)> = None;
        for mv in rules::legal_moves(board, player) {
            let count = rules::flips(board, mv, player).count_ones();
            if best.is_none_or(|(_, most)| count > most) {
                best = Some((mv, count));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

pub struct SearchSelector {
    evaluator: Evaluator,
    depth: u8,
    exact_endgame_empties: Option<u8>,
    limits: SearchLimits,
}

impl SearchSelector {
    pub fn new(
        eval: EvalConfig,
        depth: u8,
        exact_endgame_empties: Option<u8>,
        limits: SearchLimits,
    ) -> Self {
        Self {
            evaluator: Evaluator::new(eval),
            depth,
            exact_endgame_empties,
            limits,
        }
    }

    fn depth_for(&self, board: &Board) -> u8 {
        let empties = board.empty_count();
        match self.exact_endgame_empties {
            Some(threshold) if empties <= threshold => empties.max(self.depth),
            _ => self.depth,
        }
    }
}

impl MoveSelector for SearchSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        let depth = self.depth_for(board);
        let mut searcher = Searcher::with_limits(&self.evaluator, self.limits);
        searcher.best_move(board, player, depth).mv
    }
}

/// Chooses replies for the computer player according to a [`BotConfig`].
pub struct Bot {
    config: BotConfig,
    selector: Box<dyn MoveSelector>,
}

impl Bot {
    pub fn new(config: BotConfig) -> Self {
        let selector: Box<dyn MoveSelector> = match config.heuristic {
            Heuristic::Random => Box::new(RandomSelector::new(config.seed)),
            Heuristic::MaxFlips => Box::new(MaxFlipsSelector),
            Heuristic::Search => Box::new(SearchSelector::new(
                config.eval.clone(),
                config.depth,
                config.exact_endgame_empties,
                config.limits,
            )),
        };
        Self { config, selector }
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(BotConfig::from_difficulty(difficulty))
    }

    /// Returns a legal move for `player`, or `None` when `player` must pass.
    pub fn choose_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        let private = *board;
        if !rules::has_legal_move(&private, player) {
            debug!("{player:?} has no legal move; bot passes");
            return None;
        }

        let mv = self.selector.select_move(&private, player);
        debug_assert!(
            mv.is_none_or(|mv| rules::is_legal(board, mv, player)),
            "selector returned an illegal move {mv:?}"
        );
        debug!("{player:?} bot ({:?}) chose {mv:?}", self.config.heuristic);
        mv
    }
}

/// One-shot bot reply for the player to move in `state`.
pub fn request_bot_move(state: &GameState, difficulty: Difficulty) -> Option<Position> {
    if state.is_terminal() {
        return None;
    }
    Bot::from_difficulty(difficulty).choose_move(state.board(), state.current_player())
}
