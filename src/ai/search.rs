use std::time::Duration;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::ai::eval::Evaluator;
use crate::board::Board;
use crate::rules;
use crate::types::{Player, Position};

/// Lower bound of the search window. Symmetric with [`MAX_SCORE`].
pub const MIN_SCORE: i32 = -i32::MAX;
pub const MAX_SCORE: i32 = i32::MAX;

/// Outcome of a search. Scores follow the evaluator: White maximises,
/// Black minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub score: i32,
    /// Best move for the player to act at the root; `None` at leaves and
    /// when that player has to pass.
    pub mv: Option<Position>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self { score, mv: None }
    }
}

/// Optional budget on top of the depth bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchLimits {
    pub time_limit_ms: Option<u64>,
    pub node_limit: Option<u64>,
}

pub struct Searcher<'a> {
    evaluator: &'a Evaluator,
    limits: SearchLimits,
    start_time: Instant,
    nodes: u64,
    aborted: bool,
    enforce_limits: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a Evaluator) -> Self {
        Self::with_limits(evaluator, SearchLimits::default())
    }

    pub fn with_limits(evaluator: &'a Evaluator, limits: SearchLimits) -> Self {
        Self {
            evaluator,
            limits,
            start_time: Instant::now(),
            nodes: 0,
            aborted: false,
            enforce_limits: true,
        }
    }

    /// Nodes visited by the last call.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether the last call ran out of budget. The result of an aborted
    /// search is a best effort.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Fixed-depth alpha-beta search for `player` from `board`.
    ///
    /// `max_depth == 0` returns the static evaluation with no move.
    pub fn search(&mut self, board: &Board, player: Player, max_depth: u8) -> SearchResult {
        self.reset();
        self.alpha_beta(board, 0, max_depth, player, MIN_SCORE, MAX_SCORE)
    }

    /// Unpruned minimax over the same tree as [`Searcher::search`].
    pub fn minimax(&mut self, board: &Board, player: Player, max_depth: u8) -> SearchResult {
        self.reset();
        let result = self.plain_minimax(board, 0, max_depth, player);
        self.aborted = false;
        result
    }

    /// Iterative deepening up to `max_depth`, keeping the move of the deepest
    /// iteration that finished within budget. Depth 1 always completes.
    pub fn best_move(&mut self, board: &Board, player: Player, max_depth: u8) -> SearchResult {
        let start = Instant::now();
        let moves = rules::legal_moves(board, player);
        match moves.as_slice() {
            [] => return self.search(board, player, 0),
            [only] => {
                return SearchResult {
                    score: self.evaluator.evaluate(board),
                    mv: Some(*only),
                };
            }
            _ => {}
        }

        let mut best = SearchResult {
            score: self.evaluator.evaluate(board),
            mv: Some(moves[0]),
        };
        let mut total_nodes = 0;
        let mut completed = 0;

        for depth in 1..=max_depth.max(1) {
            self.enforce_limits = depth > 1;
            self.start_time = start;
            self.nodes = 0;
            self.aborted = false;
            let result = self.alpha_beta(board, 0, depth, player, MIN_SCORE, MAX_SCORE);
            total_nodes += self.nodes;
            if self.aborted {
                trace!("depth {depth} aborted after {} nodes", self.nodes);
                break;
            }
            trace!("depth {depth}: score {} move {:?}", result.score, result.mv);
            best = result;
            completed = depth;
        }

        self.enforce_limits = true;
        self.nodes = total_nodes;
        debug!(
            "{player:?} search: depth {completed}/{max_depth}, score {}, move {:?}, {} nodes in {:?}",
            best.score,
            best.mv,
            total_nodes,
            start.elapsed()
        );
        best
    }

    fn reset(&mut self) {
        self.start_time = Instant::now();
        self.nodes = 0;
        self.aborted = false;
    }

    fn alpha_beta(
        &mut self,
        board: &Board,
        depth: u8,
        max_depth: u8,
        player: Player,
        mut alpha: i32,
        mut beta: i32,
    ) -> SearchResult {
        self.nodes += 1;

        let legal = rules::legal_mask(board, player);
        let opp_legal = rules::legal_mask(board, player.opponent());
        if legal == 0 && opp_legal == 0 {
            return SearchResult::leaf(self.evaluator.final_score(board));
        }
        if depth >= max_depth || self.out_of_budget() {
            return SearchResult::leaf(self.evaluator.evaluate(board));
        }
        if legal == 0 {
            // A pass consumes no depth.
            let reply = self.alpha_beta(board, depth, max_depth, player.opponent(), alpha, beta);
            return SearchResult::leaf(reply.score);
        }

        let maximizing = player == Player::White;
        let mut best = SearchResult {
            score: if maximizing { MIN_SCORE } else { MAX_SCORE },
            mv: None,
        };

        for mv in rules::mask_to_positions(legal) {
            let mut next = *board;
            rules::apply_move(&mut next, mv, player);
            let score = self
                .alpha_beta(&next, depth + 1, max_depth, player.opponent(), alpha, beta)
                .score;

            if maximizing {
                if best.mv.is_none() || score > best.score {
                    best = SearchResult { score, mv: Some(mv) };
                }
                alpha = alpha.max(score);
            } else {
                if best.mv.is_none() || score < best.score {
                    best = SearchResult { score, mv: Some(mv) };
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }

    fn plain_minimax(
        &mut self,
        board: &Board,
        depth: u8,
        max_depth: u8,
        player: Player,
    ) -> SearchResult {
        self.nodes += 1;

        let legal = rules::legal_mask(board, player);
        let opp_legal = rules::legal_mask(board, player.opponent());
        if legal == 0 && opp_legal == 0 {
            return SearchResult::leaf(self.evaluator.final_score(board));
        }
        if depth >= max_depth {
            return SearchResult::leaf(self.evaluator.evaluate(board));
        }
        if legal == 0 {
            let reply = self.plain_minimax(board, depth, max_depth, player.opponent());
            return SearchResult::leaf(reply.score);
        }

        let maximizing = player == Player::White;
        let mut best: Option<SearchResult> = None;
        for mv in rules::mask_to_positions(legal) {
            let mut next = *board;
            rules::apply_move(&mut next, mv, player);
            let score = self
                .plain_minimax(&next, depth + 1, max_depth, player.opponent())
                .score;
            let better = match best {
                None => true,
                Some(current) if maximizing => score > current.score,
                Some(current) => score < current.score,
            };
            if better {
                best = Some(SearchResult { score, mv: Some(mv) });
            }
        }

        best.unwrap_or(SearchResult::leaf(self.evaluator.evaluate(board)))
    }

    fn out_of_budget(&mut self) -> bool {
        if !self.enforce_limits {
            return false;
        }
        if self.aborted {
            return true;
        }
        let over_nodes = self.limits.node_limit.is_some_and(|limit| self.nodes > limit);
        let over_time = self
            .limits
            .time_limit_ms
            .is_some_and(|ms| self.start_time.elapsed() >= Duration::from_millis(ms));
        if over_nodes || over_time {
            self.aborted = true;
        }
        self.aborted
    }
}
