//! Computer opponent: static evaluation, alpha-beta search and the bot
//! controller that maps a difficulty onto them.

pub mod bot;
pub mod eval;
pub mod search;

pub use bot::{Bot, BotConfig, Difficulty, Heuristic, MoveSelector, request_bot_move};
pub use eval::{EvalConfig, Evaluator};
pub use search::{SearchLimits, SearchResult, Searcher};
