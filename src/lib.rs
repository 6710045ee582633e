use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;

pub use ai::{Bot, BotConfig, Difficulty, request_bot_move};
pub use board::Board;
pub use error::{MoveError, UnknownDifficulty};
pub use game::GameState;
pub use types::{Cell, GameResult, GameSnapshot, MoveOutcome, Player, Position};

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    init_logger();
}

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// A game against the computer, driven from JavaScript.
#[wasm_bindgen]
pub struct ReversiGame {
    state: GameState,
    bot: Bot,
}

#[wasm_bindgen]
impl ReversiGame {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str) -> Result<ReversiGame, JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(to_js_error)?;
        Ok(Self {
            state: GameState::new(),
            bot: Bot::from_difficulty(difficulty),
        })
    }

    /// Builds a game whose bot uses a custom `BotConfig` object.
    pub fn with_config(config: JsValue) -> Result<ReversiGame, JsValue> {
        let config: BotConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            state: GameState::new(),
            bot: Bot::new(config),
        })
    }

    pub fn reset(&mut self) {
        self.state = GameState::new();
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(to_js_error)?;
        self.bot = Bot::from_difficulty(difficulty);
        Ok(())
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.snapshot())
    }

    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.legal_moves())
    }

    /// Tries to play `(x, y)` for the side to move. Throws on off-board coordinates.
    pub fn attempt_move(&mut self, x: i32, y: i32) -> Result<JsValue, JsValue> {
        let pos = Position::checked(x, y)
            .ok_or_else(|| JsValue::from_str(&format!("position ({x}, {y}) is off the board")))?;
        to_js(&self.play(pos))
    }

    /// The bot's choice for the side to move, or `null` when it must pass.
    pub fn request_bot_move(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.bot_choice())
    }

    /// Asks the bot for a move and applies it.
    pub fn play_bot_move(&mut self) -> Result<JsValue, JsValue> {
        let outcome = match self.bot_choice() {
            Some(pos) => self.play(pos),
            None => MoveOutcome {
                accepted: false,
                flipped: Vec::new(),
                error: Some(if self.state.is_terminal() {
                    MoveError::GameOver.to_string()
                } else {
                    "no legal move for the bot".to_string()
                }),
            },
        };
        to_js(&outcome)
    }

    pub fn pass(&mut self) -> Result<(), JsValue> {
        self.state.pass().map_err(to_js_error)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.result())
    }
}

impl ReversiGame {
    pub fn game(&self) -> &GameState {
        &self.state
    }

    fn play(&mut self, pos: Position) -> MoveOutcome {
        match self.state.attempt_move(pos) {
            Ok(flipped) => MoveOutcome {
                accepted: true,
                flipped,
                error: None,
            },
            Err(err) => MoveOutcome {
                accepted: false,
                flipped: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }

    fn bot_choice(&mut self) -> Option<Position> {
        if self.state.is_terminal() {
            return None;
        }
        self.bot
            .choose_move(self.state.board(), self.state.current_player())
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_missing_as_null(true);
    Ok(value.serialize(&serializer)?)
}

fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}

#[cfg(feature = "console_log")]
fn init_logger() {
    // A second `start` call would find the logger already set.
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[cfg(not(feature = "console_log"))]
fn init_logger() {}
