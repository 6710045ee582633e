use log::debug;

use crate::board::Board;
use crate::error::MoveError;
use crate::rules;
use crate::types::{GameResult, GameSnapshot, Player, Position};

/// A live game: board, side to move and pass bookkeeping.
///
/// All mutation of a game goes through [`GameState::attempt_move`] and
/// [`GameState::pass`]; a rejected call leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    consecutive_passes: u8,
    is_game_over: bool,
    is_pass: bool,
    flipped: Vec<Position>,
}

impl GameState {
    pub fn new() -> Self {
        Self::from_position(Board::new(), Player::Black)
    }

    /// Starts from an arbitrary position. The game is finished immediately
    /// when neither side can move.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        Self {
            board,
            current_player: to_move,
            consecutive_passes: 0,
            is_game_over: rules::is_terminal(&board),
            is_pass: false,
            flipped: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    /// Whether the last turn change skipped a player.
    pub fn is_pass(&self) -> bool {
        self.is_pass
    }

    /// Stones flipped by the last accepted placement.
    pub fn flipped(&self) -> &[Position] {
        &self.flipped
    }

    /// Legal squares for the player to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Position> {
        if self.is_game_over {
            return Vec::new();
        }
        rules::legal_moves(&self.board, self.current_player)
    }

    pub fn has_legal_moves_for_current(&self) -> bool {
        !self.is_game_over && rules::has_legal_move(&self.board, self.current_player)
    }

    /// Plays `pos` for the player to move and returns the flipped squares.
    ///
    /// After the placement the turn goes to the opponent, unless the opponent
    /// has no move, in which case it passes straight back. When neither side
    /// can move the game is over.
    pub fn attempt_move(&mut self, pos: Position) -> Result<Vec<Position>, MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        let mover = self.current_player;
        if !rules::is_legal(&self.board, pos, mover) {
            return Err(MoveError::Illegal(pos));
        }

        let flipped = rules::apply_move(&mut self.board, pos, mover);
        debug!(
            "{mover:?} played ({}, {}), flipped {}",
            pos.x(),
            pos.y(),
            flipped.len()
        );

        self.consecutive_passes = 0;
        self.is_pass = false;
        self.flipped = flipped.clone();
        self.current_player = mover.opponent();
        self.resolve_turn();

        Ok(flipped)
    }

    /// Skips the turn of a player who has no legal move.
    pub fn pass(&mut self) -> Result<(), MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        if rules::has_legal_move(&self.board, self.current_player) {
            return Err(MoveError::MustMove);
        }

        self.flipped.clear();
        self.record_pass();
        if !rules::has_legal_move(&self.board, self.current_player) {
            self.end_game();
        }
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.is_game_over
    }

    /// Current stone counts; the winner is only meaningful once the game is over.
    pub fn result(&self) -> GameResult {
        let (black_count, white_count) = self.board.count();
        GameResult {
            black_count,
            white_count,
            winner: if black_count > white_count {
                Some(Player::Black)
            } else if white_count > black_count {
                Some(Player::White)
            } else {
                None
            },
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (black_count, white_count) = self.board.count();
        GameSnapshot {
            board: self.board.to_array().to_vec(),
            current_player: self.current_player,
            black_count,
            white_count,
            is_game_over: self.is_game_over,
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
            legal_moves: self.legal_moves(),
        }
    }

    /// Settles who moves next after `current_player` was handed the turn.
    fn resolve_turn(&mut self) {
        if self.board.is_full() {
            self.end_game();
            return;
        }
        if rules::has_legal_move(&self.board, self.current_player) {
            return;
        }
        if rules::has_legal_move(&self.board, self.current_player.opponent()) {
            debug!("{:?} has no legal move and passes", self.current_player);
            self.record_pass();
        } else {
            self.end_game();
        }
    }

    fn record_pass(&mut self) {
        self.is_pass = true;
        self.consecutive_passes = self.consecutive_passes.saturating_add(1);
        self.current_player = self.current_player.opponent();
    }

    fn end_game(&mut self) {
        self.is_game_over = true;
        let result = self.result();
        debug!(
            "game over: black {} white {} winner {:?}",
            result.black_count, result.white_count, result.winner
        );
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    const FULL_BOARD: u64 = u64::MAX;

    fn bit(x: u8, y: u8) -> u64 {
        Position::new(x, y).bit()
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameState::new();
        let state = game.snapshot();

        assert_eq!(state.current_player, Player::Black);
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert!(!state.is_game_over);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(state.legal_moves.len(), 4);
    }

    #[test]
    fn illegal_move_is_rejected_and_state_unchanged() {
        let mut game = GameState::new();
        let before = game.clone();

        let err = game.attempt_move(Position::new(0, 0)).unwrap_err();

        assert_eq!(err, MoveError::Illegal(Position::new(0, 0)));
        assert!(err.to_string().contains("illegal move"));
        assert_eq!(game, before);
    }

    #[test]
    fn accepted_move_hands_turn_to_opponent() {
        let mut game = GameState::new();

        let flipped = game.attempt_move(Position::new(2, 3)).unwrap();

        assert_eq!(flipped, vec![Position::new(3, 3)]);
        assert_eq!(game.current_player(), Player::White);
        assert_eq!(game.flipped(), &[Position::new(3, 3)]);
        assert_eq!(game.board().count(), (4, 1));
    }

    #[test]
    fn explicit_pass_switches_turn_without_touching_board() {
        let black = bit(1, 0);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let mut game = GameState::from_position(Board::from_bitboards(black, white), Player::Black);
        let board_before = *game.board();

        assert!(!game.has_legal_moves_for_current());
        game.pass().unwrap();

        assert_eq!(game.current_player(), Player::White);
        assert!(game.is_pass());
        assert_eq!(game.consecutive_passes(), 1);
        assert!(game.flipped().is_empty());
        assert!(!game.is_terminal());
        assert_eq!(*game.board(), board_before);
        assert!(game.has_legal_moves_for_current());
    }

    #[test]
    fn pass_is_refused_while_a_move_exists() {
        let mut game = GameState::new();

        assert_eq!(game.pass(), Err(MoveError::MustMove));
        assert_eq!(game.current_player(), Player::Black);
    }

    #[test]
    fn position_without_moves_for_anyone_starts_finished() {
        let black = FULL_BOARD ^ bit(0, 0);
        let mut game = GameState::from_position(Board::from_bitboards(black, 0), Player::Black);

        assert!(game.is_terminal());
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.pass(), Err(MoveError::GameOver));
        assert_eq!(game.result().winner, Some(Player::Black));
    }

    #[test]
    fn full_board_after_move_sets_game_over() {
        let black = bit(1, 0);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let mut game = GameState::from_position(Board::from_bitboards(black, white), Player::White);

        let flipped = game.attempt_move(Position::new(0, 0)).unwrap();
        let state = game.snapshot();

        assert!(state.is_game_over);
        assert_eq!(state.black_count, 0);
        assert_eq!(state.white_count, 64);
        assert_eq!(flipped, vec![Position::new(1, 0)]);
        assert_eq!(
            game.attempt_move(Position::new(0, 0)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn opponent_without_reply_passes_automatically() {
        // After White takes (0,0) Black has nothing; White still has (7,7).
        let board: Board = "
            .BWWWWWW
            WWWWWWWW
            WWWWWWWW
            WWWWWWWW
            WWWWWWWW
            WWWWWWWW
            WWWWWWWW
            WWWWWWB.
        "
        .parse()
        .unwrap();
        let mut game = GameState::from_position(board, Player::White);

        game.attempt_move(Position::new(0, 0)).unwrap();

        assert_eq!(game.board().get(Position::new(1, 0)), Cell::White);
        assert_eq!(game.current_player(), Player::White);
        assert!(game.is_pass());
        assert_eq!(game.consecutive_passes(), 1);
        assert!(!game.is_terminal());

        game.attempt_move(Position::new(7, 7)).unwrap();

        assert_eq!(game.consecutive_passes(), 0);
        assert!(game.is_terminal());
        assert_eq!(game.result().winner, Some(Player::White));
    }
}
