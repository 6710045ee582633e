use serde::Serialize;

pub const BOARD_WIDTH: usize = 8;
pub const BOARD_CELLS: usize = BOARD_WIDTH * BOARD_WIDTH;

/// A board coordinate. `x` is the column, `y` the row.
/// Always on the board; only the constructors below build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Panics when either coordinate is outside `0..8`.
    pub fn new(x: u8, y: u8) -> Self {
        assert!(
            (x as usize) < BOARD_WIDTH && (y as usize) < BOARD_WIDTH,
            "position ({x}, {y}) is off the board"
        );
        Self { x, y }
    }

    /// Returns `None` instead of panicking for off-board coordinates.
    pub fn checked(x: i32, y: i32) -> Option<Self> {
        let range = 0..BOARD_WIDTH as i32;
        if range.contains(&x) && range.contains(&y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Self {
        assert!(index < BOARD_CELLS, "square index {index} is off the board");
        Self {
            x: (index % BOARD_WIDTH) as u8,
            y: (index / BOARD_WIDTH) as u8,
        }
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    /// Row-major square index, `y * 8 + x`.
    pub fn index(self) -> usize {
        assert!(
            (self.x as usize) < BOARD_WIDTH && (self.y as usize) < BOARD_WIDTH,
            "position ({}, {}) is off the board",
            self.x,
            self.y
        );
        self.y as usize * BOARD_WIDTH + self.x as usize
    }

    pub(crate) fn bit(self) -> u64 {
        1u64 << self.index()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Wire encoding used by [`GameSnapshot::board`]: 0=empty, 1=black, 2=white.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

/// Serializable view of a live game handed to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Vec<u8>,
    pub current_player: Player,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    /// `true` when the previous turn change skipped a player.
    pub is_pass: bool,
    /// Stones flipped by the last placement; empty after a pass.
    pub flipped: Vec<Position>,
    pub legal_moves: Vec<Position>,
}

/// Stone counts at the end of (or during) a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub black_count: u8,
    pub white_count: u8,
    /// `None` on a draw.
    pub winner: Option<Player>,
}

/// Answer to a placement attempt at the WASM boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub accepted: bool,
    pub flipped: Vec<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_an_involution() {
        for player in [Player::Black, Player::White] {
            assert_ne!(player.opponent(), player);
            assert_eq!(player.opponent().opponent(), player);
        }
    }

    #[test]
    fn index_is_row_major() {
        assert_eq!(Position::new(0, 0).index(), 0);
        assert_eq!(Position::new(7, 0).index(), 7);
        assert_eq!(Position::new(0, 1).index(), 8);
        assert_eq!(Position::new(2, 3).index(), 26);
        assert_eq!(Position::from_index(26), Position::new(2, 3));
    }

    #[test]
    fn checked_rejects_off_board_coordinates() {
        assert_eq!(Position::checked(-1, 0), None);
        assert_eq!(Position::checked(0, 8), None);
        assert_eq!(Position::checked(7, 7), Some(Position::new(7, 7)));
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn new_panics_on_out_of_range() {
        let _ = Position::new(8, 0);
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn literal_off_board_position_panics_instead_of_wrapping() {
        let _ = Position { x: 0, y: 8 }.bit();
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn literal_wide_position_panics_on_index() {
        let _ = Position { x: 10, y: 2 }.index();
    }

    #[test]
    fn accessors_return_coordinates() {
        let pos = Position::new(5, 2);
        assert_eq!((pos.x(), pos.y()), (5, 2));
    }
}
