use std::fmt;
use std::str::FromStr;

use crate::error::ParseBoardError;
use crate::types::{BOARD_CELLS, BOARD_WIDTH, Cell, Player, Position};

/// Othello board state represented by two bitboards.
///
/// Bit `i` corresponds to square `y * 8 + x`. The two masks never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// white at (3,3) and (4,4), black at (3,4) and (4,3).
    pub fn new() -> Self {
        Self {
            black: Position::new(3, 4).bit() | Position::new(4, 3).bit(),
            white: Position::new(3, 3).bit() | Position::new(4, 4).bit(),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw masks. Panics when a square is claimed by both colours.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        assert_eq!(black & white, 0, "a square cannot hold two stones");
        Self { black, white }
    }

    pub fn get(&self, pos: Position) -> Cell {
        let square = pos.bit();
        if self.black & square != 0 {
            Cell::Black
        } else if self.white & square != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let square = pos.bit();
        self.black &= !square;
        self.white &= !square;
        match cell {
            Cell::Black => self.black |= square,
            Cell::White => self.white |= square,
            Cell::Empty => {}
        }
    }

    /// Stones owned by `player` as a bitmask.
    pub fn stones(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub fn occupied(&self) -> u64 {
        self.black | self.white
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn count_of(&self, player: Player) -> u8 {
        self.stones(player).count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        BOARD_CELLS as u8 - self.occupied().count_ones() as u8
    }

    pub fn is_full(&self) -> bool {
        self.occupied() == u64::MAX
    }

    /// Stones of `player` minus stones of the opponent.
    pub fn stone_differential(&self, player: Player) -> i32 {
        self.count_of(player) as i32 - self.count_of(player.opponent()) as i32
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; BOARD_CELLS] {
        let mut board = [0u8; BOARD_CELLS];
        for (index, cell) in board.iter_mut().enumerate() {
            *cell = self.get(Position::from_index(index)).code();
        }
        board
    }

    /// Writes a placement and its flips. `flips` must only cover opponent stones.
    pub(crate) fn commit(&mut self, pos: Position, player: Player, flips: u64) {
        let placed = pos.bit() | flips;
        match player {
            Player::Black => {
                self.black |= placed;
                self.white &= !flips;
            }
            Player::White => {
                self.white |= placed;
                self.black &= !flips;
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Eight rows of `B`, `W` or `.`, top row first. Whitespace inside a row is ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_WIDTH {
            return Err(ParseBoardError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_WIDTH {
                return Err(ParseBoardError::RowWidth {
                    row: y,
                    width: cells.len(),
                });
            }
            for (x, ch) in cells.into_iter().enumerate() {
                let cell = match ch {
                    'B' | 'b' | 'X' | 'x' => Cell::Black,
                    'W' | 'w' | 'O' | 'o' => Cell::White,
                    '.' | '-' => Cell::Empty,
                    other => return Err(ParseBoardError::Symbol(other)),
                };
                board.set(Position::new(x as u8, y as u8), cell);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2 3 4 5 6 7")?;
        for y in 0..BOARD_WIDTH as u8 {
            write!(f, "{y}")?;
            for x in 0..BOARD_WIDTH as u8 {
                let symbol = match self.get(Position::new(x, y)) {
                    Cell::Black => 'B',
                    Cell::White => 'W',
                    Cell::Empty => '.',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_board_has_four_center_stones() {
        let board = Board::new();

        assert_eq!(board.count(), (2, 2));
        assert_eq!(board.empty_count(), 60);
        assert_eq!(board.get(Position::new(3, 3)), Cell::White);
        assert_eq!(board.get(Position::new(4, 4)), Cell::White);
        assert_eq!(board.get(Position::new(3, 4)), Cell::Black);
        assert_eq!(board.get(Position::new(4, 3)), Cell::Black);
    }

    #[test]
    fn set_overwrites_previous_colour() {
        let mut board = Board::new();
        let pos = Position::new(3, 3);

        board.set(pos, Cell::Black);
        assert_eq!(board.get(pos), Cell::Black);
        assert_eq!(board.count(), (3, 1));

        board.set(pos, Cell::Empty);
        assert_eq!(board.get(pos), Cell::Empty);
        assert_eq!(board.empty_count(), 61);
    }

    #[test]
    fn parse_and_display_agree() {
        let board: Board = "
            ........
            ........
            ........
            ...WB...
            ...BW...
            ........
            ........
            ........
        "
        .parse()
        .unwrap();

        assert_eq!(board, Board::new());
        assert!(board.to_string().contains("3 . . . W B . . ."));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            "........".parse::<Board>(),
            Err(ParseBoardError::RowCount(1))
        );
        let bad_symbol = "........\n".repeat(7) + ".......Z";
        assert_eq!(
            bad_symbol.parse::<Board>(),
            Err(ParseBoardError::Symbol('Z'))
        );
    }

    #[test]
    #[should_panic(expected = "two stones")]
    fn overlapping_bitboards_are_rejected() {
        let _ = Board::from_bitboards(1, 1);
    }

    #[test]
    fn to_array_uses_cell_codes() {
        let cells = Board::new().to_array();

        assert_eq!(cells[Position::new(3, 3).index()], 2);
        assert_eq!(cells[Position::new(4, 3).index()], 1);
        assert_eq!(cells[0], 0);
    }
}
