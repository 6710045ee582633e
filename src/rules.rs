//! Legality and flip computation.
//!
//! Every function takes the board by reference and the player explicitly, so
//! the same code serves the live game and the search tree.

use crate::board::Board;
use crate::types::{BOARD_CELLS, Cell, Player, Position};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Mask of the opponent stones `player` would flip by playing `pos`.
///
/// Zero when the square is occupied or no direction brackets a run.
pub fn flips(board: &Board, pos: Position, player: Player) -> u64 {
    if board.get(pos) != Cell::Empty {
        return 0;
    }

    let me = board.stones(player);
    let opp = board.stones(player.opponent());
    let mut flips = 0u64;

    for (dx, dy) in DIRECTIONS {
        let mut x = pos.x() as i32 + dx;
        let mut y = pos.y() as i32 + dy;
        let mut line = 0u64;

        while let Some(next) = Position::checked(x, y) {
            let square = next.bit();
            if opp & square != 0 {
                line |= square;
            } else {
                // A run of length zero never brackets anything.
                if me & square != 0 {
                    flips |= line;
                }
                break;
            }
            x += dx;
            y += dy;
        }
    }

    flips
}

pub fn is_legal(board: &Board, pos: Position, player: Player) -> bool {
    flips(board, pos, player) != 0
}

/// Legal squares for `player` as a bitmask.
pub fn legal_mask(board: &Board, player: Player) -> u64 {
    let empty = !board.occupied();
    let mut legal = 0u64;
    for index in 0..BOARD_CELLS {
        if empty & (1u64 << index) == 0 {
            continue;
        }
        let pos = Position::from_index(index);
        if is_legal(board, pos, player) {
            legal |= pos.bit();
        }
    }
    legal
}

/// Legal squares for `player` in row-major order.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Position> {
    mask_to_positions(legal_mask(board, player))
}

pub fn has_legal_move(board: &Board, player: Player) -> bool {
    legal_mask(board, player) != 0
}

/// Places a stone for `player` at `pos` and flips every bracketed run.
///
/// Returns the flipped squares in row-major order. The move must be legal:
/// an illegal move leaves the board unchanged and returns nothing (and trips a
/// debug assertion).
pub fn apply_move(board: &mut Board, pos: Position, player: Player) -> Vec<Position> {
    let mask = flips(board, pos, player);
    debug_assert!(mask != 0, "apply_move called with illegal move {pos:?}");
    if mask == 0 {
        return Vec::new();
    }
    board.commit(pos, player, mask);
    mask_to_positions(mask)
}

/// Both players are out of moves. A full board always satisfies this.
pub fn is_terminal(board: &Board) -> bool {
    board.is_full()
        || (!has_legal_move(board, Player::Black) && !has_legal_move(board, Player::White))
}

pub fn mask_to_positions(mut mask: u64) -> Vec<Position> {
    let mut out = Vec::with_capacity(mask.count_ones() as usize);
    while mask != 0 {
        out.push(Position::from_index(mask.trailing_zeros() as usize));
        mask &= mask - 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn initial_black_legal_moves_are_four_expected_squares() {
        let board = Board::new();

        assert_eq!(
            legal_moves(&board, Player::Black),
            vec![pos(3, 2), pos(2, 3), pos(5, 4), pos(4, 5)]
        );
        assert_eq!(
            legal_moves(&board, Player::White),
            vec![pos(4, 2), pos(5, 3), pos(2, 4), pos(3, 5)]
        );
    }

    #[test]
    fn apply_move_flips_opponent_stones_and_updates_counts() {
        let mut board = Board::new();

        let flipped = apply_move(&mut board, pos(2, 3), Player::Black);

        assert_eq!(flipped, vec![pos(3, 3)]);
        assert_eq!(board.count(), (4, 1));
        assert_eq!(board.empty_count(), 59);
        assert_eq!(board.get(pos(2, 3)), Cell::Black);
        assert_eq!(board.get(pos(3, 3)), Cell::Black);
        assert_eq!(board.get(pos(4, 4)), Cell::White);
    }

    #[test]
    fn adjacent_own_stone_without_run_is_not_legal() {
        let board: Board = "
            ........
            ........
            ........
            ...BW...
            ........
            ........
            ........
            ........
        "
        .parse()
        .unwrap();

        // (2,3) touches a black stone directly; nothing is bracketed.
        assert!(!is_legal(&board, pos(2, 3), Player::Black));
        assert!(is_legal(&board, pos(2, 3), Player::White));
        assert!(is_legal(&board, pos(5, 3), Player::Black));
    }

    #[test]
    fn occupied_square_is_never_legal() {
        let board = Board::new();

        assert!(!is_legal(&board, pos(3, 3), Player::Black));
        assert_eq!(flips(&board, pos(4, 3), Player::White), 0);
    }

    #[test]
    fn run_reaching_the_edge_flips_nothing() {
        let board: Board = "
            .WWW....
            ........
            ........
            ........
            ........
            ........
            ........
            ........
        "
        .parse()
        .unwrap();

        assert!(!is_legal(&board, pos(4, 0), Player::Black));
        assert!(!is_legal(&board, pos(0, 0), Player::Black));
    }

    #[test]
    fn directions_flip_independently() {
        let mut board: Board = "
            B..B..B.
            .W.W.W..
            ..WWW...
            BWW.WWWB
            ..WWW...
            .W.W.W..
            B..B..B.
            ........
        "
        .parse()
        .unwrap();

        let flipped = apply_move(&mut board, pos(3, 3), Player::Black);

        assert_eq!(flipped.len(), 17);
        assert_eq!(board.count_of(Player::White), 0);
        assert_eq!(board.count_of(Player::Black), 26);
    }

    #[test]
    fn only_bracketed_direction_flips() {
        let mut board: Board = "
            ........
            ........
            ........
            .WWB....
            .W......
            ..W.....
            ........
            ........
        "
        .parse()
        .unwrap();

        // East is closed by (3,3); the south-east run ends on an empty square.
        let flipped = apply_move(&mut board, pos(0, 3), Player::Black);

        assert_eq!(flipped, vec![pos(1, 3), pos(2, 3)]);
        assert_eq!(board.get(pos(1, 4)), Cell::White);
        assert_eq!(board.get(pos(2, 5)), Cell::White);
    }

    #[test]
    fn terminal_when_neither_side_can_move() {
        assert!(!is_terminal(&Board::new()));
        assert!(is_terminal(&Board::empty()));
        assert!(is_terminal(&Board::from_bitboards(u64::MAX, 0)));
    }
}
