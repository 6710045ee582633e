use thiserror::Error;

use crate::types::Position;

/// Why a game refused a placement or a pass. The game is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,
    #[error("illegal move at ({}, {})", .0.x(), .0.y())]
    Illegal(Position),
    #[error("cannot pass while a legal move exists")]
    MustMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty: {0:?}")]
pub struct UnknownDifficulty(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),
    #[error("row {row} has {width} cells, expected 8")]
    RowWidth { row: usize, width: usize },
    #[error("unexpected board symbol {0:?}")]
    Symbol(char),
}
