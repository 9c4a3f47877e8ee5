//! Position classification: check, checkmate and stalemate.
//!
//! Mate and stalemate both scan every piece of the side in question through
//! the legality filter. That is the dominant cost per ply and fine for
//! interactive play, not for search.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{Color, GameStatus, MoveRecord, Square};

/// Is `color`'s king attacked? A board with no such king is never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| attacks::is_square_attacked(board, king, !color))
}

/// Squares of the enemy pieces giving check to `color`'s king, for
/// highlighting. Empty when not in check or without a king.
pub fn checkers(board: &Board, color: Color) -> Vec<Square> {
    board
        .king_square(color)
        .map(|king| attacks::attackers_of(board, king, !color))
        .unwrap_or_default()
}

/// In check with no legal move anywhere.
pub fn is_checkmate(board: &Board, color: Color, history: &[MoveRecord]) -> bool {
    in_check(board, color) && !movegen::has_legal_move(board, color, history)
}

/// Not in check, yet no legal move anywhere.
pub fn is_stalemate(board: &Board, color: Color, history: &[MoveRecord]) -> bool {
    !in_check(board, color) && !movegen::has_legal_move(board, color, history)
}

/// Status of the position with `color` to move: checkmate, else stalemate,
/// else playing.
pub fn classify(board: &Board, color: Color, history: &[MoveRecord]) -> GameStatus {
    if movegen::has_legal_move(board, color, history) {
        GameStatus::Playing
    } else if in_check(board, color) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}

// =========================================================================
// Tests
// =========================================================================
