//! Move notation: Standard Algebraic Notation output and long-algebraic input.
//!
//! SAN examples: `e4`, `Nf3`, `Bxe5`, `O-O`, `exd6`, `e8=Q+`, `Raxd1#`.

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus, MoveRecord, PieceKind, Square};

// =========================================================================
// SAN generation
// =========================================================================

/// Convert a legal move to SAN, given the board *before* the move.
///
/// Does not append `+`/`#` (see [`check_suffix`]) nor the promotion piece,
/// which is only known once the session's promotion choice is made.
pub fn move_to_san(board: &Board, from: Square, to: Square, history: &[MoveRecord]) -> String {
    let Some(piece) = board.piece_at(from) else {
        return format!("{from}{to}");
    };

    match piece.kind {
        PieceKind::King if from.col().abs_diff(to.col()) == 2 => {
            if to.col() > from.col() {
                "O-O".into()
            } else {
                "O-O-O".into()
            }
        }
        PieceKind::Pawn => pawn_san(from, to),
        kind => {
            let mut san = String::with_capacity(8);
            san.push(piece_letter(kind));
            san.push_str(&disambiguation(board, from, to, history));
            if board.piece_at(to).is_some() {
                san.push('x');
            }
            san.push_str(&to.to_algebraic());
            san
        }
    }
}

/// SAN for a pawn move: `e4`, or `exd5` for any diagonal (including en passant).
pub fn pawn_san(from: Square, to: Square) -> String {
    if from.col() != to.col() {
        format!("{}x{to}", from.file_char())
    } else {
        to.to_algebraic()
    }
}

/// Append the promotion piece: `e8` + queen -> `e8=Q`.
pub fn with_promotion(san: &str, kind: PieceKind) -> String {
    format!("{san}={}", piece_letter(kind))
}

/// `#` after mate, `+` after a check that is not mate, nothing otherwise.
pub fn check_suffix(status: GameStatus, in_check: bool) -> &'static str {
    match status {
        GameStatus::Checkmate => "#",
        _ if in_check => "+",
        _ => "",
    }
}

/// Determine the disambiguation string needed for a piece move.
///
/// If other pieces of the same kind and colour can also legally reach `to`,
/// add the file, the rank, or both.
fn disambiguation(board: &Board, from: Square, to: Square, history: &[MoveRecord]) -> String {
    let Some(piece) = board.piece_at(from) else {
        return String::new();
    };

    let rivals: Vec<Square> = board
        .pieces_of(piece.color)
        .filter(|&(sq, p)| sq != from && p.kind == piece.kind)
        .filter(|&(sq, _)| movegen::legal_moves(board, sq, history).contains(&to))
        .map(|(sq, _)| sq)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let same_file = rivals.iter().any(|sq| sq.col() == from.col());
    let same_rank = rivals.iter().any(|sq| sq.row() == from.row());

    match (same_file, same_rank) {
        (false, _) => from.file_char().to_string(),
        (true, false) => from.rank_char().to_string(),
        (true, true) => from.to_algebraic(),
    }
}

fn piece_letter(kind: PieceKind) -> char {
    kind.to_char(Color::White)
}

// =========================================================================
// Long algebraic input
// =========================================================================

/// Parse `e2e4`, `e7e8q` or `e7e8=Q` into (from, to, promotion).
pub fn parse_long_algebraic(token: &str) -> Result<(Square, Square, Option<PieceKind>), ChessError> {
    let invalid = || ChessError::InvalidNotation(token.to_string());
    let token = token.trim();
    if !token.is_ascii() || token.len() < 4 {
        return Err(invalid());
    }

    let from = Square::from_algebraic(&token[0..2]).ok_or_else(invalid)?;
    let to = Square::from_algebraic(&token[2..4]).ok_or_else(invalid)?;

    let promotion = match token[4..].trim_start_matches('=') {
        "" => None,
        rest => {
            let mut chars = rest.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(invalid());
            };
            let (_, kind) = PieceKind::from_char(c).ok_or_else(invalid)?;
            if !kind.is_promotion_target() {
                return Err(ChessError::InvalidPromotion(kind));
            }
            Some(kind)
        }
    };

    Ok((from, to, promotion))
}

// =========================================================================
// Tests
// =========================================================================
