//! PGN (Portable Game Notation) export.
//!
//! Produces the Seven Tag Roster and numbered move text from a session's SAN
//! log. Games started from a custom board also carry `SetUp`/`FEN` tags.

use crate::engine::board::Board;
use crate::engine::game::Game;
use crate::engine::types::{Color, GameStatus, PieceKind, Square};

const LINE_WIDTH: usize = 80;

// =========================================================================
// PGN generation
// =========================================================================

/// Export a game as a PGN string.
pub fn to_pgn(game: &Game) -> String {
    let mut pgn = String::with_capacity(512);
    let result = result_token(game);

    // Seven Tag Roster.
    let date = game.created_at.format("%Y.%m.%d");
    pgn.push_str("[Event \"Casual Game\"]\n");
    pgn.push_str("[Site \"chess-rules\"]\n");
    pgn.push_str(&format!("[Date \"{date}\"]\n"));
    pgn.push_str("[Round \"-\"]\n");
    pgn.push_str("[White \"?\"]\n");
    pgn.push_str("[Black \"?\"]\n");
    pgn.push_str(&format!("[Result \"{result}\"]\n"));

    let first_mover = match game.setup() {
        Some((board, turn)) => {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(&format!("[FEN \"{}\"]\n", setup_fen(board, turn)));
            turn
        }
        None => Color::White,
    };
    pgn.push('\n');

    let mut tokens = Vec::with_capacity(game.san_history().len() * 3 / 2 + 1);
    let mut move_num = 1;
    let mut mover = first_mover;
    for (i, san) in game.san_history().iter().enumerate() {
        match mover {
            Color::White => tokens.push(format!("{move_num}. {san}")),
            Color::Black if i == 0 => tokens.push(format!("{move_num}... {san}")),
            Color::Black => tokens.push(san.clone()),
        }
        if mover == Color::Black {
            move_num += 1;
        }
        mover = !mover;
    }
    tokens.push(result.to_string());

    pgn.push_str(&wrap(&tokens));
    pgn.push('\n');
    pgn
}

/// `1-0`, `0-1`, `1/2-1/2`, or `*` while the game is still open. On mate the
/// side to move is the side that lost.
pub fn result_token(game: &Game) -> &'static str {
    match game.status() {
        GameStatus::Checkmate => match game.turn() {
            Color::White => "0-1",
            Color::Black => "1-0",
        },
        GameStatus::Stalemate => "1/2-1/2",
        GameStatus::Playing | GameStatus::AwaitingPromotion => "*",
    }
}

/// Join tokens with spaces, breaking lines before they pass 80 columns.
fn wrap(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

/// Full FEN for a setup position. With no history behind it, castling is
/// available wherever king and rook still stand on their home squares.
fn setup_fen(board: &Board, turn: Color) -> String {
    let side = match turn {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let mut castling = String::new();
    for color in [Color::White, Color::Black] {
        for (rook_col, letter) in [(7, 'K'), (0, 'Q')] {
            if has_piece(board, Square::at(color.back_row(), 4), PieceKind::King, color)
                && has_piece(board, Square::at(color.back_row(), rook_col), PieceKind::Rook, color)
            {
                castling.push(match color {
                    Color::White => letter,
                    Color::Black => letter.to_ascii_lowercase(),
                });
            }
        }
    }
    if castling.is_empty() {
        castling.push('-');
    }
    format!("{} {side} {castling} - 0 1", board.to_fen_placement())
}

fn has_piece(board: &Board, sq: Square, kind: PieceKind, color: Color) -> bool {
    board
        .piece_at(sq)
        .is_some_and(|p| p.kind == kind && p.color == color)
}

// =========================================================================
// Tests
// =========================================================================
