//! Serializable view of a game session.
//!
//! Everything a presentation layer needs to draw the board and its
//! highlights, in one JSON-friendly value.

use serde::Serialize;
use uuid::Uuid;

use crate::engine::game::Game;
use crate::engine::types::{Color, GameStatus, PendingPromotion, Piece, Square};

/// Read-only copy of a session's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: Uuid,
    /// Row 0 is rank 8.
    pub board: Vec<Vec<Option<Piece>>>,
    pub placement: String,
    pub turn: Color,
    pub status: GameStatus,
    pub in_check: bool,
    /// Pieces giving check, empty when not in check.
    pub checkers: Vec<Square>,
    pub selected: Option<Square>,
    pub legal_targets: Vec<Square>,
    pub pending_promotion: Option<PendingPromotion>,
    pub captured: CapturedPieces,
    /// Long algebraic, oldest first.
    pub moves: Vec<String>,
    pub san: Vec<String>,
}

/// Pieces taken by each side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CapturedPieces {
    pub white: Vec<Piece>,
    pub black: Vec<Piece>,
}

impl GameSnapshot {
    pub fn from_game(game: &Game) -> Self {
        Self {
            game_id: game.id,
            board: game.board().rows().iter().map(|row| row.to_vec()).collect(),
            placement: game.board().to_fen_placement(),
            turn: game.turn(),
            status: game.status(),
            in_check: game.in_check(),
            checkers: game.checkers(),
            selected: game.selected(),
            legal_targets: game.legal_targets().to_vec(),
            pending_promotion: game.pending_promotion(),
            captured: CapturedPieces {
                white: game.captured_by(Color::White).to_vec(),
                black: game.captured_by(Color::Black).to_vec(),
            },
            moves: game.history().iter().map(ToString::to_string).collect(),
            san: game.san_history().to_vec(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
