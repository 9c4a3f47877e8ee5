//! Stateful game session wrapping a `Board`.
//!
//! `Game` owns the board, the side to move, the current selection and its
//! legal destinations, captured pieces, move history and game status. It is
//! the only long-lived mutable state in the engine and the type a
//! presentation layer drives with clicks.
//!
//! State machine:
//!
//! ```text
//!   Playing --apply_move (pawn on last rank)--> AwaitingPromotion
//!   AwaitingPromotion --promote--> Playing | Checkmate | Stalemate
//!   Playing --apply_move--> Playing | Checkmate | Stalemate
//!   any --new_game--> Playing
//! ```
//!
//! Every transition returns `Result`. An `Err` means the input was ignored
//! and the session is exactly as it was before the call.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::pgn;
use crate::engine::san;
use crate::engine::snapshot::GameSnapshot;
use crate::engine::status;
use crate::engine::types::{
    ChessError, Color, GameStatus, MoveRecord, PendingPromotion, Piece, PieceKind, Square,
};

// =========================================================================
// SessionEvent
// =========================================================================

/// What an accepted transition did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A piece of the side to move was selected.
    Selected { square: Square, targets: Vec<Square> },
    /// The selected square was clicked again.
    Deselected,
    /// A move was applied and the position reclassified.
    Moved { record: MoveRecord, status: GameStatus },
    /// A pawn reached the last rank; `promote` must be called next.
    PromotionPending(PendingPromotion),
    /// The pending pawn was promoted and the position reclassified.
    Promoted {
        square: Square,
        piece: Piece,
        status: GameStatus,
    },
}

// =========================================================================
// Game
// =========================================================================

/// A single chess game driven by select / move / promote commands.
#[derive(Clone, Debug)]
pub struct Game {
    // Core state
    board: Board,
    turn: Color,
    move_history: Vec<MoveRecord>,
    san_history: Vec<String>,
    /// `captured[color]` holds the pieces `color` has taken.
    captured: [Vec<Piece>; 2],

    // Interaction
    selected: Option<Square>,
    legal_targets: Vec<Square>,
    pending_promotion: Option<PendingPromotion>,

    // Status
    status: GameStatus,

    // Position the game started from, when not the standard one.
    setup: Option<(Board, Color)>,

    // Metadata
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_position(Board::starting(), Color::White, GameStatus::Playing, None)
    }

    /// Create a game from an arbitrary board with `turn` to move. The
    /// position is classified immediately, so it may already be over.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let status = status::classify(&board, turn, &[]);
        let setup = (board != Board::starting() || turn != Color::White)
            .then(|| (board.clone(), turn));
        Self::with_position(board, turn, status, setup)
    }

    fn with_position(
        board: Board,
        turn: Color,
        status: GameStatus,
        setup: Option<(Board, Color)>,
    ) -> Self {
        Self {
            board,
            turn,
            move_history: Vec::new(),
            san_history: Vec::new(),
            captured: [Vec::new(), Vec::new()],
            selected: None,
            legal_targets: Vec::new(),
            pending_promotion: None,
            status,
            setup,
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move. While a promotion is pending this is still the side
    /// that pushed the pawn.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Is the side to move in check? Check is reported here rather than as
    /// a status of its own.
    pub fn in_check(&self) -> bool {
        status::in_check(&self.board, self.turn)
    }

    /// Squares of the pieces checking the side to move.
    pub fn checkers(&self) -> Vec<Square> {
        status::checkers(&self.board, self.turn)
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Legal destinations of the selected piece (empty without a selection).
    pub fn legal_targets(&self) -> &[Square] {
        &self.legal_targets
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending_promotion
    }

    /// Pieces captured by `color`, oldest first.
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Completed moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// SAN of each completed move. A promoting move is listed once its
    /// promotion has been chosen.
    pub fn san_history(&self) -> &[String] {
        &self.san_history
    }

    /// Legal destinations from `from` for the side to move, without
    /// touching the selection. Empty for the opponent's pieces or when the
    /// game is not accepting moves.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Square> {
        if self.status != GameStatus::Playing {
            return Vec::new();
        }
        match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn => {
                movegen::legal_moves(&self.board, from, &self.move_history)
            }
            _ => Vec::new(),
        }
    }

    /// The custom position and side to move this game started from, or
    /// `None` for the standard opening position.
    pub fn setup(&self) -> Option<(&Board, Color)> {
        self.setup.as_ref().map(|(board, turn)| (board, *turn))
    }

    /// Serializable view of the whole session.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_game(self)
    }

    /// Export the game as PGN.
    pub fn to_pgn(&self) -> String {
        pgn::to_pgn(self)
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Click entry point taking raw board coordinates. Off-board clicks are
    /// rejected; everything else behaves like [`Game::select`].
    pub fn select_or_move(&mut self, row: i32, col: i32) -> Result<SessionEvent, ChessError> {
        match Square::try_from_coords(row, col) {
            Ok(square) => self.select(square),
            Err(err) => self.reject(err),
        }
    }

    /// Select a piece, clear the selection, or attempt a move.
    ///
    /// - Clicking the selected square again clears the selection.
    /// - Clicking a piece of the side to move selects it and caches its
    ///   legal destinations.
    /// - With a piece selected, any other click is a move attempt.
    pub fn select(&mut self, square: Square) -> Result<SessionEvent, ChessError> {
        if self.status != GameStatus::Playing {
            return self.reject(ChessError::NotPlaying(self.status));
        }

        if self.selected == Some(square) {
            self.clear_selection();
            trace!(game_id = %self.id, %square, "selection cleared");
            return Ok(SessionEvent::Deselected);
        }

        match self.board.piece_at(square) {
            Some(piece) if piece.color == self.turn => {
                let targets = movegen::legal_moves(&self.board, square, &self.move_history);
                self.selected = Some(square);
                self.legal_targets = targets.clone();
                trace!(game_id = %self.id, %square, targets = targets.len(), "piece selected");
                Ok(SessionEvent::Selected { square, targets })
            }
            _ if self.selected.is_some() => self.apply_move(square),
            _ => self.reject(ChessError::NotOwnPiece {
                square,
                color: self.turn,
            }),
        }
    }

    /// Move the selected piece to `to`, which must be one of its cached
    /// legal destinations.
    pub fn apply_move(&mut self, to: Square) -> Result<SessionEvent, ChessError> {
        if self.status != GameStatus::Playing {
            return self.reject(ChessError::NotPlaying(self.status));
        }
        let Some(from) = self.selected else {
            return self.reject(ChessError::NoSelection);
        };
        if !self.legal_targets.contains(&to) {
            return self.reject(ChessError::IllegalMove { from, to });
        }
        let Some(piece) = self.board.piece_at(from) else {
            return self.reject(ChessError::NoSelection);
        };

        // SAN needs the position before the move.
        let san = san::move_to_san(&self.board, from, to, &self.move_history);

        let captured = self.board.apply(from, to);
        if let Some(taken) = captured {
            self.captured[self.turn.index()].push(taken);
        }
        let record = MoveRecord {
            piece,
            from,
            to,
            captured,
        };
        self.move_history.push(record);
        self.clear_selection();

        if piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row() {
            let pending = PendingPromotion {
                square: to,
                piece_id: piece.id,
            };
            self.pending_promotion = Some(pending);
            self.status = GameStatus::AwaitingPromotion;
            debug!(game_id = %self.id, mv = %record, "awaiting promotion");
            return Ok(SessionEvent::PromotionPending(pending));
        }

        self.turn = !self.turn;
        self.status = status::classify(&self.board, self.turn, &self.move_history);
        let suffix = san::check_suffix(self.status, self.in_check());
        self.san_history.push(format!("{san}{suffix}"));

        debug!(
            game_id = %self.id,
            mv = %record,
            status = %self.status,
            "move applied"
        );
        Ok(SessionEvent::Moved {
            record,
            status: self.status,
        })
    }

    /// Turn the pending pawn into `kind` (queen, rook, bishop or knight),
    /// keeping its identity, then pass the turn and reclassify.
    pub fn promote(&mut self, kind: PieceKind) -> Result<SessionEvent, ChessError> {
        let Some(pending) = self.pending_promotion else {
            return self.reject(ChessError::NoPendingPromotion);
        };
        if !kind.is_promotion_target() {
            return self.reject(ChessError::InvalidPromotion(kind));
        }
        if self
            .board
            .piece_at(pending.square)
            .is_none_or(|p| p.id != pending.piece_id)
        {
            return self.reject(ChessError::NoPendingPromotion);
        }
        let Some(piece) = self.board.set_kind(pending.square, kind) else {
            return self.reject(ChessError::NoPendingPromotion);
        };

        self.pending_promotion = None;
        self.turn = !self.turn;
        self.status = status::classify(&self.board, self.turn, &self.move_history);

        if let Some(last) = self.move_history.last() {
            let san = san::with_promotion(&san::pawn_san(last.from, last.to), kind);
            let suffix = san::check_suffix(self.status, self.in_check());
            self.san_history.push(format!("{san}{suffix}"));
        }

        debug!(
            game_id = %self.id,
            square = %pending.square,
            %kind,
            status = %self.status,
            "pawn promoted"
        );
        Ok(SessionEvent::Promoted {
            square: pending.square,
            piece,
            status: self.status,
        })
    }

    /// Reset to the starting position with white to move. Allowed in any
    /// state. The session id and creation time are kept.
    pub fn new_game(&mut self) {
        self.board = Board::starting();
        self.turn = Color::White;
        self.move_history.clear();
        self.san_history.clear();
        self.captured = [Vec::new(), Vec::new()];
        self.clear_selection();
        self.pending_promotion = None;
        self.status = GameStatus::Playing;
        self.setup = None;
        debug!(game_id = %self.id, "new game");
    }

    // -----------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_targets.clear();
    }

    fn reject<T>(&self, err: ChessError) -> Result<T, ChessError> {
        trace!(game_id = %self.id, error = %err, "input ignored");
        Err(err)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
