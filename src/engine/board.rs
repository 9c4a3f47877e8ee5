//! Mailbox board representation.
//!
//! `Board` is a fixed 8×8 grid of optional pieces. Row 0 is black's back
//! rank and row 7 is white's, so `board.rows()[0][0]` is a8.
//!
//! The grid is a plain value: `Clone` produces an independent copy, which is
//! what the legality filter simulates moves on.

use crate::engine::types::{ChessError, Color, Piece, PieceId, PieceKind, Square};

/// Piece placement of the standard starting position.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// An 8×8 grid with at most one piece per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Standard starting position. Ids are handed out in reading order
    /// (a8 = 0 … h8 = 7, a7 = 8 … h1 = 31).
    pub fn starting() -> Self {
        let mut board = Board::empty();
        let mut next_id = 0u8;
        let mut place = |board: &mut Board, row: u8, col: u8, kind: PieceKind, color: Color| {
            board.put(Square::at(row, col), Piece::new(PieceId(next_id), kind, color));
            next_id += 1;
        };

        for (col, &kind) in BACK_RANK.iter().enumerate() {
            place(&mut board, 0, col as u8, kind, Color::Black);
        }
        for col in 0..8 {
            place(&mut board, 1, col, PieceKind::Pawn, Color::Black);
        }
        for col in 0..8 {
            place(&mut board, 6, col, PieceKind::Pawn, Color::White);
        }
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            place(&mut board, 7, col as u8, kind, Color::White);
        }
        board
    }

    // -----------------------------------------------------------------------
    // Cell access
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Place a piece, returning whatever was there before.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.cells[sq.row() as usize][sq.col() as usize].replace(piece)
    }

    /// Remove and return the piece on a square.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.row() as usize][sq.col() as usize].take()
    }

    /// Change the kind of the piece on `sq` in place, keeping its identity.
    /// Returns the updated piece, or `None` if the square is empty.
    pub fn set_kind(&mut self, sq: Square, kind: PieceKind) -> Option<Piece> {
        let cell = &mut self.cells[sq.row() as usize][sq.col() as usize];
        let piece = cell.as_mut()?;
        piece.kind = kind;
        Some(*piece)
    }

    /// Raw grid, row 0 first.
    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.cells
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every occupied square with its piece, in reading order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Occupied squares holding a piece of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces_of(color).count()
    }

    /// Square of `color`'s king. `None` on a board without one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Where the piece with identity `id` currently stands.
    pub fn find(&self, id: PieceId) -> Option<Square> {
        self.pieces().find(|(_, p)| p.id == id).map(|(sq, _)| sq)
    }

    // -----------------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------------

    /// Move the piece on `from` to `to` and return what was captured.
    ///
    /// Handles the two compound moves: a pawn moving diagonally onto an empty
    /// square captures en passant (the victim stands beside `from` on the
    /// destination's file), and a king moving two files castles (the rook
    /// jumps to the square the king crossed). Piece kinds never change here;
    /// promotion is decided later by the session.
    ///
    /// The move is not validated. An empty `from` is a no-op.
    pub fn apply(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.take(from)?;
        let mut captured = self.take(to);

        if piece.kind == PieceKind::Pawn && from.col() != to.col() && captured.is_none() {
            captured = self.take(Square::at(from.row(), to.col()));
        }

        self.put(to, piece);

        if piece.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2 {
            let (rook_from, rook_to) = castling_rook_squares(from, to);
            if let Some(rook) = self.take(rook_from) {
                self.put(rook_to, rook);
            }
        }

        captured
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as text, rank 8 at the top.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for (row, cells) in self.cells.iter().enumerate() {
            s.push((b'8' - row as u8) as char);
            s.push(' ');
            for (col, cell) in cells.iter().enumerate() {
                s.push(cell.map_or('.', Piece::to_char));
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Castling helpers
// ---------------------------------------------------------------------------

/// For a castling king move, return (rook_from, rook_to).
pub(crate) fn castling_rook_squares(king_from: Square, king_to: Square) -> (Square, Square) {
    let row = king_from.row();
    if king_to.col() > king_from.col() {
        (Square::at(row, 7), Square::at(row, 5))
    } else {
        (Square::at(row, 0), Square::at(row, 3))
    }
}

// ---------------------------------------------------------------------------
// FEN piece placement
// ---------------------------------------------------------------------------

impl Board {
    /// Parse the piece-placement field of a FEN string
    /// (e.g. `"4k3/8/8/8/8/8/8/4K3"`). Ids are assigned in reading order.
    ///
    /// Only the placement is read; side to move and the other FEN fields are
    /// not part of a board.
    pub fn from_fen_placement(placement: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        let mut next_id = 0u8;
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::InvalidFen(format!("bad empty count '{c}'")));
                    }
                    col += skip as u8;
                } else {
                    let (color, kind) = PieceKind::from_char(c)
                        .ok_or_else(|| ChessError::InvalidFen(format!("invalid piece '{c}'")))?;
                    if col >= 8 {
                        return Err(ChessError::InvalidFen(format!("rank {} too long", 8 - row)));
                    }
                    board.put(
                        Square::at(row as u8, col),
                        Piece::new(PieceId(next_id), kind, color),
                    );
                    next_id += 1;
                    col += 1;
                }
                if col > 8 {
                    return Err(ChessError::InvalidFen(format!("rank {} too long", 8 - row)));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {col} squares",
                    8 - row
                )));
            }
        }
        Ok(board)
    }

    /// Piece-placement field of a FEN string for this board.
    pub fn to_fen_placement(&self) -> String {
        let mut fen = String::with_capacity(64);
        for (row, cells) in self.cells.iter().enumerate() {
            let mut empty = 0;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
