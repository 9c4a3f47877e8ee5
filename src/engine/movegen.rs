//! Move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal destinations for one piece (geometry, occupancy,
//!      en passant, castling), ignoring whether the mover's king is left in check.
//!   2. Filter: apply each candidate to a scratch copy of the board and drop
//!      those after which the mover's king is attacked.
//!
//! En-passant and castling eligibility are recomputed from the move history
//! on every call rather than tracked incrementally.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::status;
use crate::engine::types::{Color, MoveRecord, Piece, PieceKind, Square};

const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Whether king moves include castling destinations.
///
/// Attack queries use `Skip`: castling eligibility itself asks whether
/// squares are attacked, so generating it there would recurse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Castling {
    Generate,
    Skip,
}

// =========================================================================
// Public API
// =========================================================================

/// Pseudo-legal destinations for the piece on `from`.
///
/// An empty `from` has no moves. No destination appears twice.
pub fn pseudo_legal_moves(
    board: &Board,
    from: Square,
    history: &[MoveRecord],
    castling: Castling,
) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    let color = piece.color;
    let mut moves = Vec::with_capacity(28);

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, color, history, &mut moves),
        PieceKind::Knight => generate_leaper_moves(board, from, color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => generate_slider_moves(board, from, color, &DIAGONALS, &mut moves),
        PieceKind::Rook => generate_slider_moves(board, from, color, &ORTHOGONALS, &mut moves),
        PieceKind::Queen => {
            generate_slider_moves(board, from, color, &ORTHOGONALS, &mut moves);
            generate_slider_moves(board, from, color, &DIAGONALS, &mut moves);
        }
        PieceKind::King => {
            generate_leaper_moves(board, from, color, &KING_OFFSETS, &mut moves);
            if castling == Castling::Generate {
                generate_castling_moves(board, from, color, history, &mut moves);
            }
        }
    }

    moves
}

/// Legal destinations for the piece on `from`: pseudo-legal moves that do
/// not leave its own king attacked. The input board is never modified.
pub fn legal_moves(board: &Board, from: Square, history: &[MoveRecord]) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    pseudo_legal_moves(board, from, history, Castling::Generate)
        .into_iter()
        .filter(|&to| !leaves_king_attacked(board, from, to, piece.color))
        .collect()
}

/// Every legal (from, to) pair for `color`.
pub fn legal_moves_for(board: &Board, color: Color, history: &[MoveRecord]) -> Vec<(Square, Square)> {
    board
        .pieces_of(color)
        .flat_map(|(from, _)| {
            legal_moves(board, from, history)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

/// Does `color` have at least one legal move? Stops at the first one found.
pub fn has_legal_move(board: &Board, color: Color, history: &[MoveRecord]) -> bool {
    board
        .pieces_of(color)
        .any(|(from, _)| !legal_moves(board, from, history).is_empty())
}

/// Simulate `from -> to` on a scratch board and test the mover's king.
fn leaves_king_attacked(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let mut scratch = board.clone();
    scratch.apply(from, to);
    status::in_check(&scratch, color)
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(
    board: &Board,
    from: Square,
    color: Color,
    history: &[MoveRecord],
    moves: &mut Vec<Square>,
) {
    let step = color.pawn_step();

    // --- Pushes ---
    if let Some(one) = from.offset(step, 0)
        && board.is_empty(one)
    {
        moves.push(one);
        if from.row() == color.pawn_start_row()
            && let Some(two) = from.offset(step * 2, 0)
            && board.is_empty(two)
        {
            moves.push(two);
        }
    }

    // --- Captures ---
    for dc in [-1, 1] {
        if let Some(to) = from.offset(step, dc)
            && board.piece_at(to).is_some_and(|p| p.color != color)
        {
            moves.push(to);
        }
    }

    // --- En passant ---
    if let Some(to) = en_passant_target(from, color, history) {
        moves.push(to);
    }
}

/// The en-passant destination for a pawn of `color` on `from`, if the last
/// move was an enemy pawn's double step landing right beside it.
fn en_passant_target(from: Square, color: Color, history: &[MoveRecord]) -> Option<Square> {
    let last = history.last()?;
    if !last.is_double_step() || last.piece.color == color {
        return None;
    }
    if last.to.row() != from.row() || last.to.col().abs_diff(from.col()) != 1 {
        return None;
    }
    from.offset(color.pawn_step(), last.to.col() as i8 - from.col() as i8)
}

// =========================================================================
// Knight and king steps
// =========================================================================

fn generate_leaper_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc)
            && board.piece_at(to).is_none_or(|p| p.color != color)
        {
            moves.push(to);
        }
    }
}

// =========================================================================
// Slider moves (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(to) = current.offset(dr, dc) {
            match board.piece_at(to) {
                None => {
                    moves.push(to);
                    current = to;
                }
                Some(blocker) => {
                    if blocker.color != color {
                        moves.push(to);
                    }
                    break;
                }
            }
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

/// Files involved in castling to one side.
struct CastlePath {
    rook_col: u8,
    king_to_col: u8,
    /// Must hold no piece.
    empty_cols: &'static [u8],
    /// Must not be attacked (the king's own square is checked separately).
    safe_cols: &'static [u8],
}

const KINGSIDE: CastlePath = CastlePath {
    rook_col: 7,
    king_to_col: 6,
    empty_cols: &[5, 6],
    safe_cols: &[5, 6],
};

const QUEENSIDE: CastlePath = CastlePath {
    rook_col: 0,
    king_to_col: 2,
    empty_cols: &[1, 2, 3],
    safe_cols: &[3, 2],
};

const KING_HOME_COL: u8 = 4;

fn generate_castling_moves(
    board: &Board,
    from: Square,
    color: Color,
    history: &[MoveRecord],
    moves: &mut Vec<Square>,
) {
    let row = color.back_row();
    if from != Square::at(row, KING_HOME_COL) || king_has_moved(color, history) {
        return;
    }
    let them = !color;
    if attacks::is_square_attacked(board, from, them) {
        return;
    }

    for path in [&KINGSIDE, &QUEENSIDE] {
        let corner = Square::at(row, path.rook_col);
        let rook_ready = board.piece_at(corner).is_some_and(|p| {
            p.kind == PieceKind::Rook && p.color == color && !piece_has_moved(p, history)
        });
        if !rook_ready {
            continue;
        }
        if !path.empty_cols.iter().all(|&col| board.is_empty(Square::at(row, col))) {
            continue;
        }
        if path
            .safe_cols
            .iter()
            .any(|&col| attacks::is_square_attacked(board, Square::at(row, col), them))
        {
            continue;
        }
        moves.push(Square::at(row, path.king_to_col));
    }
}

/// Has `color`'s king ever moved?
fn king_has_moved(color: Color, history: &[MoveRecord]) -> bool {
    history
        .iter()
        .any(|m| m.piece.kind == PieceKind::King && m.piece.color == color)
}

/// Has this particular piece ever moved? Identity comes from its id, so a
/// rook that walks onto an empty corner does not inherit castling rights.
fn piece_has_moved(piece: Piece, history: &[MoveRecord]) -> bool {
    history.iter().any(|m| m.piece.id == piece.id)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::PieceId;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_fen_placement(placement).unwrap()
    }

    fn sorted(squares: Vec<Square>) -> Vec<String> {
        let mut names: Vec<String> = squares.into_iter().map(|s| s.to_algebraic()).collect();
        names.sort();
        names
    }

    fn names(list: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        v.sort();
        v
    }

    /// Record a move as history, taking the piece from `board`.
    fn record(board: &Board, from: &str, to: &str) -> MoveRecord {
        MoveRecord {
            piece: board.piece_at(sq(from)).unwrap(),
            from: sq(from),
            to: sq(to),
            captured: None,
        }
    }

    fn pseudo(board: &Board, from: &str) -> Vec<String> {
        sorted(pseudo_legal_moves(board, sq(from), &[], Castling::Generate))
    }

    fn legal(board: &Board, from: &str, history: &[MoveRecord]) -> Vec<String> {
        sorted(legal_moves(board, sq(from), history))
    }

    // -----------------------------------------------------------------
    // Basic generation
    // -----------------------------------------------------------------

    #[test]
    fn empty_square_has_no_moves() {
        let b = Board::starting();
        assert!(pseudo_legal_moves(&b, sq("e4"), &[], Castling::Generate).is_empty());
        assert!(legal_moves(&b, sq("e4"), &[]).is_empty());
    }

    #[test]
    fn starting_position_has_twenty_moves_per_side() {
        let b = Board::starting();
        assert_eq!(legal_moves_for(&b, Color::White, &[]).len(), 20);
        assert_eq!(legal_moves_for(&b, Color::Black, &[]).len(), 20);
    }

    #[test]
    fn pawn_single_and_double_push() {
        let b = Board::starting();
        assert_eq!(pseudo(&b, "e2"), names(&["e3", "e4"]));
        assert_eq!(pseudo(&b, "d7"), names(&["d6", "d5"]));
    }

    #[test]
    fn pawn_double_push_blocked_by_intervening_piece() {
        let b = board("4k3/8/8/8/8/4n3/4P3/4K3");
        assert!(pseudo(&b, "e2").is_empty());
        let b = board("4k3/8/8/8/4n3/8/4P3/4K3");
        assert_eq!(pseudo(&b, "e2"), names(&["e3"]));
    }

    #[test]
    fn pawn_no_double_push_off_start_row() {
        let b = board("4k3/8/8/8/8/4P3/8/4K3");
        assert_eq!(pseudo(&b, "e3"), names(&["e4"]));
    }

    #[test]
    fn pawn_captures_only_enemies() {
        let b = board("4k3/8/8/3p1N2/4P3/8/8/4K3");
        assert_eq!(pseudo(&b, "e4"), names(&["e5", "d5"]));
    }

    #[test]
    fn pawn_on_edge_file_stays_on_board() {
        let b = board("4k3/8/8/8/8/1p6/P7/4K3");
        assert_eq!(pseudo(&b, "a2"), names(&["a3", "a4", "b3"]));
    }

    #[test]
    fn knight_from_corner() {
        let b = board("4k3/8/8/8/8/8/8/N3K3");
        assert_eq!(pseudo(&b, "a1"), names(&["b3", "c2"]));
    }

    #[test]
    fn knight_skips_own_pieces() {
        let b = Board::starting();
        assert_eq!(pseudo(&b, "g1"), names(&["f3", "h3"]));
    }

    #[test]
    fn rook_stops_at_blockers() {
        let b = board("4k3/8/8/3p4/8/8/3R1P2/4K3");
        // d2 rook: up to d5 (capture), down to d1, left to a2, right stops before f2.
        assert_eq!(
            pseudo(&b, "d2"),
            names(&["d3", "d4", "d5", "d1", "c2", "b2", "a2", "e2"])
        );
    }

    #[test]
    fn bishop_diagonals() {
        let b = board("4k3/8/8/8/8/8/8/2B1K3");
        assert_eq!(
            pseudo(&b, "c1"),
            names(&["b2", "a3", "d2", "e3", "f4", "g5", "h6"])
        );
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let b = board("k7/8/8/8/3Q4/8/8/7K");
        assert_eq!(pseudo_legal_moves(&b, sq("d4"), &[], Castling::Generate).len(), 27);
    }

    #[test]
    fn king_steps() {
        let b = board("4k3/8/8/8/8/8/8/K7");
        assert_eq!(pseudo(&b, "a1"), names(&["a2", "b1", "b2"]));
    }

    // -----------------------------------------------------------------
    // En passant
    // -----------------------------------------------------------------

    #[test]
    fn en_passant_after_double_step() {
        // Black pawn d4, white pawn arrives e2-e4.
        let before = board("4k3/8/8/8/3p4/8/4P3/4K3");
        let history = vec![record(&before, "e2", "e4")];
        let mut after = before.clone();
        after.apply(sq("e2"), sq("e4"));
        assert_eq!(legal(&after, "d4", &history), names(&["d3", "e3"]));
    }

    #[test]
    fn en_passant_only_immediately() {
        let before = board("4k3/8/8/8/3p4/8/4P3/4K3");
        let mut b = before.clone();
        let first = record(&b, "e2", "e4");
        b.apply(sq("e2"), sq("e4"));
        let second = record(&b, "e8", "f8");
        b.apply(sq("e8"), sq("f8"));
        let third = record(&b, "e1", "f1");
        b.apply(sq("e1"), sq("f1"));
        assert_eq!(legal(&b, "d4", &[first, second, third]), names(&["d3"]));
    }

    #[test]
    fn no_en_passant_after_single_steps() {
        let mut b = board("4k3/8/8/8/3p4/4P3/8/4K3");
        let history = vec![record(&b, "e3", "e4")];
        b.apply(sq("e3"), sq("e4"));
        assert_eq!(legal(&b, "d4", &history), names(&["d3"]));
    }

    #[test]
    fn no_en_passant_for_non_adjacent_pawn() {
        let mut b = board("4k3/8/8/8/2p5/8/4P3/4K3");
        let history = vec![record(&b, "e2", "e4")];
        b.apply(sq("e2"), sq("e4"));
        assert_eq!(legal(&b, "c4", &history), names(&["c3"]));
    }

    #[test]
    fn en_passant_refused_when_it_exposes_king() {
        // King a5 and enemy rook h5 on the same rank; removing both pawns opens it.
        let mut b = board("4k3/2p5/8/KP5r/8/8/8/8");
        let history = vec![record(&b, "c7", "c5")];
        b.apply(sq("c7"), sq("c5"));
        assert_eq!(legal(&b, "b5", &history), names(&["b6"]));
    }

    // -----------------------------------------------------------------
    // Castling
    // -----------------------------------------------------------------

    #[test]
    fn castling_both_sides_when_clear() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let moves = legal(&b, "e1", &[]);
        assert!(moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
        let moves = legal(&b, "e8", &[]);
        assert!(moves.contains(&"g8".to_string()));
        assert!(moves.contains(&"c8".to_string()));
    }

    #[test]
    fn castling_requires_empty_path() {
        let b = board("r3k2r/8/8/8/8/8/8/RN2K1NR");
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_forbidden_after_king_moved() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let king = b.piece_at(sq("e1")).unwrap();
        let history = vec![
            MoveRecord { piece: king, from: sq("e1"), to: sq("e2"), captured: None },
            MoveRecord { piece: king, from: sq("e2"), to: sq("e1"), captured: None },
        ];
        let moves = legal(&b, "e1", &history);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_forbidden_after_rook_moved() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rook = b.piece_at(sq("h1")).unwrap();
        let history = vec![
            MoveRecord { piece: rook, from: sq("h1"), to: sq("h2"), captured: None },
            MoveRecord { piece: rook, from: sq("h2"), to: sq("h1"), captured: None },
        ];
        let moves = legal(&b, "e1", &history);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_forbidden_with_replacement_rook_in_corner() {
        // The h1 rook was captured there; the a-file rook later took its place.
        let b = board("3k4/8/8/8/8/8/8/4K2R");
        let rook = b.piece_at(sq("h1")).unwrap();
        let history = vec![
            MoveRecord { piece: rook, from: sq("a1"), to: sq("a2"), captured: None },
            MoveRecord { piece: rook, from: sq("a2"), to: sq("h2"), captured: None },
            MoveRecord { piece: rook, from: sq("h2"), to: sq("h1"), captured: None },
        ];
        assert!(!legal(&b, "e1", &history).contains(&"g1".to_string()));
        assert!(legal(&b, "e1", &[]).contains(&"g1".to_string()));
    }

    #[test]
    fn castling_forbidden_out_of_check() {
        let b = board("r3k2r/8/8/8/8/8/4r3/R3K2R");
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_forbidden_through_attacked_square() {
        // Black rook on f8 covers f1.
        let b = board("4kr2/8/8/8/8/8/8/R3K2R");
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_through_square_covered_by_pawn() {
        // Black pawn on e2 attacks d1 and f1 even though both are empty.
        let b = board("4k3/8/8/8/8/8/4p3/R3K2R");
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn queenside_allows_attacked_b_file() {
        // Black rook on b8 covers b1 only.
        let b = board("1r2k3/8/8/8/8/8/8/R3K3");
        assert!(legal(&b, "e1", &[]).contains(&"c1".to_string()));
    }

    #[test]
    fn castling_needs_own_rook_in_corner() {
        let b = board("4k3/8/8/8/8/8/8/n3K2b");
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_needs_king_on_home_square() {
        let b = board("4k3/8/8/8/8/8/8/R2K3R");
        let moves = legal(&b, "d1", &[]);
        assert!(!moves.contains(&"b1".to_string()));
        assert!(!moves.contains(&"f1".to_string()));
    }

    #[test]
    fn skip_mode_omits_castling() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let moves = pseudo_legal_moves(&b, sq("e1"), &[], Castling::Skip);
        assert!(!moves.contains(&sq("g1")));
        assert!(!moves.contains(&sq("c1")));
    }

    // -----------------------------------------------------------------
    // Legality filter
    // -----------------------------------------------------------------

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // White knight e2 pinned by rook e8 against king e1.
        let b = board("4r2k/8/8/8/8/8/4N3/4K3");
        assert!(legal(&b, "e2", &[]).is_empty());
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let b = board("3r3k/8/8/8/8/8/8/4K3");
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"d1".to_string()));
        assert!(!moves.contains(&"d2".to_string()));
        assert!(moves.contains(&"e2".to_string()));
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let b = board("7k/8/8/8/8/8/3r4/3rK3");
        // d1 rook is protected by d2 rook; d2 rook is protected by d1 rook.
        let moves = legal(&b, "e1", &[]);
        assert!(!moves.contains(&"d1".to_string()));
        assert!(!moves.contains(&"d2".to_string()));
    }

    #[test]
    fn only_check_evasions_are_legal() {
        // White in check from rook e8; bishop c4 can block on e6 only... or e2.
        let b = board("4r2k/8/8/8/2B5/8/8/4K3");
        assert_eq!(legal(&b, "c4", &[]), names(&["e2", "e6"]));
    }

    #[test]
    fn legal_filter_does_not_mutate_board() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let before = b.clone();
        let _ = legal_moves_for(&b, Color::White, &[]);
        assert_eq!(b, before);
    }

    #[test]
    fn has_legal_move_matches_full_enumeration() {
        for placement in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "k7/2K5/1Q6/8/8/8/8/8",
            "7k/6Q1/6K1/8/8/8/8/8",
        ] {
            let b = board(placement);
            for color in [Color::White, Color::Black] {
                assert_eq!(
                    has_legal_move(&b, color, &[]),
                    !legal_moves_for(&b, color, &[]).is_empty()
                );
            }
        }
    }

    #[test]
    fn no_legal_move_leaves_own_king_attacked() {
        for placement in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R",
        ] {
            let b = board(placement);
            for color in [Color::White, Color::Black] {
                for (from, to) in legal_moves_for(&b, color, &[]) {
                    let mut after = b.clone();
                    after.apply(from, to);
                    assert!(
                        !status::in_check(&after, color),
                        "{from}{to} leaves {color} in check on {placement}"
                    );
                }
            }
        }
    }

    #[test]
    fn board_without_king_is_not_filtered() {
        let mut b = Board::empty();
        b.put(sq("d4"), Piece::new(PieceId(0), PieceKind::Rook, Color::White));
        assert_eq!(legal_moves(&b, sq("d4"), &[]).len(), 14);
    }
}
