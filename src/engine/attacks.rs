//! Square attack detection.
//!
//! A square is attacked by a side when any of that side's pieces could move
//! there: pawns along their two forward diagonals (whether or not the square
//! is occupied), every other kind along its pseudo-legal destinations with
//! castling left out. No lookup tables; the board is small enough to scan.

use crate::engine::board::Board;
use crate::engine::movegen::{self, Castling};
use crate::engine::types::{Color, Piece, PieceKind, Square};

/// Is `target` attacked by any piece of colour `by`?
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, piece)| attacks_square(board, from, piece, target))
}

/// Squares holding pieces of colour `by` that attack `target`.
pub fn attackers_of(board: &Board, target: Square, by: Color) -> Vec<Square> {
    board
        .pieces_of(by)
        .filter(|&(from, piece)| attacks_square(board, from, piece, target))
        .map(|(from, _)| from)
        .collect()
}

/// The (up to two) squares a pawn of `color` on `from` attacks.
pub fn pawn_attacks(from: Square, color: Color) -> impl Iterator<Item = Square> {
    [-1, 1]
        .into_iter()
        .filter_map(move |dc| from.offset(color.pawn_step(), dc))
}

fn attacks_square(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(from, piece.color).any(|sq| sq == target),
        // History only feeds en passant and castling, neither of which can
        // reach an occupied target, so an empty history is enough here.
        _ => movegen::pseudo_legal_moves(board, from, &[], Castling::Skip).contains(&target),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_fen_placement(placement).unwrap()
    }

    #[test]
    fn starting_position_third_rank_attacked() {
        let b = Board::starting();
        for col in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            assert!(is_square_attacked(&b, sq(&format!("{col}3")), Color::White));
            assert!(is_square_attacked(&b, sq(&format!("{col}6")), Color::Black));
        }
        assert!(!is_square_attacked(&b, sq("e4"), Color::White));
        assert!(!is_square_attacked(&b, sq("e5"), Color::Black));
    }

    #[test]
    fn pawn_attacks_diagonals_not_pushes() {
        let b = board("4k3/8/8/8/8/8/4P3/4K3");
        assert!(is_square_attacked(&b, sq("d3"), Color::White));
        assert!(is_square_attacked(&b, sq("f3"), Color::White));
        assert!(!is_square_attacked(&b, sq("e3"), Color::White));
        assert!(!is_square_attacked(&b, sq("e4"), Color::White));
    }

    #[test]
    fn pawn_attack_squares_clip_at_edge() {
        let attacks: Vec<Square> = pawn_attacks(sq("a7"), Color::Black).collect();
        assert_eq!(attacks, vec![sq("b6")]);
    }

    #[test]
    fn sliders_are_blocked() {
        let b = board("4k3/8/8/8/R2p3K/8/8/8");
        assert!(is_square_attacked(&b, sq("c4"), Color::White));
        assert!(is_square_attacked(&b, sq("d4"), Color::White));
        assert!(!is_square_attacked(&b, sq("e4"), Color::White));
        assert!(is_square_attacked(&b, sq("a8"), Color::White));
    }

    #[test]
    fn own_pieces_are_not_attacked_by_own_side() {
        let b = Board::starting();
        assert!(!is_square_attacked(&b, sq("e1"), Color::White));
    }

    #[test]
    fn king_attacks_adjacent() {
        let b = board("8/8/8/8/3k4/8/8/K7");
        assert!(is_square_attacked(&b, sq("e5"), Color::Black));
        assert!(!is_square_attacked(&b, sq("f6"), Color::Black));
    }

    #[test]
    fn attackers_are_listed() {
        // Knight f3 and bishop b2 hit e5; rook a1 and king e1 do not.
        let b = board("4k3/8/8/8/8/5N2/1B6/R3K3");
        let mut found = attackers_of(&b, sq("e5"), Color::White);
        found.sort();
        let mut expected = vec![sq("f3"), sq("b2")];
        expected.sort();
        assert_eq!(found, expected);
    }
}
