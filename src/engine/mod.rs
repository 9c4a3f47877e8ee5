pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod pgn;
pub mod san;
pub mod snapshot;
pub mod status;
pub mod types;

pub use attacks::is_square_attacked;
pub use board::Board;
pub use game::{Game, SessionEvent};
pub use movegen::{Castling, legal_moves, pseudo_legal_moves};
pub use snapshot::GameSnapshot;
pub use status::{classify, in_check, is_checkmate, is_stalemate};
pub use types::*;
