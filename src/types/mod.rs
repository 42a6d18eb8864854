//! Core types shared by the evaluator and both searches.
//!
//! # Design Principles
//! - Re-export chess crate types as the canonical source for board/move types
//! - Define search-specific types (Score, Depth, Ply) on top of them
//! - Keep every score oriented from White's point of view

mod score;
mod depth;

pub use score::Score;
pub use depth::{Depth, Ply, MAX_DEPTH};

// Re-export chess crate types as canonical types
pub use chess::{
    Board,
    ChessMove as Move,
    Square,
    Piece,
    Color,
    BitBoard,
    File,
    Rank,
    MoveGen,
    BoardStatus,
    EMPTY,
};

/// Node count type
pub type NodeCount = u64;

/// Centipawn value type (for piece values, evaluation terms, etc.)
pub type Value = i32;

// Piece values in centipawns
pub const PAWN_VALUE: Value = 100;
pub const KNIGHT_VALUE: Value = 320;
pub const BISHOP_VALUE: Value = 330;
pub const ROOK_VALUE: Value = 500;
pub const QUEEN_VALUE: Value = 900;
/// The king carries no material; it is scored by placement and by the game result.
pub const KING_VALUE: Value = 0;

/// Get the material value of a piece in centipawns
#[inline]
pub const fn piece_value(piece: Piece) -> Value {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}
