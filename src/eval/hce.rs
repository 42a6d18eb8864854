//! Hand-Crafted Evaluation (HCE)
//!
//! Features:
//! - Material
//! - Piece-Square Tables, king tables tapered by game phase
//! - Mobility (legal moves of both sides from the same placement)
//! - Pawn structure (doubled, isolated, passed)

use crate::rules::{mirror_square, ChessPosition};
use crate::types::{piece_value, BitBoard, Board, Color, File, Piece, Square, Value, EMPTY};

// ============================================================================
// PIECE-SQUARE TABLES (from white's perspective, visual layout: rank 8 first)
// ============================================================================

// Pawn PST (encourage center control and advancement)
#[rustfmt::skip]
const PAWN_PST: [Value; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

// Knight PST (encourage centralization)
#[rustfmt::skip]
const KNIGHT_PST: [Value; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

// Bishop PST
#[rustfmt::skip]
const BISHOP_PST: [Value; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

// Rook PST (7th rank bonus, central back rank)
#[rustfmt::skip]
const ROOK_PST: [Value; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  5, 10, 10,  5,  0,  0,
];

// Queen PST
#[rustfmt::skip]
const QUEEN_PST: [Value; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -10,  5,  5,  5,  5,  5,  0,-10,
     0,  0,  5,  5,  5,  5,  0, -5,
    -5,  0,  5,  5,  5,  5,  0, -5,
   -10,  0,  5,  5,  5,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

// King PST - midgame (the back rank carries the heaviest penalty)
#[rustfmt::skip]
const KING_PST_MG: [Value; 64] = [
    20, 30, 10,  0,  0, 10, 30, 20,
    20, 20,  0,  0,  0,  0, 20, 20,
   -10,-20,-20,-20,-20,-20,-20,-10,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
];

// King PST - endgame
#[rustfmt::skip]
const KING_PST_EG: [Value; 64] = [
   -50,-30,-30,-30,-30,-30,-30,-50,
   -30,-30,  0,  0,  0,  0,-30,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -50,-40,-30,-20,-20,-30,-40,-50,
];

// ============================================================================
// BONUSES AND PENALTIES
// ============================================================================

const DOUBLED_PAWN_PENALTY: Value = 15;
const ISOLATED_PAWN_PENALTY: Value = 10;
const PASSED_PAWN_BONUS: Value = 20;
const MOBILITY_WEIGHT: Value = 2; // per legal move

/// Phase saturates at this many non-pawn, non-king pieces
const MAX_PHASE_PIECES: u32 = 16;

const MATERIAL_PIECES: [Piece; 5] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

const FILES: [File; 8] = [File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H];

// ============================================================================
// GAME PHASE
// ============================================================================

/// Game phase between 0.0 (endgame) and 1.0 (middlegame).
///
/// Based on the number of remaining non-pawn, non-king pieces of both colours.
#[inline]
pub fn game_phase(board: &Board) -> f64 {
    let pieces = board.pieces(Piece::Knight)
        | board.pieces(Piece::Bishop)
        | board.pieces(Piece::Rook)
        | board.pieces(Piece::Queen);
    f64::from(pieces.popcnt().min(MAX_PHASE_PIECES)) / f64::from(MAX_PHASE_PIECES)
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Get PST index for a square from white's perspective
#[inline]
fn pst_index(sq: Square, color: Color) -> usize {
    match color {
        // Tables are laid out rank 8 first, so White reads them mirrored.
        Color::White => mirror_square(sq).to_index(),
        Color::Black => sq.to_index(),
    }
}

#[inline]
fn pst(piece: Piece) -> &'static [Value; 64] {
    match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        // Blended with the endgame table by king_placement
        Piece::King => &KING_PST_MG,
    }
}

/// King placement, blended between the midgame and endgame tables
#[inline]
fn king_placement(sq: Square, color: Color, phase: f64) -> Value {
    let idx = pst_index(sq, color);
    let mg = f64::from(KING_PST_MG[idx]);
    let eg = f64::from(KING_PST_EG[idx]);
    (phase * mg + (1.0 - phase) * eg).round() as Value
}

/// Get bitboard for a file
#[inline]
const fn get_file_bb(file: File) -> u64 {
    0x0101010101010101u64 << (file as u8)
}

#[inline]
fn colour_pawns(board: &Board, color: Color) -> BitBoard {
    board.pieces(Piece::Pawn) & board.color_combined(color)
}

/// Check if a pawn is passed: no enemy pawn strictly ahead on its own or an adjacent file
#[inline]
fn is_passed_pawn(board: &Board, sq: Square, color: Color) -> bool {
    let rank = sq.get_rank();
    let file_idx = sq.get_file().to_index();

    // Get adjacent files + same file
    let mut check_mask = get_file_bb(FILES[file_idx]);
    if file_idx > 0 {
        check_mask |= get_file_bb(FILES[file_idx - 1]);
    }
    if file_idx < 7 {
        check_mask |= get_file_bb(FILES[file_idx + 1]);
    }
    let check_files = BitBoard::new(check_mask);

    // Get ranks in front of pawn. Pawns never stand on the last rank, so the shift stays below 64.
    let front_ranks: BitBoard = if color == Color::White {
        BitBoard::new(!((1u64 << ((rank.to_index() as u8 + 1) * 8)) - 1))
    } else {
        BitBoard::new((1u64 << (rank.to_index() as u8 * 8)) - 1)
    };

    let blocking_area = check_files & front_ranks;
    colour_pawns(board, !color) & blocking_area == EMPTY
}

// ============================================================================
// EVALUATION TERMS
// ============================================================================

/// Material balance (white - black), king excluded
pub fn material(board: &Board) -> Value {
    MATERIAL_PIECES
        .iter()
        .map(|&piece| {
            let white = (board.pieces(piece) & board.color_combined(Color::White)).popcnt() as Value;
            let black = (board.pieces(piece) & board.color_combined(Color::Black)).popcnt() as Value;
            piece_value(piece) * (white - black)
        })
        .sum()
}

/// Piece-square table score (white - black)
pub fn piece_square(board: &Board) -> Value {
    let phase = game_phase(board);
    let mut score = 0;

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let ours = board.color_combined(color);

        for piece in MATERIAL_PIECES {
            let table = pst(piece);
            for sq in board.pieces(piece) & ours {
                score += sign * table[pst_index(sq, color)];
            }
        }

        for sq in board.pieces(Piece::King) & ours {
            score += sign * king_placement(sq, color, phase);
        }
    }

    score
}

/// Mobility: legal move counts of both sides from the same placement (white - black)
pub fn mobility(position: &ChessPosition) -> Value {
    let count = |color| position.legal_move_count_as(color) as Value;
    MOBILITY_WEIGHT * (count(Color::White) - count(Color::Black))
}

/// Doubled, isolated and passed pawns (white - black)
pub fn pawn_structure(board: &Board) -> Value {
    let mut score = 0;

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let pawns = colour_pawns(board, color);

        let mut file_counts = [0 as Value; 8];
        for sq in pawns {
            file_counts[sq.get_file().to_index()] += 1;
        }

        // Doubled pawns
        for &count in &file_counts {
            if count > 1 {
                score -= sign * DOUBLED_PAWN_PENALTY * (count - 1);
            }
        }

        for sq in pawns {
            let file = sq.get_file().to_index();

            // Isolated pawns
            let left = file > 0 && file_counts[file - 1] > 0;
            let right = file < 7 && file_counts[file + 1] > 0;
            if !left && !right {
                score -= sign * ISOLATED_PAWN_PENALTY;
            }

            // Passed pawns
            if is_passed_pawn(board, sq, color) {
                score += sign * PASSED_PAWN_BONUS;
            }
        }
    }

    score
}

// ============================================================================
// MAIN EVALUATION FUNCTION
// ============================================================================

/// Evaluate the position from white's perspective
pub fn evaluate(position: &ChessPosition) -> Value {
    let board = position.board();
    material(board) + piece_square(board) + mobility(position) + pawn_structure(board)
}
