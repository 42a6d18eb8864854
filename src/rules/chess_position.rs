//! `GameState` implementation over `chess::Board`.
//!
//! `chess::Board` only distinguishes checkmate and stalemate. The remaining
//! automatic game-over rules (insufficient material, seventy-five-move rule,
//! fivefold repetition) are tracked here so random rollouts always end.

use std::str::FromStr;

use chess::{get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_pawn_quiets, get_rank, get_rook_moves};

use super::{GameState, Outcome};
use crate::error::SearchError;
use crate::types::{BitBoard, Board, BoardStatus, Color, File, Move, MoveGen, Piece, Rank, Square, EMPTY};

/// Halfmove clock value at which the seventy-five-move rule ends the game
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Occurrences that end the game by repetition
const FIVEFOLD: usize = 5;

const DARK_SQUARES: u64 = 0xAA55_AA55_AA55_AA55;

/// Mirror a square across the horizontal midline (rank reversed, file kept)
#[inline]
pub fn mirror_square(sq: Square) -> Square {
    Square::make_square(Rank::from_index(7 - sq.get_rank().to_index()), sq.get_file())
}

/// A chess position plus the counters the board itself does not keep
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChessPosition {
    board: Board,
    halfmove_clock: u32,
    /// Hashes since the last irreversible move, current position last
    history: Vec<u64>,
}

impl ChessPosition {
    /// The standard starting position
    pub fn starting() -> Self {
        Self::from_board(Board::default(), 0)
    }

    pub fn from_board(board: Board, halfmove_clock: u32) -> Self {
        Self {
            history: vec![board.get_hash()],
            board,
            halfmove_clock,
        }
    }

    /// Parse a FEN string, keeping its halfmove clock
    pub fn from_fen(fen: &str) -> Result<Self, SearchError> {
        let board = Board::from_str(fen).map_err(|e| SearchError::InvalidFen {
            fen: fen.to_string(),
            reason: e.to_string(),
        })?;
        let halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0);
        Ok(Self::from_board(board, halfmove_clock))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Legal moves as if `side` were to move, with piece placement untouched.
    ///
    /// Returns `None` when `side` cannot legally be on move, i.e. it is not
    /// the side to move and the side to move is in check. Check-evasion rules
    /// apply to whichever side is queried.
    pub fn legal_moves_as(&self, side: Color) -> Option<Vec<Move>> {
        self.board_as(side).map(|board| MoveGen::new_legal(&board).collect())
    }

    /// Number of legal moves as if `side` were to move.
    ///
    /// Unlike [`Self::legal_moves_as`] this also answers for the side giving
    /// check. Its moves count as legal when they leave its own king safe;
    /// capturing the enemy king counts as a move.
    pub fn legal_move_count_as(&self, side: Color) -> usize {
        match self.board_as(side) {
            Some(board) => MoveGen::new_legal(&board).len(),
            None => count_moves_giving_check(&self.board, side),
        }
    }

    fn board_as(&self, side: Color) -> Option<Board> {
        if side == self.board.side_to_move() {
            Some(self.board)
        } else {
            self.board.null_move()
        }
    }

    /// Colour-mirrored position: ranks reversed, colours swapped.
    ///
    /// Side to move, castling rights and the en-passant square are mirrored too.
    pub fn mirrored(&self) -> Result<Self, SearchError> {
        let fen = self.board.to_string();
        let mut fields = fen.split_whitespace();
        let placement = fields.next().unwrap_or("8/8/8/8/8/8/8/8");
        let side = fields.next().unwrap_or("w");
        let castling = fields.next().unwrap_or("-");
        let en_passant = fields.next().unwrap_or("-");

        let placement = placement
            .split('/')
            .rev()
            .map(swap_case)
            .collect::<Vec<_>>()
            .join("/");
        let side = if side == "w" { "b" } else { "w" };
        let castling = if castling == "-" {
            castling.to_string()
        } else {
            let swapped = swap_case(castling);
            "KQkq".chars().filter(|c| swapped.contains(*c)).collect()
        };
        let en_passant = match en_passant.as_bytes() {
            [file, b'3'] => format!("{}6", *file as char),
            [file, b'6'] => format!("{}3", *file as char),
            _ => "-".to_string(),
        };

        Self::from_fen(&format!(
            "{placement} {side} {castling} {en_passant} {} 1",
            self.halfmove_clock
        ))
    }

    /// Neither side can possibly deliver mate
    pub fn is_insufficient_material(&self) -> bool {
        self.has_insufficient_material(Color::White) && self.has_insufficient_material(Color::Black)
    }

    fn has_insufficient_material(&self, color: Color) -> bool {
        let board = &self.board;
        let ours = *board.color_combined(color);
        let theirs = *board.color_combined(!color);
        let pawns = *board.pieces(Piece::Pawn);
        let knights = *board.pieces(Piece::Knight);
        let bishops = *board.pieces(Piece::Bishop);

        let heavy = pawns | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if ours & heavy != EMPTY {
            return false;
        }

        if ours & knights != EMPTY {
            // A lone knight only mates with help from enemy minors, rooks or pawns.
            let helpers = theirs & !*board.pieces(Piece::King) & !*board.pieces(Piece::Queen);
            return ours.popcnt() <= 2 && helpers == EMPTY;
        }

        if ours & bishops != EMPTY {
            let dark = BitBoard::new(DARK_SQUARES);
            let same_colour = bishops & dark == EMPTY || bishops & !dark == EMPTY;
            return same_colour && pawns == EMPTY && knights == EMPTY;
        }

        true
    }

    fn is_fivefold_repetition(&self) -> bool {
        let current = self.board.get_hash();
        self.history.iter().filter(|&&hash| hash == current).count() >= FIVEFOLD
    }
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::starting()
    }
}

impl FromStr for ChessPosition {
    type Err = SearchError;

    fn from_str(fen: &str) -> Result<Self, Self::Err> {
        Self::from_fen(fen)
    }
}

impl GameState for ChessPosition {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn play(&mut self, mv: Move) {
        let irreversible = self.board.piece_on(mv.get_dest()).is_some()
            || self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);

        self.board = self.board.make_move_new(mv);

        if irreversible {
            self.halfmove_clock = 0;
            self.history.clear();
        } else {
            self.halfmove_clock += 1;
        }
        self.history.push(self.board.get_hash());
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.board.status() {
            BoardStatus::Checkmate => return Some(Outcome::mated(self.board.side_to_move())),
            BoardStatus::Stalemate => return Some(Outcome::Draw),
            BoardStatus::Ongoing => {}
        }

        if self.is_insufficient_material()
            || self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES
            || self.is_fivefold_repetition()
        {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    #[inline]
    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }
}

/// Moves of `side` from the current placement, kept when `side`'s king is safe afterwards.
///
/// `chess::MoveGen` refuses a board where the side not on move is in check,
/// so this walks the attack tables instead. Promotions count four times.
/// En passant belongs to the side on move and is never counted here.
fn count_moves_giving_check(board: &Board, side: Color) -> usize {
    let ours = *board.color_combined(side);
    let theirs = *board.color_combined(!side);
    let occupied = *board.combined();
    let king = board.king_square(side);
    let promotion_rank = get_rank(side.to_their_backrank());

    let mut count = 0;
    for from in ours {
        let Some(piece) = board.piece_on(from) else {
            continue;
        };
        let targets = match piece {
            Piece::Pawn => get_pawn_attacks(from, side, theirs) | get_pawn_quiets(from, side, occupied),
            Piece::Knight => get_knight_moves(from),
            Piece::Bishop => get_bishop_moves(from, occupied),
            Piece::Rook => get_rook_moves(from, occupied),
            Piece::Queen => get_bishop_moves(from, occupied) | get_rook_moves(from, occupied),
            Piece::King => get_king_moves(from),
        } & !ours;

        for to in targets {
            let to_bb = BitBoard::from_square(to);
            let occupied_after = (occupied ^ BitBoard::from_square(from)) | to_bb;
            let king_after = if piece == Piece::King { to } else { king };
            if is_attacked(board, king_after, side, occupied_after, theirs & !to_bb) {
                continue;
            }
            count += if piece == Piece::Pawn && to_bb & promotion_rank != EMPTY { 4 } else { 1 };
        }
    }

    count + castle_count(board, side)
}

/// Castling moves available to `side`, checked from the current placement
fn castle_count(board: &Board, side: Color) -> usize {
    let rights = board.castle_rights(side);
    let rank = side.to_my_backrank();
    let occupied = *board.combined();
    let attackers = *board.color_combined(!side);

    let empty = |files: &[File]| {
        files
            .iter()
            .all(|&file| board.piece_on(Square::make_square(rank, file)).is_none())
    };
    let safe = |files: &[File]| {
        files
            .iter()
            .all(|&file| !is_attacked(board, Square::make_square(rank, file), side, occupied, attackers))
    };

    let kingside = rights.has_kingside() && empty(&[File::F, File::G]) && safe(&[File::E, File::F, File::G]);
    let queenside =
        rights.has_queenside() && empty(&[File::B, File::C, File::D]) && safe(&[File::E, File::D, File::C]);
    usize::from(kingside) + usize::from(queenside)
}

/// Whether `attackers` hit `sq` through `occupied`; `side` owns the piece on `sq`
fn is_attacked(board: &Board, sq: Square, side: Color, occupied: BitBoard, attackers: BitBoard) -> bool {
    let diagonal = board.pieces(Piece::Bishop) | board.pieces(Piece::Queen);
    let straight = board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    let hits = (get_bishop_moves(sq, occupied) & diagonal)
        | (get_rook_moves(sq, occupied) & straight)
        | (get_knight_moves(sq) & *board.pieces(Piece::Knight))
        | (get_king_moves(sq) & *board.pieces(Piece::King))
        | get_pawn_attacks(sq, side, *board.pieces(Piece::Pawn));
    hits & attackers != EMPTY
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}
