//! `StateInfo`: the per-ply snapshot of everything about a position that is
//! derivable from the board but too expensive to recompute every query --
//! hash keys, check/pin information, and the handful of fields (castling
//! rights, en-passant square, clocks) that only change on specific kinds of
//! moves.
//!
//! Snapshots are chained by index into `Position`'s preallocated history
//! buffer rather than by an owned back-reference, so pushing and popping a
//! ply never allocates.

use crate::board::castle_rights::Castling;
use crate::core::bitboard::BitBoard;
use crate::core::sq::{Square, NO_SQUARE};
use crate::core::{Color, Piece, NO_PIECE};

/// Three-fold-repetition bookkeeping for a single `StateInfo`.
///
/// `None` means no earlier identical position was found within the current
/// fifty-move window. `Ancestor(plies)` means the position `plies` plies ago
/// (an even number, since repetition only compares same-side-to-move
/// positions) is identical; a second hit chains through that ancestor's own
/// `Repetition`, giving three-fold detection in constant time per ply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repetition {
    None,
    Ancestor(u16),
}

#[derive(Clone, Debug)]
pub struct StateInfo {
    pub position_key: u64,
    pub material_key: u64,
    pub pawn_key: u64,
    pub non_pawn_material: [i32; 2],

    pub checkers_bb: BitBoard,
    pub blockers_for_king: [BitBoard; 2],
    pub pinners: [BitBoard; 2],

    pub active_color: Color,
    pub castling_rights: Castling,
    pub ep_square: Square,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub captured_piece: Piece,
    pub repetition: Repetition,

    /// Index into the owning `Position`'s history buffer of the state this
    /// one was pushed from, or `None` for the root (the state a `Position`
    /// is constructed with).
    pub previous: Option<usize>,
}

impl StateInfo {
    /// The zeroed, no-history starting state: empty board's worth of keys,
    /// White to move, full castling rights, no en-passant square, move one.
    /// `Position::new`/FEN parsing overwrite every field that depends on
    /// piece placement; this is just a safe, inert starting value.
    pub fn blank() -> StateInfo {
        StateInfo {
            position_key: 0,
            material_key: 0,
            pawn_key: 0,
            non_pawn_material: [0, 0],
            checkers_bb: BitBoard::EMPTY,
            blockers_for_king: [BitBoard::EMPTY; 2],
            pinners: [BitBoard::EMPTY; 2],
            active_color: Color::White,
            castling_rights: Castling::empty(),
            ep_square: NO_SQUARE,
            halfmove_clock: 0,
            fullmove_number: 1,
            captured_piece: NO_PIECE,
            repetition: Repetition::None,
            previous: None,
        }
    }
}
