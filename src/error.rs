//! Error types for the fallible, non-programmer-error paths of the crate:
//! FEN parsing and magic-number search. Everything else that can go wrong
//! (an out-of-range square, an illegal primitive call) is a programmer error
//! and is reported with `assert!`/`debug_assert!` instead, per the crate's
//! three-tier error model.

use thiserror::Error;

use crate::core::PieceType;

/// A FEN string failed to parse.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FenError {
    #[error("expected 6 space-separated FEN fields, found {0}")]
    WrongFieldCount(usize),

    #[error("piece placement field has {0} ranks, expected 8")]
    WrongRankCount(usize),

    #[error("rank {rank} describes {files} files, expected 8")]
    WrongFileCount { rank: u8, files: u32 },

    #[error("unrecognized piece letter '{0}'")]
    UnknownPieceChar(char),

    #[error("side to move must be 'w' or 'b', found \"{0}\"")]
    BadSideToMove(String),

    #[error("castling availability field is malformed: \"{0}\"")]
    BadCastlingField(String),

    #[error("en passant target square is malformed: \"{0}\"")]
    BadEnPassantSquare(String),

    #[error("halfmove clock is not a valid number: \"{0}\"")]
    BadHalfmoveClock(String),

    #[error("fullmove number is not a valid positive number: \"{0}\"")]
    BadFullmoveNumber(String),

    #[error("white has {0} kings, expected exactly 1")]
    WrongWhiteKingCount(u32),

    #[error("black has {0} kings, expected exactly 1")]
    WrongBlackKingCount(u32),

    #[error("side not to move is in check, which is not a legal position")]
    OpponentInCheck,
}

/// The magic-number search for a sliding piece's attack table exhausted its
/// attempt budget without finding a collision-free magic. In practice this
/// should never happen with the crate's fixed seed table; it exists so that
/// table construction is a typed `Result` rather than an unbounded loop.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("magic search for {piece_type:?} on square {square} exceeded {attempts} attempts")]
pub struct MagicError {
    pub piece_type: PieceType,
    pub square: u8,
    pub attempts: u32,
}
