//! Zobrist hashing keys.
//!
//! A position's three incremental hash keys (`position_key`, `material_key`,
//! `pawn_key`) are built by XOR-folding these per-feature random constants
//! as pieces move, rather than recomputing a hash from scratch every ply.
//! Built once by [`init`] from a fixed seed, so the same position always
//! hashes the same way across runs -- useful for reproducing a search or a
//! transposition-table bug.

use std::sync::OnceLock;

use crate::core::bitboard::BitBoard;
use crate::core::masks::{CASTLING_RIGHTS_NB, FILE_CNT, PIECE_CNT, SQ_CNT};
use crate::core::sq::Square;
use crate::core::{Piece, PieceType};
use crate::tools::prng::Prng;

const ZOBRIST_SEED: u64 = 23_081;

pub struct ZobristTables {
    piece_square: [[u64; PIECE_CNT]; SQ_CNT],
    en_passant: [u64; FILE_CNT],
    castling: [u64; CASTLING_RIGHTS_NB],
    side: u64,
    no_pawns: u64,
}

static ZOBRIST: OnceLock<ZobristTables> = OnceLock::new();

#[cold]
pub fn init() {
    ZOBRIST.get_or_init(build);
}

fn tables() -> &'static ZobristTables {
    ZOBRIST
        .get()
        .expect("zobrist tables read before helper::zobrist::init() was called")
}

fn build() -> ZobristTables {
    tracing::debug!("building zobrist key tables");
    let mut rng = Prng::new(ZOBRIST_SEED);

    let mut piece_square = [[0u64; PIECE_CNT]; SQ_CNT];
    for sq in piece_square.iter_mut() {
        for key in sq.iter_mut() {
            *key = rng.rand();
        }
    }

    let mut en_passant = [0u64; FILE_CNT];
    for key in en_passant.iter_mut() {
        *key = rng.rand();
    }

    // Per-bit keys are drawn lazily and cached, then each of the 16 rights
    // subsets is the XOR of the bits it contains -- so "all castling"
    // equals "king-side" xor "queen-side" xor ... rather than its own
    // independent random value.
    let mut bit_keys = [0u64; 4];
    let mut castling = [0u64; CASTLING_RIGHTS_NB];
    for cr in 0..CASTLING_RIGHTS_NB {
        let mut key = 0u64;
        let mut bits = BitBoard(cr as u64);
        while let Some(s) = bits.pop_some_lsb() {
            let i = s.0 as usize;
            if bit_keys[i] == 0 {
                bit_keys[i] = rng.rand();
            }
            key ^= bit_keys[i];
        }
        castling[cr] = key;
    }

    let side = rng.rand();
    let no_pawns = rng.rand();

    tracing::debug!("zobrist key tables built");
    ZobristTables {
        piece_square,
        en_passant,
        castling,
        side,
        no_pawns,
    }
}

/// Key contribution of `piece` sitting on `sq`.
///
/// A pawn can never sit on rank 1 or rank 8, so this is zero for a pawn on
/// either back rank (a conceptually impossible placement): any accidental
/// inclusion of such a square still leaves the hash invariant. The
/// underlying table is not zeroed at those indices -- `material_term` reuses
/// the same storage, counting by piece-count rather than by square, and a
/// pawn's count legitimately reaches those same low indices.
#[inline(always)]
pub fn piece_square(sq: Square, piece: Piece) -> u64 {
    debug_assert!(sq.is_okay());
    let rank = sq.rank();
    if piece.piece_type() == PieceType::Pawn
        && (rank == crate::core::Rank::R1 || rank == crate::core::Rank::R8)
    {
        return 0;
    }
    tables().piece_square[sq.0 as usize][piece.0 as usize]
}

/// Key contribution of an en-passant target on `sq`'s file.
#[inline(always)]
pub fn en_passant(sq: Square) -> u64 {
    debug_assert!(sq.is_okay());
    tables().en_passant[sq.file() as usize]
}

/// Key contribution of a castling-rights subset, `0..16`.
#[inline(always)]
pub fn castling(rights: u8) -> u64 {
    debug_assert!((rights as usize) < CASTLING_RIGHTS_NB);
    tables().castling[rights as usize]
}

/// Key contribution of Black being on move (XORed in only for Black).
#[inline(always)]
pub fn side() -> u64 {
    tables().side
}

/// Key contribution folded into `pawn_key` when a side has no pawns left,
/// so an empty pawn structure still hashes to a nonzero, well-defined key.
#[inline(always)]
pub fn no_pawns() -> u64 {
    tables().no_pawns
}

/// Key contribution of the `count`-th copy of `piece` existing on the board,
/// for `material_key`. Reuses the piece-square table, indexing by count
/// instead of by square (a count never exceeds the 64 squares the table is
/// sized for) rather than drawing a second independent random table: the
/// material key for a piece with `n` copies on the board is the XOR of
/// `material_term(piece, 0) .. material_term(piece, n - 1)`, so adding or
/// removing a copy only ever touches the single term at the new/old count.
#[inline(always)]
pub fn material_term(piece: Piece, count: u8) -> u64 {
    debug_assert!((count as usize) < SQ_CNT);
    tables().piece_square[count as usize][piece.0 as usize]
}
