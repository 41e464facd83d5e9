//! `Castling`: the four-bit set of castling rights still available to each
//! side, plus the per-square bookkeeping needed to know when a move forfeits
//! one of those rights.
//!
//! A set bit does not mean a side can castle *right now* -- only that
//! neither its king nor that side's rook has moved or been captured since
//! the start of the game. Whether castling is legal this move also depends
//! on the squares between king and rook being empty and not attacked, which
//! is computed by the position, not stored here.

use std::fmt;

use crate::core::masks::{
    C_BLACK_K_MASK, C_BLACK_Q_MASK, C_WHITE_K_MASK, C_WHITE_Q_MASK,
};
use crate::core::sq::Square;
use crate::core::Color;

bitflags::bitflags! {
    pub struct Castling: u8 {
        const WHITE_K = C_WHITE_K_MASK;
        const WHITE_Q = C_WHITE_Q_MASK;
        const BLACK_K = C_BLACK_K_MASK;
        const BLACK_Q = C_BLACK_Q_MASK;
        const WHITE_ALL = Self::WHITE_K.bits | Self::WHITE_Q.bits;
        const BLACK_ALL = Self::BLACK_K.bits | Self::BLACK_Q.bits;
        const ALL = Self::WHITE_ALL.bits | Self::BLACK_ALL.bits;
    }
}

/// Which side of the board a castling move goes towards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

impl Castling {
    /// Returns the bits that `sq` forfeits if a piece moves to or from it:
    /// a king's home square forfeits both of its side's rights, a rook's
    /// home square forfeits only that side's matching right, and every
    /// other square forfeits nothing.
    #[inline]
    pub fn rights_lost_at(sq: Square) -> Castling {
        match sq {
            Square::E1 => Castling::WHITE_ALL,
            Square::H1 => Castling::WHITE_K,
            Square::A1 => Castling::WHITE_Q,
            Square::E8 => Castling::BLACK_ALL,
            Square::H8 => Castling::BLACK_K,
            Square::A8 => Castling::BLACK_Q,
            _ => Castling::empty(),
        }
    }

    /// Clears whatever rights are forfeited by a move between `from` and
    /// `to`, returning the rights that were actually removed (zero if the
    /// move touched neither a king's nor a rook's home square).
    #[inline]
    pub fn update(&mut self, from: Square, to: Square) -> Castling {
        let lost = Castling::rights_lost_at(from) | Castling::rights_lost_at(to);
        let removed = *self & lost;
        self.remove(lost);
        removed
    }

    /// Drops every right belonging to `color`.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        match color {
            Color::White => self.remove(Castling::WHITE_ALL),
            Color::Black => self.remove(Castling::BLACK_ALL),
        }
    }

    #[inline]
    pub fn can_castle(self, color: Color, side: CastleSide) -> bool {
        let right = match (color, side) {
            (Color::White, CastleSide::King) => Castling::WHITE_K,
            (Color::White, CastleSide::Queen) => Castling::WHITE_Q,
            (Color::Black, CastleSide::King) => Castling::BLACK_K,
            (Color::Black, CastleSide::Queen) => Castling::BLACK_Q,
        };
        self.contains(right)
    }

    #[inline]
    pub fn color_rights(self, color: Color) -> Castling {
        match color {
            Color::White => self & Castling::WHITE_ALL,
            Color::Black => self & Castling::BLACK_ALL,
        }
    }

    /// Parses one character of a FEN castling-availability field (`KQkq` or
    /// `-`), ORing the corresponding right into `self`.
    ///
    /// # Panics
    ///
    /// Panics if `c` is not one of `KQkq-`; the FEN parser is expected to
    /// validate the field before calling this.
    pub fn add_fen_char(&mut self, c: char) {
        let bit = match c {
            'K' => Castling::WHITE_K,
            'Q' => Castling::WHITE_Q,
            'k' => Castling::BLACK_K,
            'q' => Castling::BLACK_Q,
            '-' => Castling::empty(),
            _ => panic!("'{}' is not a valid castling-availability character", c),
        };
        self.insert(bit);
    }

    /// Renders as a FEN castling-availability field: some subset of `KQkq`,
    /// in that fixed order, or `"-"` if no rights remain.
    pub fn pretty_string(self) -> String {
        if self.is_empty() {
            return "-".to_owned();
        }
        let mut s = String::with_capacity(4);
        if self.contains(Castling::WHITE_K) {
            s.push('K');
        }
        if self.contains(Castling::WHITE_Q) {
            s.push('Q');
        }
        if self.contains(Castling::BLACK_K) {
            s.push('k');
        }
        if self.contains(Castling::BLACK_Q) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty_string())
    }
}
