//! The `Square` representation of a single location on a chessboard.
//!
//! Internally a `Square` is just a `u8`. Bit `r*8 + f` (rank `r` 0-7 from
//! White's side, file `f` 0-7 from the a-file) maps to the following board:
//!
//! ```md,ignore
//! 8 | 56 57 58 59 60 61 62 63
//! 7 | 48 49 50 51 52 53 54 55
//! 6 | 40 41 42 43 44 45 46 47
//! 5 | 32 33 34 35 36 37 38 39
//! 4 | 24 25 26 27 28 29 30 31
//! 3 | 16 17 18 19 20 21 22 23
//! 2 | 8  9  10 11 12 13 14 15
//! 1 | 0  1  2  3  4  5  6  7
//!   -------------------------
//!      a  b  c  d  e  f  g  h
//! ```

use std::fmt;

use super::bitboard::BitBoard;
use super::{File, Rank};

/// A single square of a chessboard, or the sentinel `NO_SQUARE`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(pub u8);

/// The sentinel value for "no square", used for an absent en-passant target
/// and similar optional-square fields.
pub const NO_SQUARE: Square = Square(64);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Builds a square from a file and rank.
    #[inline(always)]
    pub const fn make_square(file: File, rank: Rank) -> Square {
        Square((rank as u8) * 8 + (file as u8))
    }

    /// Returns whether this square is one of the 64 valid board squares.
    #[inline(always)]
    pub const fn is_okay(self) -> bool {
        self.0 < 64
    }

    /// Returns the file this square sits on.
    ///
    /// # Panics
    ///
    /// Panics (via the `File` conversion) if called on `NO_SQUARE`.
    #[inline(always)]
    pub fn file(self) -> File {
        debug_assert!(self.is_okay());
        File::from_index(self.0 & 0b111)
    }

    /// Returns the rank this square sits on.
    #[inline(always)]
    pub fn rank(self) -> Rank {
        debug_assert!(self.is_okay());
        Rank::from_index(self.0 >> 3)
    }

    /// Returns the bitboard containing just this square.
    #[inline(always)]
    pub const fn to_bb(self) -> BitBoard {
        debug_assert!(self.0 < 64);
        BitBoard(1u64 << self.0)
    }

    /// Chebyshev distance between two squares: `max(|file diff|, |rank diff|)`.
    ///
    /// This is the one square-arithmetic routine that geometry-table
    /// construction and `inside_board` both depend on, so it does not read
    /// any precomputed table and is safe to call before `init()`.
    #[inline]
    pub fn distance(self, other: Square) -> u8 {
        debug_assert!(self.is_okay() && other.is_okay());
        let fd = file_diff(self.0, other.0);
        let rd = rank_diff(self.0, other.0);
        fd.max(rd)
    }

    /// Parses a square name such as `"e4"`. Strict: the string must be
    /// exactly two characters, file in `a..=h`, rank in `1..=8`. Any other
    /// input (including `"-"`) yields `NO_SQUARE`.
    pub fn from_str(s: &str) -> Square {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return NO_SQUARE;
        }
        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return NO_SQUARE;
        }
        let f = file - b'a';
        let r = rank - b'1';
        Square(r * 8 + f)
    }
}

#[inline(always)]
fn file_diff(a: u8, b: u8) -> u8 {
    let af = (a & 0b111) as i16;
    let bf = (b & 0b111) as i16;
    (af - bf).unsigned_abs() as u8
}

#[inline(always)]
fn rank_diff(a: u8, b: u8) -> u8 {
    let ar = (a >> 3) as i16;
    let br = (b >> 3) as i16;
    (ar - br).unsigned_abs() as u8
}

impl fmt::Display for Square {
    /// Renders as `"<file><rank>"`, e.g. `"e4"`. Never emits `"-"` for a
    /// valid square; `NO_SQUARE` renders as `"-"`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_okay() {
            return write!(f, "-");
        }
        let file = (b'a' + (self.0 & 0b111)) as char;
        let rank = (b'1' + (self.0 >> 3)) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}
