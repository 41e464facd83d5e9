//! Geometry tables: distance, line-between/-through, and pseudo-attacks.
//!
//! Everything here is built once by [`init`] and is immutable afterwards;
//! accessors read from a [`OnceLock`]-guarded table rather than the raw
//! `static mut` pointers the table-building algorithm was originally
//! grounded on, since a `&'static` reference into a one-shot cell gives the
//! same "safely shareable across search threads" guarantee without unsound
//! mutable statics.

use std::sync::OnceLock;

use crate::core::bitboard::BitBoard;
use crate::core::sq::Square;
use crate::core::{Color, Direction, PieceType, ALL_COLORS};
use crate::core::{EAST, NORTH, NORTH_EAST, NORTH_WEST, SOUTH, SOUTH_EAST, SOUTH_WEST, WEST};

const KNIGHT_DELTAS: [Direction; 8] = [17, 15, 10, 6, -17, -15, -10, -6];
const KING_DELTAS: [Direction; 8] = [9, 8, 7, 1, -9, -8, -7, -1];
const ROOK_DELTAS: [Direction; 4] = [NORTH, SOUTH, EAST, WEST];
const BISHOP_DELTAS: [Direction; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];

/// Returns the destination bitboard (a single bit) of stepping `step` from
/// `sq`, or an empty bitboard if that step would leave the board -- either
/// by raw index or by wrapping around a file edge. The Chebyshev-distance
/// check is what catches file wrap-around (e.g. h-file to a-file).
#[inline]
pub fn inside_board(sq: Square, step: Direction) -> BitBoard {
    let dest = sq.0 as i16 + step as i16;
    if !(0..64).contains(&dest) {
        return BitBoard::EMPTY;
    }
    let dest_sq = Square(dest as u8);
    if sq.distance(dest_sq) <= 2 {
        dest_sq.to_bb()
    } else {
        BitBoard::EMPTY
    }
}

/// Walks from `sq` along each of `deltas`, stopping (inclusively) at the
/// first occupied square in `occupied`. With `occupied` empty this is the
/// pseudo-attack set on an otherwise empty board; with a real occupancy
/// bitboard this is the slow reference slider-attack generator the magic
/// tables are verified against.
pub fn sliding_attack(sq: Square, deltas: &[Direction], occupied: BitBoard) -> BitBoard {
    let mut attacks = BitBoard::EMPTY;
    for &delta in deltas {
        let mut cur = sq;
        loop {
            let step = inside_board(cur, delta);
            if step.is_empty() {
                break;
            }
            let next = step.lsb();
            attacks |= step;
            if occupied.test(next) {
                break;
            }
            cur = next;
        }
    }
    attacks
}

/// One of the eight ray directions two aligned squares can share.
fn direction_between(s1: Square, s2: Square) -> Option<Direction> {
    if s1 == s2 {
        return None;
    }
    let f1 = s1.file() as i8;
    let f2 = s2.file() as i8;
    let r1 = s1.rank() as i8;
    let r2 = s2.rank() as i8;
    let df = f2 - f1;
    let dr = r2 - r1;
    if df == 0 {
        Some(if dr > 0 { NORTH } else { SOUTH })
    } else if dr == 0 {
        Some(if df > 0 { EAST } else { WEST })
    } else if df.abs() == dr.abs() {
        Some(match (df > 0, dr > 0) {
            (true, true) => NORTH_EAST,
            (true, false) => SOUTH_EAST,
            (false, true) => NORTH_WEST,
            (false, false) => SOUTH_WEST,
        })
    } else {
        None
    }
}

/// All precomputed, startup-built geometry tables.
pub struct Geometry {
    distance: Box<[[u8; 64]; 64]>,
    between: Box<[[BitBoard; 64]; 64]>,
    through: Box<[[BitBoard; 64]; 64]>,
    /// Indexed by `PieceType as usize`; only Pawn..King (1..=6) are filled.
    pseudo_attacks: Box<[[BitBoard; 64]; 8]>,
    pawn_attacks: Box<[[BitBoard; 64]; 2]>,
}

static GEOMETRY: OnceLock<Geometry> = OnceLock::new();

/// Builds the geometry tables. Idempotent: later calls are no-ops.
#[cold]
pub fn init() {
    GEOMETRY.get_or_init(build);
}

fn tables() -> &'static Geometry {
    GEOMETRY
        .get()
        .expect("geometry tables read before helper::boards::init() was called")
}

fn build() -> Geometry {
    tracing::debug!("building geometry tables");
    let mut distance = Box::new([[0u8; 64]; 64]);
    for i in 0..64u8 {
        for j in 0..64u8 {
            distance[i as usize][j as usize] = Square(i).distance(Square(j));
        }
    }

    let mut between = Box::new([[BitBoard::EMPTY; 64]; 64]);
    let mut through = Box::new([[BitBoard::EMPTY; 64]; 64]);
    for i in 0..64u8 {
        let s1 = Square(i);
        for j in 0..64u8 {
            let s2 = Square(j);
            if s1 == s2 {
                through[i as usize][j as usize] = s1.to_bb();
                continue;
            }
            match direction_between(s1, s2) {
                None => {
                    between[i as usize][j as usize] = s2.to_bb();
                    through[i as usize][j as usize] = s1.to_bb();
                }
                Some(dir) => {
                    let mut bb = BitBoard::EMPTY;
                    let mut cur = s1;
                    loop {
                        let step = inside_board(cur, dir);
                        if step.is_empty() {
                            break;
                        }
                        let next = step.lsb();
                        if next == s2 {
                            break;
                        }
                        bb |= step;
                        cur = next;
                    }
                    between[i as usize][j as usize] = bb;

                    let mut line = s1.to_bb();
                    let mut cur = s1;
                    loop {
                        let step = inside_board(cur, dir);
                        if step.is_empty() {
                            break;
                        }
                        line |= step;
                        cur = step.lsb();
                    }
                    let opp = -dir;
                    let mut cur = s1;
                    loop {
                        let step = inside_board(cur, opp);
                        if step.is_empty() {
                            break;
                        }
                        line |= step;
                        cur = step.lsb();
                    }
                    through[i as usize][j as usize] = line;
                }
            }
        }
    }

    let mut pseudo_attacks = Box::new([[BitBoard::EMPTY; 64]; 8]);
    let mut pawn_attacks = Box::new([[BitBoard::EMPTY; 64]; 2]);
    for i in 0..64u8 {
        let sq = Square(i);
        let rook = sliding_attack(sq, &ROOK_DELTAS, BitBoard::EMPTY);
        let bishop = sliding_attack(sq, &BISHOP_DELTAS, BitBoard::EMPTY);
        pseudo_attacks[PieceType::Rook as usize][i as usize] = rook;
        pseudo_attacks[PieceType::Bishop as usize][i as usize] = bishop;
        pseudo_attacks[PieceType::Queen as usize][i as usize] = rook | bishop;

        let mut knight = BitBoard::EMPTY;
        for &d in &KNIGHT_DELTAS {
            knight |= inside_board(sq, d);
        }
        pseudo_attacks[PieceType::Knight as usize][i as usize] = knight;

        let mut king = BitBoard::EMPTY;
        for &d in &KING_DELTAS {
            king |= inside_board(sq, d);
        }
        pseudo_attacks[PieceType::King as usize][i as usize] = king;

        for &color in &ALL_COLORS {
            let deltas: [Direction; 2] = match color {
                Color::White => [NORTH_EAST, NORTH_WEST],
                Color::Black => [SOUTH_EAST, SOUTH_WEST],
            };
            let mut bb = BitBoard::EMPTY;
            for &d in &deltas {
                bb |= inside_board(sq, d);
            }
            pawn_attacks[color as usize][i as usize] = bb;
        }
    }

    tracing::debug!("geometry tables built");
    Geometry {
        distance,
        between,
        through,
        pseudo_attacks,
        pawn_attacks,
    }
}

#[inline(always)]
pub fn distance(s1: Square, s2: Square) -> u8 {
    tables().distance[s1.0 as usize][s2.0 as usize]
}

#[inline(always)]
pub fn between(s1: Square, s2: Square) -> BitBoard {
    tables().between[s1.0 as usize][s2.0 as usize]
}

#[inline(always)]
pub fn through(s1: Square, s2: Square) -> BitBoard {
    tables().through[s1.0 as usize][s2.0 as usize]
}

#[inline(always)]
pub fn pseudo_attacks(pt: PieceType, sq: Square) -> BitBoard {
    tables().pseudo_attacks[pt as usize][sq.0 as usize]
}

#[inline(always)]
pub fn pawn_attacks(color: Color, sq: Square) -> BitBoard {
    tables().pawn_attacks[color as usize][sq.0 as usize]
}

/// Whether `s1`, `s2`, and `s3` are collinear (share a rook or bishop line).
#[inline(always)]
pub fn aligned(s1: Square, s2: Square, s3: Square) -> bool {
    through(s1, s2).test(s3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sq::Square;

    fn ensure_init() {
        init();
    }

    #[test]
    fn corner_king_moves() {
        ensure_init();
        let attacks = pseudo_attacks(PieceType::King, Square::A1);
        assert_eq!(attacks.popcount(), 3);
        for s in ["a2", "b1", "b2"] {
            assert!(attacks.test(Square::from_str(s)));
        }
    }

    #[test]
    fn center_knight_moves() {
        ensure_init();
        let e4 = Square::from_str("e4");
        let attacks = pseudo_attacks(PieceType::Knight, e4);
        assert_eq!(attacks.popcount(), 8);
        for s in ["c3", "c5", "d2", "d6", "f2", "f6", "g3", "g5"] {
            assert!(attacks.test(Square::from_str(s)), "missing {}", s);
        }
    }

    #[test]
    fn rook_from_c3_empty_board() {
        ensure_init();
        let c3 = Square::from_str("c3");
        assert_eq!(pseudo_attacks(PieceType::Rook, c3).popcount(), 14);
    }

    #[test]
    fn queen_is_rook_union_bishop() {
        ensure_init();
        for i in 0..64u8 {
            let sq = Square(i);
            let queen = pseudo_attacks(PieceType::Queen, sq);
            let union = pseudo_attacks(PieceType::Rook, sq) | pseudo_attacks(PieceType::Bishop, sq);
            assert_eq!(queen, union);
        }
    }

    #[test]
    fn between_and_through_specifics() {
        ensure_init();
        let a1 = Square::from_str("a1");
        let c3 = Square::from_str("c3");
        let c8 = Square::from_str("c8");
        let a5 = Square::from_str("a5");
        let b2 = Square::from_str("b2");

        assert_eq!(between(a1, c3), b2.to_bb());
        assert_eq!(through(a1, a5).0, crate::core::masks::FILE_A);
        assert_eq!(between(a1, c8), c8.to_bb());
        assert_eq!(through(a1, a1), a1.to_bb());
        assert!(between(a1, a1).is_empty());
    }

    #[test]
    fn between_subset_of_through_when_aligned() {
        ensure_init();
        for i in 0..64u8 {
            for j in 0..64u8 {
                if i == j {
                    continue;
                }
                let (s1, s2) = (Square(i), Square(j));
                if direction_between(s1, s2).is_some() {
                    let b = between(s1, s2);
                    let t = through(s1, s2);
                    assert_eq!(b & t, b, "between not subset of through for {i} {j}");
                }
            }
        }
    }

    #[test]
    fn inside_board_matches_definition() {
        for sq in 0..64u8 {
            for step in [-17i8, -15, -10, -9, -8, -7, -6, -1, 1, 6, 7, 8, 9, 10, 15, 17] {
                let raw = sq as i16 + step as i16;
                let expect_nonzero =
                    (0..64).contains(&raw) && Square(sq).distance(Square(raw as u8)) <= 2;
                let got = inside_board(Square(sq), step);
                assert_eq!(got.is_not_empty(), expect_nonzero);
            }
        }
    }
}
