//! Forsyth-Edwards Notation (FEN): the six-field text encoding of a chess
//! position.
//!
//! Per spec, only the placement field and the side-to-move are strictly
//! "core" to the move-generation substrate, but a `Position` cannot satisfy
//! its own hash-key invariants unless the rest of the fields (castling
//! availability, en-passant target, halfmove clock, fullmove number) are
//! parsed too -- a `StateInfo` built from a partial FEN would have a wrong
//! `position_key` the moment a pawn two-square push or a rook move depended
//! on them. This module therefore parses the full grammar and builds the
//! `StateInfo` in one pass.

use crate::board::castle_rights::Castling;
use crate::board::state_info::StateInfo;
use crate::board::Position;
use crate::core::sq::{Square, NO_SQUARE};
use crate::core::{Color, File, Piece, PieceType, Rank};
use crate::error::FenError;
use crate::helper::zobrist;

/// The FEN of the standard chess starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A handful of well-known non-starting positions, used by this crate's own
/// test suite to exercise FEN round-tripping and move application beyond the
/// opening position.
pub static SAMPLE_FENS: [&str; 4] = [
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 10",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 11",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

/// Parses a full six-field FEN string into a `Position`, building a
/// from-scratch `StateInfo` (hash keys included) in the same pass so every
/// invariant in spec §3 holds immediately, not just after the first
/// `do_move`.
pub fn parse(fen: &str) -> Result<Position, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(FenError::WrongFieldCount(fields.len()));
    }

    let mut pos = Position::blank();
    parse_placement(&mut pos, fields[0])?;

    let active_color = parse_side(fields[1])?;
    let castling_rights = parse_castling(fields[2])?;
    let ep_square = parse_ep_square(fields[3], active_color)?;
    let halfmove_clock = parse_halfmove_clock(fields[4])?;
    let fullmove_number = parse_fullmove_number(fields[5])?;

    check_king_counts(&pos)?;

    let mut state = StateInfo::blank();
    state.active_color = active_color;
    state.castling_rights = castling_rights;
    state.ep_square = ep_square;
    state.halfmove_clock = halfmove_clock;
    state.fullmove_number = fullmove_number;
    state.non_pawn_material = non_pawn_material(&pos);
    state.material_key = pos.compute_material_key();
    let (position_key, pawn_key) = hash_from_scratch(&pos, &state);
    state.position_key = position_key;
    state.pawn_key = pawn_key;
    pos.history[0] = state;

    pos.recompute_checks_and_pins();
    check_opponent_not_in_check(&pos)?;

    Ok(pos)
}

fn parse_placement(pos: &mut Position, field: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount(ranks.len()));
    }
    // FEN lists rank 8 first; `Position`'s squares index rank 1 first.
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = Rank::from_index(7 - i as u8);
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(empties) = c.to_digit(10) {
                file += empties as u8;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::UnknownPieceChar(c))?;
            if file >= 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank as u8 + 1,
                    files: file as u32 + 1,
                });
            }
            let sq = Square::make_square(File::from_index(file), rank);
            pos.put_piece(piece, sq);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::WrongFileCount {
                rank: rank as u8 + 1,
                files: file as u32,
            });
        }
    }
    Ok(())
}

fn parse_side(field: &str) -> Result<Color, FenError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::BadSideToMove(field.to_owned())),
    }
}

fn parse_castling(field: &str) -> Result<Castling, FenError> {
    if field == "-" {
        return Ok(Castling::empty());
    }
    if field.is_empty() || field.len() > 4 {
        return Err(FenError::BadCastlingField(field.to_owned()));
    }
    let mut rights = Castling::empty();
    for c in field.chars() {
        if !matches!(c, 'K' | 'Q' | 'k' | 'q') {
            return Err(FenError::BadCastlingField(field.to_owned()));
        }
        rights.add_fen_char(c);
    }
    Ok(rights)
}

fn parse_ep_square(field: &str, active_color: Color) -> Result<Square, FenError> {
    if field == "-" {
        return Ok(NO_SQUARE);
    }
    let sq = Square::from_str(field);
    if !sq.is_okay() {
        return Err(FenError::BadEnPassantSquare(field.to_owned()));
    }
    // White to move => Black just pushed a pawn two squares => ep target on
    // rank 6; Black to move => target on rank 3.
    let expected_rank = match active_color {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    };
    if sq.rank() != expected_rank {
        return Err(FenError::BadEnPassantSquare(field.to_owned()));
    }
    Ok(sq)
}

fn parse_halfmove_clock(field: &str) -> Result<u16, FenError> {
    field
        .parse::<u16>()
        .map_err(|_| FenError::BadHalfmoveClock(field.to_owned()))
}

fn parse_fullmove_number(field: &str) -> Result<u16, FenError> {
    let n = field
        .parse::<u16>()
        .map_err(|_| FenError::BadFullmoveNumber(field.to_owned()))?;
    if n == 0 {
        return Err(FenError::BadFullmoveNumber(field.to_owned()));
    }
    Ok(n)
}

fn check_king_counts(pos: &Position) -> Result<(), FenError> {
    let white_kings = pos.piece_count(Piece::make(Color::White, PieceType::King));
    if white_kings != 1 {
        return Err(FenError::WrongWhiteKingCount(white_kings as u32));
    }
    let black_kings = pos.piece_count(Piece::make(Color::Black, PieceType::King));
    if black_kings != 1 {
        return Err(FenError::WrongBlackKingCount(black_kings as u32));
    }
    Ok(())
}

fn check_opponent_not_in_check(pos: &Position) -> Result<(), FenError> {
    let inactive = pos.active_color().other();
    let occ = pos.occupied();
    let king_sq = pos.king_square(inactive);
    if pos.attackers_to(king_sq, inactive, occ).is_not_empty() {
        return Err(FenError::OpponentInCheck);
    }
    Ok(())
}

fn non_pawn_material(pos: &Position) -> [i32; 2] {
    let mut total = [0i32; 2];
    for &color in &crate::core::ALL_COLORS {
        for &pt in &crate::core::ALL_PIECE_TYPES {
            if pt == PieceType::Pawn {
                continue;
            }
            total[color as usize] +=
                pt.value() * pos.piece_count(Piece::make(color, pt)) as i32;
        }
    }
    total
}

/// Computes `position_key`/`pawn_key` from scratch by folding every piece's
/// contribution plus side/castling/en-passant terms -- the same terms
/// `do_move` maintains incrementally, just summed once instead of XORed in
/// as a delta.
fn hash_from_scratch(pos: &Position, state: &StateInfo) -> (u64, u64) {
    let mut key = 0u64;
    let mut pawn_key = 0u64;
    for sq in 0..64u8 {
        let sq = Square(sq);
        let piece = pos.piece_at(sq);
        if piece.is_none() {
            continue;
        }
        key ^= zobrist::piece_square(sq, piece);
        if piece.piece_type() == PieceType::Pawn {
            pawn_key ^= zobrist::piece_square(sq, piece);
        }
    }
    if state.active_color == Color::Black {
        key ^= zobrist::side();
    }
    key ^= zobrist::castling(state.castling_rights.bits());
    if state.ep_square != NO_SQUARE {
        key ^= zobrist::en_passant(state.ep_square);
    }
    if pos.pieces(PieceType::Pawn).is_empty() {
        pawn_key ^= zobrist::no_pawns();
    }
    (key, pawn_key)
}

/// Renders `pos` as a full six-field FEN string, the exact inverse of
/// [`parse`] for every field it parses.
pub fn to_fen(pos: &Position) -> String {
    let mut out = String::with_capacity(64);
    for rank_idx in (0..8u8).rev() {
        let rank = Rank::from_index(rank_idx);
        let mut empties = 0u8;
        for file_idx in 0..8u8 {
            let sq = Square::make_square(File::from_index(file_idx), rank);
            let piece = pos.piece_at(sq);
            if piece.is_none() {
                empties += 1;
                continue;
            }
            if empties > 0 {
                out.push((b'0' + empties) as char);
                empties = 0;
            }
            out.push(piece.character_lossy());
        }
        if empties > 0 {
            out.push((b'0' + empties) as char);
        }
        if rank_idx > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(if pos.active_color() == Color::White { 'w' } else { 'b' });

    out.push(' ');
    out.push_str(&pos.current().castling_rights.pretty_string());

    out.push(' ');
    let ep = pos.current().ep_square;
    out.push_str(&fmt_square_or_dash(ep));

    out.push(' ');
    out.push_str(&pos.current().halfmove_clock.to_string());
    out.push(' ');
    out.push_str(&pos.current().fullmove_number.to_string());
    out
}

fn fmt_square_or_dash(sq: Square) -> String {
    if sq.is_okay() {
        sq.to_string()
    } else {
        "-".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_tables() {
        crate::helper::init().expect("table init should succeed");
    }

    #[test]
    fn start_fen_round_trips() {
        ensure_tables();
        let pos = parse(START_FEN).unwrap();
        assert_eq!(to_fen(&pos), START_FEN);
    }

    #[test]
    fn sample_fens_round_trip() {
        ensure_tables();
        for fen in SAMPLE_FENS.iter() {
            let pos = parse(fen).unwrap();
            assert_eq!(&to_fen(&pos), fen, "round trip mismatch for {fen}");
        }
    }

    #[test]
    fn wrong_field_count_is_typed_error() {
        ensure_tables();
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 w - -"),
            Err(FenError::WrongFieldCount(4))
        );
    }

    #[test]
    fn missing_king_is_typed_error() {
        ensure_tables();
        let err = parse("8/8/8/8/8/8/8/K7 w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::WrongBlackKingCount(0));
    }

    #[test]
    fn bad_piece_char_is_typed_error() {
        ensure_tables();
        let err = parse("8/8/8/8/8/8/8/KQ5x w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::UnknownPieceChar('x'));
    }

    #[test]
    fn ep_square_wrong_rank_is_rejected() {
        ensure_tables();
        let err = parse("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1").unwrap_err();
        assert_eq!(err, FenError::BadEnPassantSquare("e4".to_owned()));
    }

    #[test]
    fn opponent_in_check_is_rejected() {
        ensure_tables();
        // White king on e1 in check from a black rook on e8, Black to move:
        // this is White's problem to have resolved before handing the move
        // to Black, so the position as given (Black to move) is illegal.
        let err = parse("4r3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap_err();
        assert_eq!(err, FenError::OpponentInCheck);
    }
}
