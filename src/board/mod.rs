//! `Position`: a mailbox plus parallel bitboards, mutated only through
//! `put_piece`/`remove_piece`/`move_piece` and the higher-level `do_move`/
//! `undo_move`, which compose those primitives with incremental Zobrist
//! hash maintenance and a preallocated chain of [`StateInfo`] snapshots.

pub mod castle_rights;
pub mod fen;
pub mod state_info;

use std::fmt;

use crate::core::bitboard::BitBoard;
use crate::core::masks::{CASTLING_RIGHTS_NB, HISTORY_MARGIN, MAX_GAME_LENGTH, PIECE_CNT};
use crate::core::piece_move::Move;
use crate::core::sq::{Square, NO_SQUARE};
use crate::core::{Color, File, Piece, PieceType, NO_PIECE};
use crate::helper::{boards, magic, zobrist};

pub use castle_rights::{CastleSide, Castling};
pub use state_info::{Repetition, StateInfo};

const HISTORY_CAPACITY: usize = MAX_GAME_LENGTH + HISTORY_MARGIN;

/// The board: mailbox, parallel bitboards, piece counts, castling
/// geometry, and a preallocated chain of per-ply snapshots.
#[derive(Clone)]
pub struct Position {
    board: [Piece; 64],
    /// Indexed by `PieceType as usize`; slot 0 is the all-pieces union,
    /// slots 1..=6 are Pawn..King, slot 7 is unused.
    piece_bb: [BitBoard; 8],
    color_bb: [BitBoard; 2],
    piece_count: [u8; PIECE_CNT],

    castling_rights_mask: [u8; 64],
    /// Indexed by a single castling-right bit value (1, 2, 4, or 8); other
    /// indices are unused.
    castling_rook_square: [Square; CASTLING_RIGHTS_NB],
    castling_path: [BitBoard; CASTLING_RIGHTS_NB],

    history: Vec<StateInfo>,
}

impl Position {
    /// An empty board, White to move, with standard castling corner
    /// geometry preloaded (meaningful only once the corresponding rights
    /// are actually granted by a FEN or by piece placement).
    pub fn blank() -> Position {
        let mut pos = Position {
            board: [NO_PIECE; 64],
            piece_bb: [BitBoard::EMPTY; 8],
            color_bb: [BitBoard::EMPTY; 2],
            piece_count: [0; PIECE_CNT],
            castling_rights_mask: [0; 64],
            castling_rook_square: [NO_SQUARE; CASTLING_RIGHTS_NB],
            castling_path: [BitBoard::EMPTY; CASTLING_RIGHTS_NB],
            history: Vec::with_capacity(HISTORY_CAPACITY),
        };
        pos.init_castling_geometry();
        pos.history.push(StateInfo::blank());
        pos
    }

    /// The standard chess starting position.
    pub fn start_pos() -> Position {
        fen::parse(fen::START_FEN).expect("the starting position FEN is well-formed")
    }

    /// Parses a full six-field FEN string. See [`fen::parse`] for the
    /// grammar and the typed errors it can return.
    pub fn from_fen(fen_str: &str) -> Result<Position, crate::error::FenError> {
        fen::parse(fen_str)
    }

    /// Renders the position as a full six-field FEN string.
    pub fn fen(&self) -> String {
        fen::to_fen(self)
    }

    /// The pieces of the opponent of the side to move that currently give
    /// check to the side-to-move's king.
    #[inline]
    pub fn checkers(&self) -> BitBoard {
        self.current().checkers_bb
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers().is_not_empty()
    }

    /// Whether the current position has occurred at least three times,
    /// per `repetition` chaining to a second hit within the fifty-move
    /// window (see spec §3's `StateInfo::repetition`).
    pub fn is_threefold_repetition(&self) -> bool {
        match self.current().repetition {
            Repetition::Ancestor(steps_back) => {
                let ancestor_idx = self.ply() - steps_back as usize;
                matches!(self.history[ancestor_idx].repetition, Repetition::Ancestor(_))
            }
            Repetition::None => false,
        }
    }

    fn init_castling_geometry(&mut self) {
        for sq in 0..64u8 {
            self.castling_rights_mask[sq as usize] = Castling::rights_lost_at(Square(sq)).bits();
        }
        self.castling_rook_square[Castling::WHITE_K.bits() as usize] = Square::H1;
        self.castling_rook_square[Castling::WHITE_Q.bits() as usize] = Square::A1;
        self.castling_rook_square[Castling::BLACK_K.bits() as usize] = Square::H8;
        self.castling_rook_square[Castling::BLACK_Q.bits() as usize] = Square::A8;

        self.castling_path[Castling::WHITE_K.bits() as usize] =
            Square::F1.to_bb() | Square::G1.to_bb();
        self.castling_path[Castling::WHITE_Q.bits() as usize] =
            Square(1).to_bb() | Square(2).to_bb() | Square(3).to_bb();
        self.castling_path[Castling::BLACK_K.bits() as usize] =
            Square::F8.to_bb() | Square::G8.to_bb();
        self.castling_path[Castling::BLACK_Q.bits() as usize] =
            Square(57).to_bb() | Square::C8.to_bb() | Square::D8.to_bb();
    }

    #[inline]
    pub fn current(&self) -> &StateInfo {
        self.history.last().expect("history is never empty")
    }

    #[inline]
    fn current_mut(&mut self) -> &mut StateInfo {
        self.history.last_mut().expect("history is never empty")
    }

    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len() - 1
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board[sq.0 as usize]
    }

    #[inline]
    pub fn occupied(&self) -> BitBoard {
        self.piece_bb[0]
    }

    #[inline]
    pub fn pieces(&self, pt: PieceType) -> BitBoard {
        self.piece_bb[pt as usize]
    }

    #[inline]
    pub fn color_pieces(&self, color: Color) -> BitBoard {
        self.color_bb[color as usize]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, pt: PieceType) -> BitBoard {
        self.piece_bb[pt as usize] & self.color_bb[color as usize]
    }

    #[inline]
    pub fn piece_count(&self, piece: Piece) -> u8 {
        self.piece_count[piece.0 as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color, PieceType::King).lsb()
    }

    #[inline]
    pub fn active_color(&self) -> Color {
        self.current().active_color
    }

    /// Recomputes `material_key` from scratch off `piece_count`: the XOR of
    /// `zobrist::material_term(piece, i)` for every `i` in `0..count`, for
    /// every piece that has at least one copy on the board. Used once at
    /// construction time (blank board, FEN parsing); `do_move` maintains the
    /// key incrementally afterwards.
    pub(crate) fn compute_material_key(&self) -> u64 {
        let mut key = 0u64;
        for &color in &crate::core::ALL_COLORS {
            for &pt in &crate::core::ALL_PIECE_TYPES {
                let piece = Piece::make(color, pt);
                for i in 0..self.piece_count(piece) {
                    key ^= zobrist::material_term(piece, i);
                }
            }
        }
        key
    }

    // ---- primitive mutations -------------------------------------------

    /// Places `piece` on `sq`. Requires the square to be empty.
    pub fn put_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.board[sq.0 as usize].is_none());
        let bb = sq.to_bb();
        self.board[sq.0 as usize] = piece;
        self.piece_bb[0] |= bb;
        self.piece_bb[piece.piece_type() as usize] |= bb;
        self.color_bb[piece.color() as usize] |= bb;
        self.piece_count[piece.0 as usize] += 1;
    }

    /// Removes and returns whatever piece sits on `sq`. Requires the
    /// square to be occupied.
    pub fn remove_piece(&mut self, sq: Square) -> Piece {
        let piece = self.board[sq.0 as usize];
        debug_assert!(!piece.is_none());
        let bb = sq.to_bb();
        self.board[sq.0 as usize] = NO_PIECE;
        self.piece_bb[0] &= !bb;
        self.piece_bb[piece.piece_type() as usize] &= !bb;
        self.color_bb[piece.color() as usize] &= !bb;
        self.piece_count[piece.0 as usize] -= 1;
        piece
    }

    /// Moves whatever piece sits on `from` to `to` with a single XOR across
    /// every bitboard it belongs to. Requires `from` occupied and `to`
    /// empty.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.board[from.0 as usize];
        debug_assert!(!piece.is_none());
        debug_assert!(self.board[to.0 as usize].is_none());
        let from_to = from.to_bb() | to.to_bb();
        self.piece_bb[0] ^= from_to;
        self.piece_bb[piece.piece_type() as usize] ^= from_to;
        self.color_bb[piece.color() as usize] ^= from_to;
        self.board[from.0 as usize] = NO_PIECE;
        self.board[to.0 as usize] = piece;
    }

    // ---- attack queries --------------------------------------------------

    #[inline]
    pub fn attacks_of(&self, pt: PieceType, sq: Square, occupied: BitBoard) -> BitBoard {
        match pt {
            PieceType::Rook => magic::rook_attacks(occupied, sq),
            PieceType::Bishop => magic::bishop_attacks(occupied, sq),
            PieceType::Queen => magic::queen_attacks(occupied, sq),
            PieceType::Knight | PieceType::King => boards::pseudo_attacks(pt, sq),
            _ => BitBoard::EMPTY,
        }
    }

    /// Every enemy (of `color`) piece attacking `sq` under the board's
    /// actual current occupancy.
    pub fn attackers_to(&self, sq: Square, color: Color, occupied: BitBoard) -> BitBoard {
        let enemy = self.color_bb[color.other() as usize];
        let pawn_attackers =
            boards::pawn_attacks(color, sq) & self.piece_bb[PieceType::Pawn as usize];
        let knight_attackers =
            boards::pseudo_attacks(PieceType::Knight, sq) & self.piece_bb[PieceType::Knight as usize];
        let king_attackers =
            boards::pseudo_attacks(PieceType::King, sq) & self.piece_bb[PieceType::King as usize];
        let bishop_attackers = magic::bishop_attacks(occupied, sq)
            & (self.piece_bb[PieceType::Bishop as usize] | self.piece_bb[PieceType::Queen as usize]);
        let rook_attackers = magic::rook_attacks(occupied, sq)
            & (self.piece_bb[PieceType::Rook as usize] | self.piece_bb[PieceType::Queen as usize]);
        (pawn_attackers | knight_attackers | king_attackers | bishop_attackers | rook_attackers)
            & enemy
    }

    /// Recomputes `checkers_bb`, `blockers_for_king`, and `pinners` for both
    /// colors against their own king, as described in spec §4.5.
    fn recompute_checks_and_pins(&mut self) {
        let occupied = self.occupied();
        let mut blockers = [BitBoard::EMPTY; 2];
        let mut pinners = [BitBoard::EMPTY; 2];

        for &color in &crate::core::ALL_COLORS {
            let king_sq = self.king_square(color);
            let enemy = self.color_bb[color.other() as usize];
            let enemy_sliders = (self.piece_bb[PieceType::Bishop as usize]
                | self.piece_bb[PieceType::Rook as usize]
                | self.piece_bb[PieceType::Queen as usize])
                & enemy;

            let mut candidate_pinners = BitBoard::EMPTY;
            for slider in enemy_sliders.iter() {
                let reaches = boards::pseudo_attacks(self.piece_at(slider).piece_type(), king_sq);
                if !reaches.test(slider) {
                    continue;
                }
                let between = boards::between(slider, king_sq);
                let occupants = between & occupied;
                if occupants.popcount() == 1 && (occupants & self.color_bb[color as usize]).is_not_empty()
                {
                    blockers[color as usize] |= occupants;
                    candidate_pinners |= slider.to_bb();
                }
            }
            pinners[color as usize] = candidate_pinners;
        }

        let active = self.active_color();
        let king_sq = self.king_square(active);
        let checkers = self.attackers_to(king_sq, active, occupied);

        let state = self.current_mut();
        state.checkers_bb = checkers;
        state.blockers_for_king = blockers;
        state.pinners = pinners;
    }

    // ---- do_move / undo_move ---------------------------------------------

    /// Applies `m`, pushing a new `StateInfo` snapshot. See spec §4.5 for
    /// the eleven-step sequence this follows. Castling moves encode `to` as
    /// the rook's own square (king-takes-rook), matching `Move`'s layout.
    pub fn do_move(&mut self, m: Move) {
        debug_assert!(self.history.len() < self.history.capacity());
        let from = m.from_sq();
        let to = m.to_sq();
        let moving_piece = self.piece_at(from);
        debug_assert!(!moving_piece.is_none());
        // Step 8 flips *this*, the side whose turn it was -- not the moved
        // piece's color, which only agrees with it for in-turn play.
        let us = self.current().active_color;
        let them = us.other();
        let is_pawn_move = moving_piece.piece_type() == PieceType::Pawn;

        // Step 1: push forward-carried state.
        let mut state = self.current().clone();
        state.previous = Some(self.ply());
        state.captured_piece = NO_PIECE;

        let mut key = state.position_key ^ zobrist::side();
        let mut pawn_key = state.pawn_key;
        let mut material_key = state.material_key;

        if m.is_castling() {
            // Steps 2-4: no capture; king and rook both relocate.
            let rook_from = to;
            let rook = self.remove_piece(rook_from);
            let (king_to, rook_to) = castling_destinations(from, to);
            self.move_piece(from, king_to);
            self.put_piece(rook, rook_to);
            key ^= zobrist::piece_square(from, moving_piece);
            key ^= zobrist::piece_square(king_to, moving_piece);
            key ^= zobrist::piece_square(rook_from, rook);
            key ^= zobrist::piece_square(rook_to, rook);
        } else {
            // Step 2: captures.
            if m.is_en_passant() {
                let captured_sq = Square::make_square(to.file(), from.rank());
                let captured = self.remove_piece(captured_sq);
                key ^= zobrist::piece_square(captured_sq, captured);
                pawn_key ^= zobrist::piece_square(captured_sq, captured);
                material_key ^= zobrist::material_term(captured, self.piece_count(captured));
                state.captured_piece = captured;
            } else if !self.piece_at(to).is_none() {
                let captured = self.remove_piece(to);
                key ^= zobrist::piece_square(to, captured);
                material_key ^= zobrist::material_term(captured, self.piece_count(captured));
                if captured.piece_type() == PieceType::Pawn {
                    pawn_key ^= zobrist::piece_square(to, captured);
                } else {
                    state.non_pawn_material[captured.color() as usize] -=
                        captured.piece_type().value();
                }
                state.captured_piece = captured;
            }

            // Step 3: move the piece (or replace it with a promoted piece).
            key ^= zobrist::piece_square(from, moving_piece);
            if m.is_promotion() {
                self.remove_piece(from);
                material_key ^= zobrist::material_term(moving_piece, self.piece_count(moving_piece));
                let promoted = Piece::make(us, m.promotion_piece());
                self.put_piece(promoted, to);
                material_key ^= zobrist::material_term(promoted, self.piece_count(promoted) - 1);
                key ^= zobrist::piece_square(to, promoted);
                pawn_key ^= zobrist::piece_square(from, moving_piece);
                state.non_pawn_material[us as usize] += promoted.piece_type().value();
            } else {
                self.move_piece(from, to);
                key ^= zobrist::piece_square(to, moving_piece);
                if is_pawn_move {
                    pawn_key ^= zobrist::piece_square(from, moving_piece);
                    pawn_key ^= zobrist::piece_square(to, moving_piece);
                }
            }
        }

        // Step 5: halfmove clock.
        if is_pawn_move || state.captured_piece != NO_PIECE {
            state.halfmove_clock = 0;
        } else {
            state.halfmove_clock += 1;
        }

        // Step 6: en-passant square.
        let old_ep = state.ep_square;
        if old_ep != NO_SQUARE {
            key ^= zobrist::en_passant(old_ep);
        }
        let mut new_ep = NO_SQUARE;
        if is_pawn_move && !m.is_castling() {
            let from_rank = from.rank() as i8;
            let to_rank = to.rank() as i8;
            if (to_rank - from_rank).abs() == 2 {
                let skipped = Square::make_square(from.file(), rank_between(from.rank(), to.rank()));
                let enemy_pawn_adjacent =
                    boards::pawn_attacks(us, skipped) & self.pieces_of(them, PieceType::Pawn);
                if enemy_pawn_adjacent.is_not_empty() {
                    new_ep = skipped;
                }
            }
        }
        if new_ep != NO_SQUARE {
            key ^= zobrist::en_passant(new_ep);
        }
        state.ep_square = new_ep;

        // Step 7: castling rights, masked by whatever `from`/`to` forfeit.
        let old_rights = state.castling_rights;
        state.castling_rights.update(from, to);
        if old_rights != state.castling_rights {
            key ^= zobrist::castling(old_rights.bits());
            key ^= zobrist::castling(state.castling_rights.bits());
        }

        // Step 8: flip side to move (toggle the stored side, not derive it
        // from the moved piece's color).
        state.active_color = state.active_color.other();
        if us == Color::Black {
            state.fullmove_number += 1;
        }

        state.position_key = key;
        state.material_key = material_key;
        state.pawn_key = if self.piece_bb[PieceType::Pawn as usize].is_empty() {
            pawn_key ^ zobrist::no_pawns()
        } else {
            pawn_key
        };

        self.history.push(state);

        // Step 9: checkers/blockers/pinners for the new side to move.
        self.recompute_checks_and_pins();

        // Step 11: repetition detection.
        self.detect_repetition();
    }

    /// Reverses the most recent `do_move`. Requires that `m` is the move
    /// that produced the current state.
    pub fn undo_move(&mut self, m: Move) {
        debug_assert!(self.ply() > 0, "undo_move called with no prior do_move");
        let state = self.history.pop().expect("history is never empty");
        let from = m.from_sq();
        let to = m.to_sq();
        let us = state.active_color.other();

        if m.is_castling() {
            let rook_from = to;
            let (king_to, rook_to) = castling_destinations(from, to);
            let rook = self.remove_piece(rook_to);
            self.move_piece(king_to, from);
            self.put_piece(rook, rook_from);
            return;
        }

        if m.is_promotion() {
            self.remove_piece(to);
            self.put_piece(Piece::make(us, PieceType::Pawn), from);
        } else {
            self.move_piece(to, from);
        }

        if m.is_en_passant() {
            let captured_sq = Square::make_square(to.file(), from.rank());
            self.put_piece(state.captured_piece, captured_sq);
        } else if state.captured_piece != NO_PIECE {
            self.put_piece(state.captured_piece, to);
        }
    }

    fn detect_repetition(&mut self) {
        let current_key = self.current().position_key;
        let halfmove_clock = self.current().halfmove_clock;
        let mut steps_back = 2usize;
        let mut found = Repetition::None;
        while steps_back <= halfmove_clock as usize && steps_back <= self.ply() {
            let idx = self.ply() - steps_back;
            if self.history[idx].position_key == current_key {
                found = Repetition::Ancestor(steps_back as u16);
                break;
            }
            steps_back += 2;
        }
        self.current_mut().repetition = found;
    }
}

/// The king's and rook's destination squares for a castling move, given the
/// king's origin and the move's `to` square (the rook's own square, per
/// `Move`'s king-takes-rook castling encoding).
fn castling_destinations(king_from: Square, rook_from: Square) -> (Square, Square) {
    let king_side = rook_from.file() as u8 > king_from.file() as u8;
    let rank = king_from.rank();
    let king_to = Square::make_square(if king_side { File::G } else { File::C }, rank);
    let rook_to = Square::make_square(if king_side { File::F } else { File::D }, rank);
    (king_to, rook_to)
}

/// The rank strictly between two ranks two apart (the rank a two-square
/// pawn push skips over).
fn rank_between(r1: crate::core::Rank, r2: crate::core::Rank) -> crate::core::Rank {
    let mid = ((r1 as u8) + (r2 as u8)) / 2;
    crate::core::Rank::from_index(mid)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  +------------------------+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                let sq = Square((rank * 8 + file) as u8);
                write!(f, " {} ", self.piece_at(sq))?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +------------------------+")?;
        writeln!(f, "    a  b  c  d  e  f  g  h")?;
        write!(
            f,
            "{} to move, castling {}, ep {}",
            self.active_color(),
            self.current().castling_rights,
            self.current().ep_square
        )
    }
}
