//! Multi-ply `do_move`/`undo_move` sequences: captures, castling, promotion,
//! and en passant, each checked for exact board-state and hash-key recovery
//! when unwound in LIFO order.

use castellan::core::piece_move::MoveKind;
use castellan::{Color, Move, Piece, PieceType, Position, Square};

fn ensure_tables() {
    castellan::helper::init().expect("table init should succeed");
}

/// Plays every move in `moves` in order, then undoes them in reverse,
/// asserting that the position's three hash keys and FEN are restored
/// exactly at every step of the unwind -- not just at the very end.
fn play_then_unwind(start_fen: &str, moves: &[Move]) {
    let mut pos = Position::from_fen(start_fen).unwrap();
    let mut snapshots = vec![(
        pos.current().position_key,
        pos.current().material_key,
        pos.current().pawn_key,
        pos.fen(),
    )];

    for &m in moves {
        pos.do_move(m);
        snapshots.push((
            pos.current().position_key,
            pos.current().material_key,
            pos.current().pawn_key,
            pos.fen(),
        ));
    }

    for &m in moves.iter().rev() {
        pos.undo_move(m);
        let expected = snapshots.pop().unwrap();
        let _ = expected;
        let back_to = snapshots.last().unwrap();
        assert_eq!(pos.current().position_key, back_to.0);
        assert_eq!(pos.current().material_key, back_to.1);
        assert_eq!(pos.current().pawn_key, back_to.2);
        assert_eq!(pos.fen(), back_to.3);
    }
}

#[test]
fn opening_sequence_with_capture_unwinds_cleanly() {
    ensure_tables();
    let moves = [
        Move::new_normal(Square::from_str("e2"), Square::from_str("e4")),
        Move::new_normal(Square::from_str("d7"), Square::from_str("d5")),
        Move::new_normal(Square::from_str("e4"), Square::from_str("d5")),
        Move::new_normal(Square::from_str("d8"), Square::from_str("d5")),
        Move::new_normal(Square::from_str("b1"), Square::from_str("c3")),
    ];
    play_then_unwind(castellan::board::fen::START_FEN, &moves);
}

#[test]
fn en_passant_capture_unwinds_cleanly() {
    ensure_tables();
    let moves = [
        Move::new_normal(Square::from_str("e2"), Square::from_str("e4")),
        Move::new_normal(Square::from_str("a7"), Square::from_str("a6")),
        Move::new_normal(Square::from_str("e4"), Square::from_str("e5")),
        Move::new_normal(Square::from_str("d7"), Square::from_str("d5")),
        Move::new_special(
            Square::from_str("e5"),
            Square::from_str("d6"),
            MoveKind::EnPassant,
            None,
        ),
    ];
    play_then_unwind(castellan::board::fen::START_FEN, &moves);
}

#[test]
fn en_passant_capture_removes_and_restores_the_captured_pawn() {
    ensure_tables();
    let mut pos = Position::from_fen(
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    )
    .unwrap();
    let captured_sq = Square::from_str("f5");
    let ep_capture =
        Move::new_special(Square::from_str("e5"), Square::from_str("f6"), MoveKind::EnPassant, None);

    assert_eq!(pos.piece_at(captured_sq).piece_type(), PieceType::Pawn);
    pos.do_move(ep_capture);
    assert!(pos.piece_at(captured_sq).is_none());
    assert_eq!(pos.piece_at(Square::from_str("f6")).piece_type(), PieceType::Pawn);
    assert!(pos.piece_at(Square::from_str("e5")).is_none());

    pos.undo_move(ep_capture);
    assert_eq!(pos.piece_at(captured_sq).color(), Color::Black);
    assert_eq!(pos.piece_at(Square::from_str("e5")).piece_type(), PieceType::Pawn);
    assert!(pos.piece_at(Square::from_str("f6")).is_none());
}

#[test]
fn promotion_to_queen_unwinds_cleanly() {
    ensure_tables();
    // White pawn one step from promoting, nothing else on the board besides
    // both kings.
    let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let promote = Move::new_special(
        Square::from_str("a7"),
        Square::from_str("a8"),
        MoveKind::Promotion,
        Some(PieceType::Queen),
    );
    let before_fen = pos.fen();
    let before_key = pos.current().position_key;

    pos.do_move(promote);
    assert_eq!(
        pos.piece_at(Square::from_str("a8")),
        Piece::make(Color::White, PieceType::Queen)
    );
    assert!(pos.piece_at(Square::from_str("a7")).is_none());
    assert_ne!(pos.current().position_key, before_key);

    pos.undo_move(promote);
    assert_eq!(pos.fen(), before_fen);
    assert_eq!(pos.current().position_key, before_key);
    assert_eq!(pos.piece_at(Square::from_str("a7")).piece_type(), PieceType::Pawn);
}

#[test]
fn capturing_promotion_unwinds_cleanly() {
    ensure_tables();
    let mut pos = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let capture_promote = Move::new_special(
        Square::from_str("a7"),
        Square::from_str("b8"),
        MoveKind::Promotion,
        Some(PieceType::Knight),
    );
    let before_fen = pos.fen();

    pos.do_move(capture_promote);
    assert_eq!(
        pos.piece_at(Square::from_str("b8")),
        Piece::make(Color::White, PieceType::Knight)
    );
    assert_eq!(pos.current().captured_piece.piece_type(), PieceType::Knight);

    pos.undo_move(capture_promote);
    assert_eq!(pos.fen(), before_fen);
    assert_eq!(
        pos.piece_at(Square::from_str("b8")),
        Piece::make(Color::Black, PieceType::Knight)
    );
}

#[test]
fn kingside_castle_unwinds_cleanly() {
    ensure_tables();
    let moves = [
        Move::new_normal(Square::from_str("g1"), Square::from_str("f3")),
        Move::new_normal(Square::from_str("g8"), Square::from_str("f6")),
        Move::new_normal(Square::from_str("e2"), Square::from_str("e3")),
        Move::new_normal(Square::from_str("e7"), Square::from_str("e6")),
        Move::new_normal(Square::from_str("f1"), Square::from_str("e2")),
        Move::new_normal(Square::from_str("f8"), Square::from_str("e7")),
        Move::new_special(Square::from_str("e1"), Square::from_str("h1"), MoveKind::Castling, None),
    ];
    play_then_unwind(castellan::board::fen::START_FEN, &moves);
}

#[test]
fn castling_forfeits_rights_and_undo_restores_them() {
    ensure_tables();
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before_rights = pos.current().castling_rights;
    let king_side = Move::new_special(Square::from_str("e1"), Square::from_str("h1"), MoveKind::Castling, None);

    pos.do_move(king_side);
    assert_eq!(
        pos.current().castling_rights,
        castellan::board::Castling::BLACK_ALL
    );

    pos.undo_move(king_side);
    // `undo_move` restores the board, but castling rights live on the
    // popped `StateInfo`, so the field naturally reverts along with it.
    assert_eq!(pos.current().castling_rights, before_rights);
}
