//! Sliding-piece attack queries against a real `Position`'s occupancy,
//! exercised through the public `attacks_of`/`attackers_to` surface rather
//! than the magic tables directly.

use castellan::{BitBoard, Color, PieceType, Position, Square};

fn ensure_tables() {
    castellan::helper::init().expect("table init should succeed");
}

#[test]
fn bishop_attacks_stop_at_two_simultaneous_blockers() {
    ensure_tables();
    let pos = Position::blank();
    let occ = Square::from_str("c3").to_bb() | Square::from_str("f6").to_bb();
    let attacks = pos.attacks_of(PieceType::Bishop, Square::from_str("d4"), occ);
    for s in ["c3", "e5", "f6", "c5", "b6", "a7", "e3"] {
        assert!(attacks.test(Square::from_str(s)), "missing {s}");
    }
    for s in ["b2", "a1", "g7", "h8"] {
        assert!(!attacks.test(Square::from_str(s)), "unexpected {s}");
    }
}

#[test]
fn rook_attacks_from_corner_with_two_blockers_is_exact() {
    ensure_tables();
    let pos = Position::blank();
    let occ = Square::from_str("a3").to_bb() | Square::from_str("c1").to_bb();
    let attacks = pos.attacks_of(PieceType::Rook, Square::from_str("a1"), occ);
    let expect = Square::from_str("a2").to_bb()
        | Square::from_str("a3").to_bb()
        | Square::from_str("b1").to_bb()
        | Square::from_str("c1").to_bb();
    assert_eq!(attacks, expect);
}

#[test]
fn queen_attacks_on_start_pos_occupancy_matches_rook_bishop_union() {
    ensure_tables();
    let pos = Position::start_pos();
    let occ = pos.occupied();
    for s in 0..64u8 {
        let sq = Square(s);
        let queen = pos.attacks_of(PieceType::Queen, sq, occ);
        let union =
            pos.attacks_of(PieceType::Rook, sq, occ) | pos.attacks_of(PieceType::Bishop, sq, occ);
        assert_eq!(queen, union);
    }
}

#[test]
fn attackers_to_start_pos_e2_finds_no_black_attacker() {
    ensure_tables();
    let pos = Position::start_pos();
    let e2 = Square::from_str("e2");
    // `attackers_to(sq, color, ..)` returns `color`'s enemies attacking
    // `sq`; Black has no piece that can reach e2 from the starting position.
    let attackers = pos.attackers_to(e2, Color::White, pos.occupied());
    assert_eq!(attackers, BitBoard::EMPTY);
}

#[test]
fn attackers_to_finds_the_defending_knight() {
    ensure_tables();
    // White king e1, White knight on f3 defending e5; check who (White)
    // attacks e5 from Black's perspective.
    let pos = Position::from_fen("4k3/8/8/4r3/8/5N2/8/4K3 w - - 0 1").unwrap();
    let e5 = Square::from_str("e5");
    let white_attackers = pos.attackers_to(e5, Color::Black, pos.occupied());
    assert!(white_attackers.test(Square::from_str("f3")));
    assert_eq!(white_attackers.popcount(), 1);
}
