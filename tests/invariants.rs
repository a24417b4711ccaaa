/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{Position, ZobristKey, FEN_KIWIPETE, FEN_STARTPOS};

/// Walks every line to `depth`, checking the position after each make and undo.
fn walk(position: &mut Position, depth: usize) {
    assert!(position.is_consistent(), "inconsistent position {position}");
    assert_eq!(position.key(), ZobristKey::new(position));

    if depth == 0 {
        return;
    }

    for mv in position.legal_moves() {
        let before = position.clone();
        let mover = position.side_to_move();

        position.make_move(mv);

        let king = position.king_square(mover).unwrap();
        assert!(
            position.attackers_to(king, mover.opponent()).is_empty(),
            "{mv} leaves the King in check in {before}"
        );
        assert_eq!(position.side_to_move(), mover.opponent());
        assert_eq!(position.history_len(), before.history_len() + 1);

        walk(position, depth - 1);

        position.undo_move(mv);
        assert_eq!(*position, before, "undoing {mv} did not restore {before}");
        assert_eq!(position.to_fen(), before.to_fen());
    }
}

fn check_fen(fen: &str, depth: usize) {
    let mut position = Position::from_fen(fen).unwrap();
    walk(&mut position, depth);
    assert_eq!(position.to_fen(), fen);
}

#[test]
fn test_invariants_startpos() {
    check_fen(FEN_STARTPOS, 3);
}

#[test]
fn test_invariants_kiwipete() {
    check_fen(FEN_KIWIPETE, 2);
}

#[test]
fn test_invariants_promotions() {
    check_fen("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 3);
}

#[test]
fn test_invariants_en_passant() {
    check_fen("4k3/8/8/2PpP3/8/8/8/4K3 w - d6 0 1", 3);
    check_fen("8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1", 3);
}

#[test]
fn test_invariants_castling() {
    check_fen("r3k2r/1b4bq/8/8/8/8/7B/R3K2R w KQkq - 0 1", 2);
}

#[test]
fn test_keys_agree_across_move_orders() {
    let mut a = Position::default();
    let mut b = Position::default();

    for uci in ["g1f3", "g8f6", "b1c3"] {
        a.make_move(gambit::Move::from_uci(&a, uci).unwrap());
    }
    for uci in ["b1c3", "g8f6", "g1f3"] {
        b.make_move(gambit::Move::from_uci(&b, uci).unwrap());
    }

    assert_eq!(a.key(), b.key());
    assert_eq!(a.to_fen(), b.to_fen());
}

#[test]
fn test_keys_differ_by_side_and_rights() {
    let white = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let black = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    let no_rights = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();

    assert_ne!(white.key(), black.key());
    assert_ne!(white.key(), no_rights.key());
}
