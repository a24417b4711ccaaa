/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{CastlingRights, Color, Game, Position, FEN_KIWIPETE, FEN_STARTPOS};

#[test]
fn test_fen_round_trips() {
    let fens = [
        FEN_STARTPOS,
        FEN_KIWIPETE,
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "4k3/8/8/2PpP3/8/8/8/4K3 w - d6 0 1",
        "8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1",
        "4k3/8/8/8/8/8/8/R3K3 w Q - 99 80",
    ];

    for fen in fens {
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
        assert_eq!(position.to_string(), fen);
        assert!(position.is_consistent());
    }
}

#[test]
fn test_fen_fields() {
    let position: Position = "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 12 34".parse().unwrap();
    assert_eq!(position.side_to_move(), Color::Black);
    assert_eq!(
        position.castling_rights(),
        CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
    );
    assert_eq!(position.ep_square(), None);
    assert_eq!(position.halfmove(), 12);
    assert_eq!(position.fullmove(), 34);
}

#[test]
fn test_fen_tolerates_extra_whitespace() {
    let position = Position::from_fen("  4k3/8/8/8/8/8/8/4K3   w  -  -  0  1 ").unwrap();
    assert_eq!(position.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
}

#[test]
fn test_fen_rejects_wrong_field_count() {
    assert!(Position::from_fen("").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra").is_err());
}

#[test]
fn test_fen_rejects_bad_placements() {
    let bad = [
        // Seven ranks
        "4k3/8/8/8/8/8/4K3 w - - 0 1",
        // Nine ranks
        "4k3/8/8/8/8/8/8/8/4K3 w - - 0 1",
        // Short rank
        "4k3/7/8/8/8/8/8/4K3 w - - 0 1",
        // Long rank
        "4k3/9/8/8/8/8/8/4K3 w - - 0 1",
        "4k3/ppppppppp/8/8/8/8/8/4K3 w - - 0 1",
        // Consecutive digits
        "4k3/44/8/8/8/8/8/4K3 w - - 0 1",
        // Unknown piece
        "4k3/8/8/3x4/8/8/8/4K3 w - - 0 1",
        // Zero is never a valid run
        "4k3/08/8/8/8/8/8/4K3 w - - 0 1",
    ];

    for fen in bad {
        assert!(Position::from_fen(fen).is_err(), "accepted {fen}");
    }
}

#[test]
fn test_fen_rejects_bad_kings() {
    // No white King
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1").is_err());
    // Two black Kings
    assert!(Position::from_fen("k3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
}

#[test]
fn test_fen_rejects_pawns_on_back_ranks() {
    assert!(Position::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/p3K3 w - - 0 1").is_err());
}

#[test]
fn test_fen_rejects_bad_side_to_move() {
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 W - - 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 wb - - 0 1").is_err());
}

#[test]
fn test_fen_rejects_bad_castling() {
    let bad = [
        // Out of order
        "r3k2r/8/8/8/8/8/8/R3K2R w QK - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w kK - 0 1",
        // Repeated
        "r3k2r/8/8/8/8/8/8/R3K2R w KK - 0 1",
        // Unknown character
        "r3k2r/8/8/8/8/8/8/R3K2R w KX - 0 1",
        // Chess960 file letters
        "r3k2r/8/8/8/8/8/8/R3K2R w HAha - 0 1",
        // Right without a Rook on its home square
        "r3k2r/8/8/8/8/8/8/4K2R w Q - 0 1",
        // Right without the King on its home square
        "r3k2r/8/8/8/8/8/8/R4K1R w K - 0 1",
        // Dash mixed with rights
        "r3k2r/8/8/8/8/8/8/R3K2R w -K - 0 1",
    ];

    for fen in bad {
        assert!(Position::from_fen(fen).is_err(), "accepted {fen}");
    }
}

#[test]
fn test_fen_rejects_bad_en_passant() {
    let bad = [
        // Not a square
        "4k3/8/8/2PpP3/8/8/8/4K3 w - z9 0 1",
        // Wrong rank for the side to move
        "4k3/8/8/2PpP3/8/8/8/4K3 w - d3 0 1",
        // No Pawn that could have double-pushed
        "4k3/8/8/2P1P3/8/8/8/4K3 w - d6 0 1",
        // Origin square occupied
        "4k3/3r4/8/2PpP3/8/8/8/4K3 w - d6 0 1",
    ];

    for fen in bad {
        assert!(Position::from_fen(fen).is_err(), "accepted {fen}");
    }
}

#[test]
fn test_fen_rejects_bad_counters() {
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - -1 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 -3").is_err());
}

#[test]
fn test_fen_rejects_side_not_to_move_in_check() {
    // Black is in check but White is to move
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").is_err());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1").is_ok());
}

#[test]
fn test_load_fen_failure_leaves_game_untouched() {
    let mut game = Game::default();
    game.make_move_uci("e2e4").unwrap();
    let before = game.clone();

    assert!(game.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0").is_err());
    assert_eq!(game, before);

    game.load_fen(FEN_KIWIPETE).unwrap();
    assert_eq!(game.to_fen(), FEN_KIWIPETE);
    assert!(game.moves().is_empty());
    assert_eq!(game.history_len(), 0);
}
