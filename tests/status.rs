/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{Color, DrawReason, Game, GameStatus};

fn play(game: &mut Game, moves: &[&str]) {
    for uci in moves {
        game.make_move_uci(uci).unwrap();
    }
}

#[test]
fn test_bare_kings_are_drawn() {
    let game = Game::from_fen("8/8/3k4/8/8/4K3/8/8 w - - 0 1").unwrap();
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::InsufficientMaterial)
    );
    assert!(game.status().is_over());
    assert_eq!(game.status().winner(), None);
}

#[test]
fn test_single_minor_is_drawn() {
    let bishop = Game::from_fen("8/8/3k4/8/8/4KB2/8/8 b - - 0 1").unwrap();
    assert_eq!(
        bishop.status(),
        GameStatus::Draw(DrawReason::InsufficientMaterial)
    );

    let two_minors = Game::from_fen("8/8/3kn3/8/8/4KB2/8/8 b - - 0 1").unwrap();
    assert_eq!(two_minors.status(), GameStatus::Ongoing);

    let pawn = Game::from_fen("8/8/3k4/8/8/4K3/4P3/8 b - - 0 1").unwrap();
    assert_eq!(pawn.status(), GameStatus::Ongoing);
}

#[test]
fn test_capture_into_insufficient_material() {
    let mut game = Game::from_fen("8/8/3k4/8/8/4K3/3r4/8 w - - 0 1").unwrap();
    assert_eq!(game.status(), GameStatus::Ongoing);

    play(&mut game, &["e3d2"]);
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::InsufficientMaterial)
    );
}

#[test]
fn test_back_rank_mate() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    play(&mut game, &["a1a8"]);

    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::White
        }
    );
    assert_eq!(game.status().winner(), Some(Color::White));
    assert!(game.legal_moves().is_empty());
    assert!(game.is_in_check());
}

#[test]
fn test_fools_mate() {
    let mut game = Game::default();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
}

#[test]
fn test_stalemate() {
    let mut game = Game::from_fen("7k/8/5K2/8/8/8/8/6Q1 w - - 0 1").unwrap();
    play(&mut game, &["g1g6"]);

    assert_eq!(game.status(), GameStatus::Draw(DrawReason::Stalemate));
    assert!(!game.is_in_check());
    assert!(game.legal_moves().is_empty());
}

#[test]
fn test_fifty_move_rule() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
    assert_eq!(game.status(), GameStatus::Ongoing);

    play(&mut game, &["a1a2"]);
    assert_eq!(game.halfmove(), 100);
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));

    game.undo_move();
    assert_eq!(game.status(), GameStatus::Ongoing);
}

#[test]
fn test_fifty_move_rule_takes_precedence_over_mate() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80").unwrap();
    play(&mut game, &["a1a8"]);

    assert!(game.legal_moves().is_empty());
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
}

#[test]
fn test_threefold_repetition() {
    let mut game = Game::default();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    play(&mut game, &shuffle);
    assert_eq!(game.status(), GameStatus::Ongoing);

    play(&mut game, &shuffle[..3]);
    assert_eq!(game.status(), GameStatus::Ongoing);

    play(&mut game, &shuffle[3..]);
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::ThreefoldRepetition)
    );

    game.undo_move();
    assert_eq!(game.status(), GameStatus::Ongoing);
}

#[test]
fn test_repetition_scope_resets_on_irreversible_moves() {
    let mut game = Game::default();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    play(&mut game, &shuffle);
    play(&mut game, &["e2e3", "e7e6"]);
    assert_eq!(game.halfmove(), 0);
    assert_eq!(game.ep_square(), None);

    // Only two occurrences since the pawn moves
    play(&mut game, &shuffle);
    assert_eq!(game.status(), GameStatus::Ongoing);

    play(&mut game, &shuffle);
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::ThreefoldRepetition)
    );
}

#[test]
fn test_double_push_position_does_not_repeat_without_en_passant() {
    let mut game = Game::default();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    // After a double push the en passant square is part of the key,
    // so the same placement later on is a different position
    play(&mut game, &["e2e4", "e7e5"]);
    let after_push = game.key();
    assert!(game.ep_square().is_some());

    play(&mut game, &shuffle);
    assert_eq!(game.ep_square(), None);
    assert_ne!(game.key(), after_push);

    play(&mut game, &shuffle);
    assert_eq!(game.status(), GameStatus::Ongoing);

    play(&mut game, &shuffle);
    assert_eq!(
        game.status(),
        GameStatus::Draw(DrawReason::ThreefoldRepetition)
    );
}

#[test]
fn test_status_display() {
    assert!(!GameStatus::Ongoing.to_string().is_empty());
    assert_ne!(
        GameStatus::Draw(DrawReason::Stalemate).to_string(),
        GameStatus::Draw(DrawReason::FiftyMoveRule).to_string()
    );
}
