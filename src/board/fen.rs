/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt::Write, str::FromStr};

use anyhow::{anyhow, bail, Result};
use tracing::warn;

use super::{Bitboard, Board, CastlingRights, Color, File, Piece, PieceKind, Position, Rank, Square};

impl Position {
    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// Parsing is strict: all six fields must be present and well-formed, and the position they
    /// describe must be reachable in principle (one King per side, no Pawns on the back ranks,
    /// castling rights and en passant squares backed by the pieces they require, and the side
    /// that just moved not left in check).
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let pos = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(pos.to_fen(), FEN_KIWIPETE);
    ///
    /// // Missing the move counters
    /// assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        parse_fen(fen).inspect_err(|err| warn!(fen, "Rejected FEN: {err:#}"))
    }

    /// Generates a FEN string from this [`Position`].
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// assert_eq!(Position::default().to_fen(), FEN_STARTPOS);
    /// ```
    pub fn to_fen(&self) -> String {
        let mut fen = placements_to_fen(self.board());

        let ep = self
            .ep_square()
            .map_or_else(|| String::from("-"), |square| square.to_string());

        // Writing to a String never fails
        _ = write!(
            fen,
            " {} {} {ep} {} {}",
            self.side_to_move().to_uci(),
            self.castling_rights(),
            self.halfmove(),
            self.fullmove()
        );

        fen
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;
    /// Wrapper for [`Position::from_fen`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

fn parse_fen(fen: &str) -> Result<Position> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let [placements, side, castling, ep, halfmove, fullmove] = fields[..] else {
        bail!(
            "FEN string must have exactly 6 fields. Got {} in {fen:?}",
            fields.len()
        );
    };

    let board = parse_placements(placements)?;
    let side_to_move = parse_side(side)?;
    let castling_rights = parse_castling(castling, &board)?;
    let ep_square = parse_ep_square(ep, &board, side_to_move)?;

    let halfmove = halfmove.parse::<usize>().map_err(|_| {
        anyhow!("FEN string must have a non-negative halfmove counter. Got {halfmove:?}")
    })?;

    let fullmove = fullmove
        .parse::<usize>()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| {
            anyhow!("FEN string must have a positive fullmove counter. Got {fullmove:?}")
        })?;

    let position = Position::from_parts(
        board,
        side_to_move,
        castling_rights,
        ep_square,
        halfmove,
        fullmove,
    );

    // The side that just moved cannot have left its own King attacked
    let opponent = side_to_move.opponent();
    if let Some(king) = position.king_square(opponent) {
        if position.is_square_attacked(king, side_to_move) {
            bail!(
                "FEN describes an illegal position: {} is to move, but {} is in check",
                side_to_move.name(),
                opponent.name()
            );
        }
    }

    Ok(position)
}

/// Parses the first field of a FEN string into a [`Board`].
fn parse_placements(placements: &str) -> Result<Board> {
    let ranks: Vec<&str> = placements.split('/').collect();
    if ranks.len() != Rank::COUNT {
        bail!(
            "FEN must have piece placements for all 8 ranks. Got {} in {placements:?}",
            ranks.len()
        );
    }

    let mut board = Board::new();

    // Ranks are listed from the 8th down to the 1st
    for (rank, rank_str) in Rank::iter().rev().zip(ranks) {
        let mut files = File::iter();
        let mut last_was_digit = false;

        for c in rank_str.chars() {
            if let Some(empty) = c.to_digit(10) {
                if last_was_digit {
                    bail!("FEN rank {rank_str:?} has consecutive digits");
                }
                if !(1..=8).contains(&empty) {
                    bail!("FEN rank {rank_str:?} has an invalid empty-square count {c:?}");
                }
                for _ in 0..empty {
                    files.next().ok_or_else(|| {
                        anyhow!("FEN rank {rank_str:?} describes more than 8 files")
                    })?;
                }
                last_was_digit = true;
            } else {
                let piece = Piece::from_uci(c).map_err(|_| {
                    anyhow!("FEN placements must contain piece chars or digits. Got {c:?}")
                })?;
                let file = files
                    .next()
                    .ok_or_else(|| anyhow!("FEN rank {rank_str:?} describes more than 8 files"))?;

                board.place(piece, Square::new(file, rank));
                last_was_digit = false;
            }
        }

        if files.next().is_some() {
            bail!("FEN rank {rank_str:?} describes fewer than 8 files");
        }
    }

    if let Some(square) = (board.kind(PieceKind::Pawn) & Bitboard::BACK_RANKS).lsb() {
        bail!("FEN places a Pawn on the back rank square {square}");
    }

    for color in Color::all() {
        let kings = board.king(color).population();
        if kings != 1 {
            bail!("FEN must have exactly one {} King. Got {kings}", color.name());
        }
    }

    Ok(board)
}

/// Parses the side-to-move field.
fn parse_side(side: &str) -> Result<Color> {
    let mut chars = side.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Color::from_uci(c),
        _ => bail!("FEN side to move must be 'w' or 'b'. Got {side:?}"),
    }
}

/// Parses the castling field, checking that each right is backed by a King and Rook on their home squares.
fn parse_castling(castling: &str, board: &Board) -> Result<CastlingRights> {
    if castling == "-" {
        return Ok(CastlingRights::empty());
    } else if castling.is_empty() {
        bail!("FEN castling rights must be '-' or a subset of \"KQkq\". Got an empty field");
    }

    let mut rights = CastlingRights::empty();
    for c in castling.chars() {
        let (color, right, rook_file) = match c {
            'K' => (Color::White, CastlingRights::WHITE_KINGSIDE, File::H),
            'Q' => (Color::White, CastlingRights::WHITE_QUEENSIDE, File::A),
            'k' => (Color::Black, CastlingRights::BLACK_KINGSIDE, File::H),
            'q' => (Color::Black, CastlingRights::BLACK_QUEENSIDE, File::A),
            _ => bail!("FEN castling rights must be '-' or a subset of \"KQkq\". Got {castling:?}"),
        };

        // Flags increase in "KQkq" order, so anything out of order or repeated is caught here
        if right.bits() <= rights.bits() {
            bail!(
                "FEN castling rights must be in \"KQkq\" order without repeats. Got {castling:?}"
            );
        }

        let first = Rank::first(color);
        let king_home = Square::new(File::E, first);
        let rook_home = Square::new(rook_file, first);
        if board.piece_at(king_home) != Some(Piece::new(color, PieceKind::King))
            || board.piece_at(rook_home) != Some(Piece::new(color, PieceKind::Rook))
        {
            bail!(
                "FEN castling right {c:?} requires a King on {king_home} and a Rook on {rook_home}"
            );
        }

        rights |= right;
    }

    Ok(rights)
}

/// Parses the en passant field, checking that it could have been created by a double push.
fn parse_ep_square(ep: &str, board: &Board, side_to_move: Color) -> Result<Option<Square>> {
    if ep == "-" {
        return Ok(None);
    }

    let square = Square::from_uci(ep)?;
    let expected_rank = Rank::first(side_to_move.opponent())
        .offset(if side_to_move.is_white() { -2 } else { 2 });
    if Some(square.rank()) != expected_rank {
        bail!(
            "FEN en passant square {square} is on the wrong rank for {} to move",
            side_to_move.name()
        );
    }

    // The pawn that double-pushed sits just past the en passant square
    let pushed = square.backward(side_to_move);
    let origin = square.forward(side_to_move);
    let enemy_pawn = Piece::new(side_to_move.opponent(), PieceKind::Pawn);

    let pushed_ok = pushed.is_some_and(|sq| board.piece_at(sq) == Some(enemy_pawn));
    let path_clear = board.piece_at(square).is_none()
        && origin.is_some_and(|sq| board.piece_at(sq).is_none());

    if !pushed_ok || !path_clear {
        bail!("FEN en passant square {square} does not follow a Pawn double push");
    }

    Ok(Some(square))
}

/// Writes the piece placement field of a FEN string.
fn placements_to_fen(board: &Board) -> String {
    let mut placements = String::with_capacity(64);

    for rank in Rank::iter().rev() {
        let mut empty = 0;

        for file in File::iter() {
            match board.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if empty > 0 {
                        placements.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placements.push(piece.to_uci());
                }
                None => empty += 1,
            }
        }

        if empty > 0 {
            placements.push_str(&empty.to_string());
        }

        if rank != Rank::ONE {
            placements.push('/');
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    #[test]
    fn test_fen_round_trip() {
        for fen in [
            FEN_STARTPOS,
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 2",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_parse_castling_order() {
        let board = Board::standard();
        assert_eq!(parse_castling("Kq", &board).unwrap().to_string(), "Kq");
        assert!(parse_castling("qK", &board).is_err());
        assert!(parse_castling("KK", &board).is_err());
        assert!(parse_castling("", &board).is_err());
        assert!(parse_castling("KQkqX", &board).is_err());
    }

    #[test]
    fn test_parse_side() {
        assert_eq!(parse_side("w").unwrap(), Color::White);
        assert_eq!(parse_side("b").unwrap(), Color::Black);
        assert!(parse_side("W").is_err());
        assert!(parse_side("wb").is_err());
        assert!(parse_side("").is_err());
    }

    #[test]
    fn test_placements_reject_bad_ranks() {
        assert!(parse_placements("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP").is_err());
        assert!(parse_placements("rnbqkbnr/pppppppp/44/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert!(parse_placements("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert!(parse_placements("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert!(parse_placements("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert!(parse_placements("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX").is_err());
        assert!(parse_placements("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_ok());
    }
}
