/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{bail, Result};
use tracing::{debug, trace};

use super::{Bitboard, Color, File, GameStatus, Move, MoveList, Piece, Position, Rank, Square};

/// A game of chess.
///
/// This type encapsulates a [`Position`] and keeps the current legal moves and [`GameStatus`]
/// up to date after every change. It is the surface a user interface talks to.
///
/// The basic methods you're probably looking for are [`Game::legal_moves`], [`Game::make_move`],
/// [`Game::undo_move`] and [`Game::status`].
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    /// The current [`Position`] of the game.
    position: Position,

    /// Moves made through this game, oldest first.
    moves: Vec<Move>,

    /// Legal moves in `position`.
    legal_moves: MoveList,

    /// Status of `position`.
    status: GameStatus,
}

impl Game {
    /// Creates a new [`Game`] from the provided [`Position`].
    pub fn new(position: Position) -> Self {
        let mut game = Self {
            position,
            moves: Vec::new(),
            legal_moves: MoveList::new(),
            status: GameStatus::Ongoing,
        };

        game.refresh();
        game
    }

    /// Creates a new [`Game`] from the provided FEN string.
    #[inline(always)]
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Position::from_fen(fen)?))
    }

    /// Fetch the internal [`Position`] of this [`Game`].
    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// All legal moves in the current position.
    #[inline(always)]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// The status of the current position.
    #[inline(always)]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Moves made since this game was created, reset or loaded, oldest first.
    #[inline(always)]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Applies `mv`, which must be one of [`Game::legal_moves`].
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut game = Game::default();
    /// let mv = game.legal_moves()[0];
    /// game.make_move(mv);
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// assert_eq!(game.moves(), &[mv]);
    /// ```
    pub fn make_move(&mut self, mv: Move) {
        trace!(%mv, "make move");
        self.position.make_move(mv);
        self.moves.push(mv);
        self.refresh();
    }

    /// Applies `mv` only if it is legal in the current position.
    pub fn make_move_checked(&mut self, mv: Move) -> Result<()> {
        if !self.legal_moves.contains(&mv) {
            bail!("Illegal move {mv} in position {}", self.position);
        }

        self.make_move(mv);
        Ok(())
    }

    /// Converts the provided string to a [`Move`], if possible, and applies it to the game.
    ///
    /// Equivalent to calling [`Move::from_uci`] and [`Game::make_move`].
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut game = Game::default();
    /// game.make_move_uci("e2e4").unwrap();
    /// assert!(game.make_move_uci("e2e4").is_err());
    /// ```
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move> {
        let mv = Move::from_uci(&self.position, uci)?;
        self.make_move(mv);
        Ok(mv)
    }

    /// Undoes the last move made through this game, returning it. Does nothing if there is none.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut game = Game::default();
    /// assert_eq!(game.undo_move(), None);
    ///
    /// let mv = game.make_move_uci("g1f3").unwrap();
    /// assert_eq!(game.undo_move(), Some(mv));
    /// assert_eq!(game, Game::default());
    /// ```
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.moves.pop()?;
        trace!(%mv, "undo move");
        self.position.undo_move(mv);
        self.refresh();
        Some(mv)
    }

    /// Returns the game to the standard starting position.
    pub fn reset(&mut self) {
        debug!("reset to starting position");
        *self = Self::default();
    }

    /// Replaces the game with the position described by `fen`.
    ///
    /// On error, the game is left untouched.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut game = Game::default();
    /// game.load_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(game.legal_moves().len(), 48);
    ///
    /// assert!(game.load_fen("not a fen").is_err());
    /// assert_eq!(game.to_fen(), FEN_KIWIPETE);
    /// ```
    pub fn load_fen(&mut self, fen: &str) -> Result<()> {
        let position = Position::from_fen(fen)?;
        debug!(fen, "loaded position");
        *self = Self::new(position);
        Ok(())
    }

    /// Recomputes the cached legal moves and status.
    fn refresh(&mut self) {
        self.legal_moves.clear();
        self.position.generate_legal_moves_into(&mut self.legal_moves);
        self.status = self.position.status_given(!self.legal_moves.is_empty());
    }
}

impl Deref for Game {
    type Target = Position;
    /// A [`Game`] immutably dereferences to a [`Position`], for simplicity.
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.position
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_fen`]
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    /// Standard starting position for Chess.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Position::default())
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let squares_to_string = |bb: Bitboard| {
            bb.into_iter()
                .map(|sq| sq.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let piece = self.piece_at(Square::new(file, rank));
                write!(f, " {}", piece.as_ref().map_or('.', Piece::to_uci))?;
            }

            if rank == Rank::SEVEN {
                write!(f, "        FEN: {}", self.position)?;
            } else if rank == Rank::SIX {
                write!(f, "        Key: {}", self.key())?;
            } else if rank == Rank::FIVE {
                write!(f, "   Checkers: {}", squares_to_string(self.checkers()))?;
            } else if rank == Rank::FOUR {
                write!(f, "     Status: {}", self.status)?;
            } else if rank == Rank::THREE {
                let side = match self.side_to_move() {
                    Color::White => "White",
                    Color::Black => "Black",
                };
                write!(f, "    To move: {side}")?;
            }
            writeln!(f)?;
        }

        write!(f, " +----------------\n   a b c d e f g h")
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}\nMoves: {:?}\nStatus: {}",
            self.position, self.moves, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DrawReason;

    #[test]
    fn test_game_tracks_status() {
        let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        assert_eq!(game.status(), GameStatus::Ongoing);

        game.make_move_uci("a1a8").unwrap();
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.status(),
            GameStatus::Checkmate {
                winner: Color::White
            }
        );

        game.undo_move();
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.legal_moves().len(), game.position().legal_moves().len());
    }

    #[test]
    fn test_game_reset() {
        let mut game = Game::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert_eq!(
            game.status(),
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        );

        game.reset();
        assert_eq!(game, Game::default());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn test_make_move_checked_rejects_foreign_moves() {
        let mut game = Game::default();
        let other = Game::from_fen(crate::FEN_KIWIPETE).unwrap();
        let castle = other
            .legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.is_castle())
            .unwrap();

        assert!(game.make_move_checked(castle).is_err());
        assert!(game.moves().is_empty());

        let mv = game.legal_moves()[0];
        assert!(game.make_move_checked(mv).is_ok());
    }

    #[test]
    fn test_piece_at_index_out_of_range() {
        let game = Game::default();
        assert_eq!(game.piece_at_index(64), None);
        assert_eq!(game.piece_at_index(usize::MAX), None);
        assert_eq!(game.piece_at_index(0), Some(Piece::WHITE_ROOK));
    }
}
