/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Color, PieceKind, Position};

/// Why a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// 100 plies without a capture or pawn move.
    FiftyMoveRule,

    /// Neither side has enough material left to deliver mate.
    InsufficientMaterial,

    /// The same position has occurred three times with the same side to move.
    ThreefoldRepetition,

    /// The side to move has no legal moves and is not in check.
    Stalemate,
}

/// The state of a game after the most recent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Ongoing,

    Checkmate {
        winner: Color,
    },

    Draw(DrawReason),
}

impl GameStatus {
    /// Returns `true` if the game has ended.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// The winning side, if the game ended in checkmate.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mate = GameStatus::Checkmate { winner: Color::Black };
    /// assert_eq!(mate.winner(), Some(Color::Black));
    /// assert_eq!(GameStatus::Draw(DrawReason::Stalemate).winner(), None);
    /// ```
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::FiftyMoveRule => "fifty-move rule",
            Self::InsufficientMaterial => "insufficient material",
            Self::ThreefoldRepetition => "threefold repetition",
            Self::Stalemate => "stalemate",
        };
        f.write_str(reason)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            Self::Draw(reason) => write!(f, "draw by {reason}"),
        }
    }
}

impl Position {
    /// Evaluates the state of the game, generating legal moves to detect mate and stalemate.
    ///
    /// Draws by rule take priority over the side to move having no legal moves.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// assert_eq!(Position::default().status(), GameStatus::Ongoing);
    ///
    /// let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
    /// assert_eq!(mated.status(), GameStatus::Checkmate { winner: Color::White });
    /// ```
    pub fn status(&self) -> GameStatus {
        self.status_given(self.has_legal_moves())
    }

    /// Like [`Position::status`], reusing a previously computed answer to whether any legal moves exist.
    pub fn status_given(&self, has_legal_moves: bool) -> GameStatus {
        if self.can_draw_by_fifty() {
            GameStatus::Draw(DrawReason::FiftyMoveRule)
        } else if self.can_draw_by_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if self.is_threefold_repetition() {
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        } else if has_legal_moves {
            GameStatus::Ongoing
        } else if self.is_in_check() {
            GameStatus::Checkmate {
                winner: self.side_to_move().opponent(),
            }
        } else {
            GameStatus::Draw(DrawReason::Stalemate)
        }
    }

    /// Returns `true` if 100 plies have passed since the last capture or pawn move.
    #[inline(always)]
    pub const fn can_draw_by_fifty(&self) -> bool {
        self.halfmove() >= 100
    }

    /// Returns `true` if no Pawns, Rooks or Queens remain and there is at most one minor piece on the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let kings = Position::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
    /// assert!(kings.can_draw_by_insufficient_material());
    ///
    /// let knights = Position::from_fen("8/8/4k3/8/2N5/3K4/8/6n1 w - - 0 1").unwrap();
    /// assert!(!knights.can_draw_by_insufficient_material());
    /// ```
    pub fn can_draw_by_insufficient_material(&self) -> bool {
        let board = self.board();

        let heavy_or_pawns = board.kind(PieceKind::Pawn)
            | board.kind(PieceKind::Rook)
            | board.kind(PieceKind::Queen);
        let minors = board.kind(PieceKind::Knight) | board.kind(PieceKind::Bishop);

        heavy_or_pawns.is_empty() && minors.population() <= 1
    }

    /// Returns `true` if the current position has occurred at least twice before since the last
    /// irreversible move, with the same side to move.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut pos = Position::default();
    /// for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"] {
    ///     pos.make_move(Move::from_uci(&pos, uci).unwrap());
    ///     assert!(!pos.is_threefold_repetition());
    /// }
    /// pos.make_move(Move::from_uci(&pos, "f6g8").unwrap());
    /// assert!(pos.is_threefold_repetition());
    /// ```
    pub fn is_threefold_repetition(&self) -> bool {
        let key = self.key();

        // Only positions with the same side to move can match, and none before the last irreversible move
        let repetitions = self
            .key_history()
            .rev()
            .skip(1)
            .step_by(2)
            .take(self.halfmove() / 2)
            .filter(|&prev| prev == key)
            .count();

        repetitions >= 2
    }
}
