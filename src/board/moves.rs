/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{anyhow, Result};

use super::{File, Piece, PieceKind, Position, Square};

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// The special rules, if any, that apply to a [`Move`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default)]
pub enum MoveKind {
    /// A piece moves (and possibly captures) with no further side effects.
    #[default]
    Normal,

    /// A pawn advances two squares from its starting rank, creating an en passant target.
    PawnDoublePush,

    /// A pawn captures a pawn that just double-pushed past it, landing behind that pawn.
    EnPassant,

    /// The King and the h-file Rook swap sides.
    ShortCastle,

    /// The King and the a-file Rook swap sides.
    LongCastle,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::PawnDoublePush => "double push",
            Self::EnPassant => "en passant",
            Self::ShortCastle => "short castle",
            Self::LongCastle => "long castle",
        };
        f.write_str(name)
    }
}

/// A fully-described move, carrying everything needed to both apply and revert it.
///
/// Moves are produced by the move generator for one specific [`Position`].
/// For castling, `from` and `to` are the King's squares; the Rook's squares follow from the side.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotion: Option<PieceKind>,
    kind: MoveKind,
}

impl Move {
    /// A [`MoveKind::Normal`] move of `piece`, capturing whatever stood on `to`.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mv = Move::new(Square::G1, Square::F3, Piece::WHITE_KNIGHT, None);
    /// assert_eq!(mv.to_string(), "g1f3");
    /// assert!(!mv.is_capture());
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            promotion: None,
            kind: MoveKind::Normal,
        }
    }

    /// A pawn move onto its last rank, turning it into `promotion`.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mv = Move::new_promotion(Square::E7, Square::E8, Piece::WHITE_PAWN, None, PieceKind::Queen);
    /// assert_eq!(mv.to_string(), "e7e8q");
    /// ```
    #[inline(always)]
    pub const fn new_promotion(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        promotion: PieceKind,
    ) -> Self {
        Self {
            promotion: Some(promotion),
            ..Self::new(from, to, piece, captured)
        }
    }

    /// A move with special rules attached. Captures are inferred for [`MoveKind::EnPassant`].
    #[inline(always)]
    pub const fn new_special(from: Square, to: Square, piece: Piece, kind: MoveKind) -> Self {
        let captured = match kind {
            MoveKind::EnPassant => Some(Piece::new(piece.color().opponent(), PieceKind::Pawn)),
            _ => None,
        };

        Self {
            kind,
            ..Self::new(from, to, piece, captured)
        }
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece being moved, as it stood before moving (a pawn, for promotions).
    #[inline(always)]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline(always)]
    pub const fn is_pawn_double_push(&self) -> bool {
        matches!(self.kind, MoveKind::PawnDoublePush)
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle | MoveKind::LongCastle)
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// The square the captured piece stands on.
    ///
    /// This is `to`, except for en passant, where the victim sits beside the capturing pawn.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let ep = Move::new_special(Square::E5, Square::D6, Piece::WHITE_PAWN, MoveKind::EnPassant);
    /// assert_eq!(ep.captured(), Some(Piece::BLACK_PAWN));
    /// assert_eq!(ep.capture_square(), Square::D5);
    /// ```
    #[inline(always)]
    pub const fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// The `(from, to)` squares of the Rook, if this is a castling move.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let castle = Move::new_special(Square::E8, Square::C8, Piece::BLACK_KING, MoveKind::LongCastle);
    /// assert_eq!(castle.castling_rook_squares(), Some((Square::A8, Square::D8)));
    /// ```
    #[inline(always)]
    pub const fn castling_rook_squares(&self) -> Option<(Square, Square)> {
        let rank = self.from.rank();
        match self.kind {
            MoveKind::ShortCastle => Some((Square::new(File::H, rank), Square::new(File::F, rank))),
            MoveKind::LongCastle => Some((Square::new(File::A, rank), Square::new(File::D, rank))),
            _ => None,
        }
    }

    /// Finds the legal move in `position` written as `uci`, in
    /// [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// Castling is written as the King's move, such as `e1g1`.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let position = Position::default();
    /// let mv = Move::from_uci(&position, "e2e4").unwrap();
    /// assert!(mv.is_pawn_double_push());
    ///
    /// // Well-formed, but not legal here
    /// assert!(Move::from_uci(&position, "e2e5").is_err());
    /// // Not a move at all
    /// assert!(Move::from_uci(&position, "castle").is_err());
    /// ```
    pub fn from_uci(position: &Position, uci: &str) -> Result<Self> {
        let uci = uci.trim();
        position
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_uci() == uci)
            .ok_or_else(|| anyhow!("Illegal move {uci:?} in position {position}"))
    }

    /// This move in UCI notation, such as `e2e4` or `e7e8q`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({} {}", self.piece.name(), self.kind)?;
        if let Some(captured) = self.captured {
            write!(f, ", takes {}", captured.name())?;
        }
        write!(f, ")")
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_uci() == other.as_ref()
    }
}
