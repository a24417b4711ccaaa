/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::{Color, File, Rank, Square};

/// A set of squares, stored as one bit per square.
///
/// Bit `i` corresponds to the square with index `i`, where `0` is `a1`, `7` is `h1` and `63` is `h8`
/// ([Little-Endian Rank-File Mapping](https://www.chessprogramming.org/Square_Mapping_Considerations#Little-Endian_Rank-File_Mapping)).
///
/// The first rank, for example, is the lowest byte:
/// ```text
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 11111111
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const FILE_A: Self = Self(0x0101010101010101);
    pub const FILE_H: Self = Self(0x8080808080808080);
    pub const NOT_FILE_A: Self = Self(0xfefefefefefefefe);
    pub const NOT_FILE_H: Self = Self(0x7f7f7f7f7f7f7f7f);
    pub const RANK_1: Self = Self(0x00000000000000FF);
    pub const RANK_2: Self = Self(0x000000000000FF00);
    pub const RANK_3: Self = Self(0x0000000000FF0000);
    pub const RANK_4: Self = Self(0x00000000FF000000);
    pub const RANK_5: Self = Self(0x000000FF00000000);
    pub const RANK_6: Self = Self(0x0000FF0000000000);
    pub const RANK_7: Self = Self(0x00FF000000000000);
    pub const RANK_8: Self = Self(0xFF00000000000000);
    pub const EMPTY_BOARD: Self = Self(0);
    pub const FULL_BOARD: Self = Self(u64::MAX);
    /// The first and eighth ranks, where no pawn may stand.
    pub const BACK_RANKS: Self = Self(0xFF000000000000FF);

    /// Wraps a raw bit pattern.
    ///
    /// # Example
    /// ```
    /// # use gambit::Bitboard;
    /// assert_eq!(Bitboard::new(0xFF), Bitboard::RANK_1);
    /// ```
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// A [`Bitboard`] containing only `square`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Square};
    /// assert_eq!(Bitboard::from_square(Square::H8).inner(), 1 << 63);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// A [`Bitboard`] of every square on `file`.
    #[inline(always)]
    pub const fn from_file(file: File) -> Self {
        Self(Self::FILE_A.0 << file.0)
    }

    /// A [`Bitboard`] of every square on `rank`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Rank};
    /// assert_eq!(Bitboard::from_rank(Rank::SEVEN), Bitboard::RANK_7);
    /// ```
    #[inline(always)]
    pub const fn from_rank(rank: Rank) -> Self {
        Self(Self::RANK_1.0 << (rank.0 * 8))
    }

    /// The rank a pawn of `color` lands on after its first single push.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Color};
    /// assert_eq!(Bitboard::third_rank(Color::White), Bitboard::RANK_3);
    /// assert_eq!(Bitboard::third_rank(Color::Black), Bitboard::RANK_6);
    /// ```
    #[inline(always)]
    pub const fn third_rank(color: Color) -> Self {
        [Self::RANK_3, Self::RANK_6][color.index()]
    }

    /// The rank on which pawns of `color` promote.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Color};
    /// assert_eq!(Bitboard::eighth_rank(Color::White), Bitboard::RANK_8);
    /// assert_eq!(Bitboard::eighth_rank(Color::Black), Bitboard::RANK_1);
    /// ```
    #[inline(always)]
    pub const fn eighth_rank(color: Color) -> Self {
        [Self::RANK_8, Self::RANK_1][color.index()]
    }

    /// The raw bits.
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// The only square in this set, or `None` if it holds zero or several squares.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Square};
    /// assert_eq!(Square::G2.bitboard().to_square(), Some(Square::G2));
    /// assert_eq!(Bitboard::RANK_1.to_square(), None);
    /// ```
    #[inline(always)]
    pub const fn to_square(&self) -> Option<Square> {
        if self.population() == 1 {
            Some(Square(self.0.trailing_zeros() as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if `self` and `other` share at least one square.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Square};
    /// assert!(Bitboard::RANK_1.intersects(Square::C1));
    /// assert!(Bitboard::RANK_1.intersects(Bitboard::FILE_A));
    /// assert!(!Bitboard::RANK_1.intersects(Bitboard::RANK_5));
    /// ```
    #[inline(always)]
    pub fn intersects(&self, other: impl Into<Self>) -> bool {
        (*self & other.into()).is_nonempty()
    }

    /// Returns `true` if every square of `other` is also in `self`.
    #[inline(always)]
    pub fn contains(&self, other: impl Into<Self>) -> bool {
        let other = other.into();
        (*self & other) == other
    }

    /// Adds the square(s) of `other` to this set.
    #[inline(always)]
    pub fn set(&mut self, other: impl Into<Self>) {
        *self |= other.into()
    }

    /// Removes the square(s) of `other` from this set.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Square};
    /// let mut board = Bitboard::RANK_1;
    /// board.clear(Square::C1);
    /// assert_eq!(board.inner(), 0xFB);
    /// ```
    #[inline(always)]
    pub fn clear(&mut self, other: impl Into<Self>) {
        *self &= !other.into()
    }

    /// The lowest square in this set, if any.
    #[inline(always)]
    pub fn lsb(&self) -> Option<Square> {
        self.is_nonempty()
            .then(|| Square(self.0.trailing_zeros() as u8))
    }

    /// Removes and returns the lowest square in this set, if any.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        lsb
    }

    /// An iterator over every square in this set, from `a1` towards `h8`.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }

    /// Number of squares in this set.
    ///
    /// # Example
    /// ```
    /// # use gambit::Bitboard;
    /// assert_eq!(Bitboard::RANK_1.population(), 8);
    /// ```
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Shifts every square one rank towards `color`'s opponent.
    ///
    /// Squares that would leave the board are dropped.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Color};
    /// assert_eq!(Bitboard::RANK_4.forward(Color::White), Bitboard::RANK_5);
    /// assert_eq!(Bitboard::RANK_4.forward(Color::Black), Bitboard::RANK_3);
    /// assert_eq!(Bitboard::RANK_8.forward(Color::White), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn forward(self, color: Color) -> Self {
        match color {
            Color::White => self.north(),
            Color::Black => self.south(),
        }
    }

    /// Shifts every square one rank towards `color`'s own side.
    #[inline(always)]
    pub const fn backward(self, color: Color) -> Self {
        match color {
            Color::White => self.south(),
            Color::Black => self.north(),
        }
    }

    #[inline(always)]
    pub const fn north(self) -> Self {
        Self(self.0 << 8)
    }

    #[inline(always)]
    pub const fn south(self) -> Self {
        Self(self.0 >> 8)
    }

    /// Shifts every square one file towards the h-file, dropping the h-file.
    ///
    /// # Example
    /// ```
    /// # use gambit::Bitboard;
    /// assert_eq!(Bitboard::FILE_H.east(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn east(self) -> Self {
        Self((self.0 << 1) & Self::NOT_FILE_A.0)
    }

    /// Shifts every square one file towards the a-file, dropping the a-file.
    #[inline(always)]
    pub const fn west(self) -> Self {
        Self((self.0 >> 1) & Self::NOT_FILE_H.0)
    }

    /// `const` analog of [`std::ops::BitOr::bitor`].
    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `const` analog of [`Not::not`].
    #[inline(always)]
    pub const fn not(self) -> Self {
        Self(!self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |bb, sq| bb | sq)
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(self.0.$func(Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                self.0.$func_assign(Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);
impl_bitwise_op!(BitXor, BitXorAssign, bitxor, bitxor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl From<Option<Square>> for Bitboard {
    /// `None` is the empty set.
    #[inline(always)]
    fn from(value: Option<Square>) -> Self {
        value.map(Self::from_square).unwrap_or_default()
    }
}

impl From<u64> for Bitboard {
    #[inline(always)]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Bitboard {
    /// Prints an 8x8 grid with rank 8 at the top, `X` for members and `.` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                let occupant = if self.intersects(Square::new(file, rank)) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{occupant} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard(0x{:0>16X})", self.0)
    }
}

/// An iterator over the squares of a [`Bitboard`].
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitboard_to_string() {
        let board = Bitboard::RANK_2 | Bitboard::from_file(File::C);
        let expected = ". . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        X X X X X X X X \n\
                        . . X . . . . . \n";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_bitboard_iteration_order() {
        let squares: Vec<Square> = (Square::H8.bitboard() | Square::A1 | Square::E4)
            .iter()
            .collect();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);
    }

    #[test]
    fn test_bitboard_shifts_do_not_wrap() {
        assert_eq!(Bitboard::FILE_A.west(), Bitboard::EMPTY_BOARD);
        assert_eq!(Bitboard::RANK_1.backward(Color::White), Bitboard::EMPTY_BOARD);
        assert_eq!(Bitboard::RANK_1.forward(Color::Black), Bitboard::EMPTY_BOARD);
        assert_eq!(
            Bitboard::from_file(File::G).east(),
            Bitboard::from_file(File::H)
        );
    }

    #[test]
    fn test_bitboard_set_and_clear() {
        let mut board = Bitboard::EMPTY_BOARD;
        board.set(Square::D4);
        board.set(Square::D5);
        assert_eq!(board.population(), 2);
        assert!(board.contains(Square::D4));
        board.clear(Square::D4);
        assert_eq!(board.to_square(), Some(Square::D5));
    }
}
