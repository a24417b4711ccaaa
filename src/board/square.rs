/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

use super::{Bitboard, Color};

macro_rules! square_consts {
    (@file $file:ident, [$($rank:expr),*], [$($name:ident),*]) => {
        $(pub const $name: Self = Self::new(File::$file, $rank);)*
    };
    ($($file:ident => [$($name:ident),*]),* $(,)?) => {
        $(square_consts!(
            @file $file,
            [
                Rank::ONE, Rank::TWO, Rank::THREE, Rank::FOUR,
                Rank::FIVE, Rank::SIX, Rank::SEVEN, Rank::EIGHT
            ],
            [$($name),*]
        );)*
    };
}

/// One of the 64 squares of a chess board.
///
/// Squares are indexed rank-major from `a1` (0) to `h8` (63):
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    square_consts! {
        A => [A1, A2, A3, A4, A5, A6, A7, A8],
        B => [B1, B2, B3, B4, B5, B6, B7, B8],
        C => [C1, C2, C3, C4, C5, C6, C7, C8],
        D => [D1, D2, D3, D4, D5, D6, D7, D8],
        E => [E1, E2, E3, E4, E5, E6, E7, E8],
        F => [F1, F2, F3, F4, F5, F6, F7, F8],
        G => [G1, G2, G3, G4, G5, G6, G7, G8],
        H => [H1, H2, H3, H4, H5, H6, H7, H8],
    }

    pub const COUNT: usize = 64;

    /// Every square, from `a1` to `h8`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next(), Some(Square::A1));
    /// assert_eq!(iter.last(), Some(Square::H8));
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// # Example
    /// ```
    /// # use gambit::{Square, File, Rank};
    /// assert_eq!(Square::new(File::C, Rank::FOUR), Square::C4);
    /// ```
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(rank.0 << 3 | file.0)
    }

    /// Creates a [`Square`] from an index in `[0, 63]`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_index(26).unwrap(), Square::C4);
    /// assert!(Square::from_index(64).is_err());
    /// ```
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= Self::COUNT {
            bail!("Invalid Square index: Index must be in [0, 63]. Got {index}");
        }
        Ok(Self(index as u8))
    }

    /// Creates a [`Square`] from an index without checking that it is in `[0, 63]`.
    #[inline(always)]
    pub const fn from_index_unchecked(index: usize) -> Self {
        Self(index as u8)
    }

    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 & 0b111)
    }

    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 >> 3)
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Alias for [`Bitboard::from_square`].
    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_square(*self)
    }

    /// Offsets this square by the provided file and rank deltas, if the result is on the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::C4.offset(1, 1), Some(Square::D5));
    /// assert_eq!(Square::A1.offset(-1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let Some(file) = self.file().offset(file_delta) else {
            return None;
        };
        let Some(rank) = self.rank().offset(rank_delta) else {
            return None;
        };
        Some(Self::new(file, rank))
    }

    /// The square one rank ahead of this one, from `color`'s point of view.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Square, Color};
    /// assert_eq!(Square::E3.forward(Color::White), Some(Square::E4));
    /// assert_eq!(Square::E3.forward(Color::Black), Some(Square::E2));
    /// assert_eq!(Square::E8.forward(Color::White), None);
    /// ```
    #[inline(always)]
    pub const fn forward(&self, color: Color) -> Option<Self> {
        match color {
            Color::White => self.offset(0, 1),
            Color::Black => self.offset(0, -1),
        }
    }

    /// The square one rank behind this one, from `color`'s point of view.
    #[inline(always)]
    pub const fn backward(&self, color: Color) -> Option<Self> {
        self.forward(color.opponent())
    }

    /// Parses a square written in algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_uci("c4").unwrap(), Square::C4);
    /// assert!(Square::from_uci("z0").is_err());
    /// assert!(Square::from_uci("c44").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid Square string: Expected 2 characters. Got {square:?}");
        };
        Ok(Self::new(File::from_char(file)?, Rank::from_char(rank)?))
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<usize> for Square {
    type Error = anyhow::Error;
    #[inline(always)]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

macro_rules! impl_from_str {
    ($type:ty) => {
        impl FromStr for $type {
            type Err = anyhow::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut chars = s.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    bail!(
                        "Invalid str for {}: Must be a single character. Got {s:?}",
                        stringify!($type)
                    );
                };
                Self::from_char(c)
            }
        }
    };
}

impl_from_str!(File);
impl_from_str!(Rank);

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

/// A row of the board, `1` through `8`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Rank(pub(crate) u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    pub const COUNT: usize = 8;

    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Parses a rank from its digit, `'1'` through `'8'`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Rank;
    /// assert_eq!(Rank::from_char('3').unwrap(), Rank::THREE);
    /// assert!(Rank::from_char('9').is_err());
    /// ```
    pub fn from_char(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(Self(rank as u8 - b'1')),
            _ => Err(anyhow!(
                "Invalid Rank char: Expected a digit in [1, 8]. Got {rank:?}"
            )),
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'1') as char
    }

    /// Offsets this rank by `delta`, if the result is on the board.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let rank = self.0 as i8 + delta;
        if rank >= 0 && rank < Self::COUNT as i8 {
            Some(Self(rank as u8))
        } else {
            None
        }
    }

    /// The rank `color`'s pieces start on.
    #[inline(always)]
    pub const fn first(color: Color) -> Self {
        [Self::ONE, Self::EIGHT][color.index()]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.char().fmt(f)
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.char(), self.0)
    }
}

/// A column of the board, `a` through `h`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct File(pub(crate) u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    pub const COUNT: usize = 8;

    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Parses a file from its lowercase letter, `'a'` through `'h'`.
    ///
    /// # Example
    /// ```
    /// # use gambit::File;
    /// assert_eq!(File::from_char('e').unwrap(), File::E);
    /// assert!(File::from_char('E').is_err());
    /// ```
    pub fn from_char(file: char) -> Result<Self> {
        match file {
            'a'..='h' => Ok(Self(file as u8 - b'a')),
            _ => Err(anyhow!(
                "Invalid File char: Expected a letter in [a, h]. Got {file:?}"
            )),
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'a') as char
    }

    /// Offsets this file by `delta`, if the result is on the board.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let file = self.0 as i8 + delta;
        if file >= 0 && file < Self::COUNT as i8 {
            Some(Self(file as u8))
        } else {
            None
        }
    }
}

impl<T> Index<File> for [T; File::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: File) -> &Self::Output {
        &self[index.index()]
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.char().fmt(f)
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.char(), self.0)
    }
}
