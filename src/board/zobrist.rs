/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Board, CastlingRights, Color, File, Piece, Position, Square, XoShiRo};

/// Keys for Zobrist hashing, generated at compile time from a fixed seed.
const ZOBRIST_TABLE: ZobristHashTable = ZobristHashTable::new();

/// A 64-bit fingerprint of everything that makes two positions equivalent for repetition:
/// piece placement, castling rights, en passant file and side to move.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct ZobristKey(u64);

impl ZobristKey {
    /// Computes the key of `position` from scratch.
    ///
    /// A [`Position`] maintains its key incrementally; this is how that key is checked.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let pos = Position::default();
    /// assert_eq!(ZobristKey::new(&pos), pos.key());
    /// assert_ne!(pos.key().inner(), 0);
    /// ```
    #[inline(always)]
    pub fn new(position: &Position) -> Self {
        Self::from_parts(
            position.board(),
            position.castling_rights(),
            position.ep_square(),
            position.side_to_move(),
        )
    }

    /// Computes a key from the individual components of a [`Position`].
    pub fn from_parts(
        board: &Board,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        side_to_move: Color,
    ) -> Self {
        let mut key = Self::default();

        for (square, piece) in board.iter() {
            key.hash_piece(square, piece);
        }
        key.hash_castling_rights(castling_rights);
        key.hash_ep_square(ep_square);
        key.hash_side_to_move(side_to_move);

        key
    }

    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Toggles `piece` on `square` in or out of this key.
    ///
    /// Hashing is done with XOR, so applying the same update twice undoes it.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut key = ZobristKey::default();
    /// key.hash_piece(Square::D7, Piece::BLACK_PAWN);
    /// assert_ne!(key, ZobristKey::default());
    ///
    /// let mut other = ZobristKey::default();
    /// other.hash_piece(Square::D7, Piece::WHITE_PAWN);
    /// assert_ne!(key, other);
    ///
    /// key.hash_piece(Square::D7, Piece::BLACK_PAWN);
    /// assert_eq!(key, ZobristKey::default());
    /// ```
    #[inline(always)]
    pub fn hash_piece(&mut self, square: Square, piece: Piece) {
        self.0 ^= ZOBRIST_TABLE.piece_keys[square][piece];
    }

    /// Toggles the key for this exact set of castling rights.
    ///
    /// The empty set has a key too, so moving between any two sets always changes the hash.
    #[inline(always)]
    pub fn hash_castling_rights(&mut self, castling_rights: CastlingRights) {
        self.0 ^= ZOBRIST_TABLE.castling_keys[castling_rights.bits() as usize];
    }

    /// Toggles the key for the file of the en passant square, if there is one.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut none = ZobristKey::default();
    /// none.hash_ep_square(None);
    /// assert_eq!(none, ZobristKey::default());
    ///
    /// // Only the file matters
    /// let mut e3 = ZobristKey::default();
    /// e3.hash_ep_square(Some(Square::E3));
    /// let mut e6 = ZobristKey::default();
    /// e6.hash_ep_square(Some(Square::E6));
    /// assert_eq!(e3, e6);
    /// ```
    #[inline(always)]
    pub fn hash_ep_square(&mut self, ep_square: Option<Square>) {
        if let Some(square) = ep_square {
            self.0 ^= ZOBRIST_TABLE.ep_keys[square.file()];
        }
    }

    /// Toggles the side-to-move key if `color` is Black. White's key is `0`.
    #[inline(always)]
    pub fn hash_side_to_move(&mut self, color: Color) {
        if !color.is_white() {
            self.0 ^= ZOBRIST_TABLE.black_key;
        }
    }

    /// Toggles the side-to-move key unconditionally, as done once per move.
    #[inline(always)]
    pub fn hash_turn(&mut self) {
        self.0 ^= ZOBRIST_TABLE.black_key;
    }
}

impl fmt::Display for ZobristKey {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[derive(Debug)]
struct ZobristHashTable {
    /// One key for every piece on every square.
    piece_keys: [[u64; Piece::COUNT]; Square::COUNT],

    /// One key for every combination of castling rights.
    castling_keys: [u64; CastlingRights::COUNT],

    /// One key for every file en passant can happen on.
    ep_keys: [u64; File::COUNT],

    /// Hashed in when Black is to move.
    black_key: u64,
}

impl ZobristHashTable {
    const fn new() -> Self {
        let mut piece_keys = [[0; Piece::COUNT]; Square::COUNT];
        let mut castling_keys = [0; CastlingRights::COUNT];
        let mut ep_keys = [0; File::COUNT];

        let mut prng = XoShiRo::new();
        let mut key;

        let mut i = 0;
        while i < Square::COUNT {
            let mut j = 0;
            while j < Piece::COUNT {
                (key, prng) = prng.get_next_const();
                piece_keys[i][j] = key;
                j += 1;
            }
            i += 1;
        }

        i = 0;
        while i < CastlingRights::COUNT {
            (key, prng) = prng.get_next_const();
            castling_keys[i] = key;
            i += 1;
        }

        i = 0;
        while i < File::COUNT {
            (key, prng) = prng.get_next_const();
            ep_keys[i] = key;
            i += 1;
        }

        (key, _) = prng.get_next_const();

        Self {
            piece_keys,
            castling_keys,
            ep_keys,
            black_key: key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        let table = &ZOBRIST_TABLE;
        let mut keys: Vec<u64> = table.piece_keys.iter().flatten().copied().collect();
        keys.extend(table.castling_keys);
        keys.extend(table.ep_keys);
        keys.push(table.black_key);

        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert!(!keys.contains(&0));
    }

    #[test]
    fn test_side_to_move_changes_key() {
        let mut white = ZobristKey::default();
        white.hash_side_to_move(Color::White);
        assert_eq!(white, ZobristKey::default());

        let mut black = ZobristKey::default();
        black.hash_side_to_move(Color::Black);
        let mut turn = ZobristKey::default();
        turn.hash_turn();
        assert_eq!(black, turn);
    }
}
