/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Attack lookups for every piece, including the generated magic tables.
mod attacks;

/// Bitboard representation of sets of squares.
mod bitboard;

/// FEN parsing and serialization for [`Position`].
mod fen;

/// The [`Game`] wrapper consumed by user interfaces.
mod game;

/// Legal move generation.
mod movegen;

/// The [`Move`] type and its UCI notation.
mod moves;

/// Node counting for testing move generation.
mod perft;

/// Colors, piece kinds and pieces.
mod piece;

/// Board state: [`Board`], [`CastlingRights`] and [`Position`] with make/undo.
mod position;

/// Pseudo-random number generation, shared with the build script.
mod prng;

/// Squares, ranks and files.
mod square;

/// Draw, mate and stalemate detection.
mod status;

/// Square-indexed lookup tables.
mod table;

/// Misc constants.
mod utils;

/// Zobrist hashing of positions.
mod zobrist;

pub use attacks::*;
pub use bitboard::*;
pub use game::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use prng::*;
pub use square::*;
pub use status::*;
pub use table::*;
pub use utils::*;
pub use zobrist::*;
