/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Attack lookups for every piece on every square.
//!
//! Leaper and pawn tables are computed at compile time by `const` evaluation. Slider tables are
//! indexed by magic multiplication; the magics and the tables they index are found by `build.rs`.

use super::{Bitboard, Color, Square};

// Pre-generated magics: ROOK_MAGICS, BISHOP_MAGICS, ROOK_ATTACK_TABLE, BISHOP_ATTACK_TABLE
include!(concat!(env!("OUT_DIR"), "/magics.rs"));

/// Deltas `(file, rank)` for the Rook.
const ROOK_DELTAS: [(i8, i8); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Deltas `(file, rank)` for the Bishop.
const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Deltas `(file, rank)` for the King, which are also the eight ray directions.
const KING_DELTAS: [(i8, i8); 8] = [
    ROOK_DELTAS[0],
    ROOK_DELTAS[1],
    ROOK_DELTAS[2],
    ROOK_DELTAS[3],
    BISHOP_DELTAS[0],
    BISHOP_DELTAS[1],
    BISHOP_DELTAS[2],
    BISHOP_DELTAS[3],
];

/// Deltas `(file, rank)` for the Knight.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

const KNIGHT_ATTACKS: [Bitboard; Square::COUNT] = generate_leaper_attacks(&KNIGHT_DELTAS);
const KING_ATTACKS: [Bitboard; Square::COUNT] = generate_leaper_attacks(&KING_DELTAS);
const ROOK_RAYS: [Bitboard; Square::COUNT] = generate_rider_rays(&ROOK_DELTAS);
const BISHOP_RAYS: [Bitboard; Square::COUNT] = generate_rider_rays(&BISHOP_DELTAS);
const PAWN_ATTACKS: [[Bitboard; Square::COUNT]; Color::COUNT] = [
    generate_pawn_attacks(Color::White),
    generate_pawn_attacks(Color::Black),
];

/// Squares strictly between any two squares that share a rank, file or diagonal; empty otherwise.
const RAY_BETWEEN: [[Bitboard; Square::COUNT]; Square::COUNT] = {
    let mut rays = [[Bitboard::EMPTY_BOARD; Square::COUNT]; Square::COUNT];

    let mut i = 0;
    while i < Square::COUNT {
        let from = Square::from_index_unchecked(i);
        let mut j = 0;
        while j < KING_DELTAS.len() {
            let (df, dr) = KING_DELTAS[j];
            let mut between = Bitboard::EMPTY_BOARD;
            let mut to = from;

            while let Some(next) = to.offset(df, dr) {
                rays[i][next.index()] = between;
                between = between.or(next.bitboard());
                to = next;
            }

            j += 1;
        }
        i += 1;
    }

    rays
};

/// A solved magic for a single square.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u8,
    offset: u32,
}

impl MagicEntry {
    /// Index into the attack table for the relevant bits of `blockers`.
    #[inline(always)]
    const fn index(&self, blockers: Bitboard) -> usize {
        let hash = (blockers.inner() & self.mask).wrapping_mul(self.magic);
        self.offset as usize + (hash >> self.shift) as usize
    }
}

/// Squares strictly between `from` and `to`, if they are aligned.
///
/// # Example
/// ```
/// # use gambit::*;
/// assert_eq!(ray_between(Square::A1, Square::A4), Square::A2.bitboard() | Square::A3);
/// assert_eq!(ray_between(Square::A1, Square::B3), Bitboard::EMPTY_BOARD);
/// ```
#[inline(always)]
pub const fn ray_between(from: Square, to: Square) -> Bitboard {
    RAY_BETWEEN[from.index()][to.index()]
}

/// Rook attacks from `square`, stopping at (and including) the first blocker in each direction.
///
/// # Example
/// ```
/// # use gambit::*;
/// let attacks = rook_attacks(Square::A1, Square::A3.bitboard());
/// assert!(attacks.intersects(Square::A3));
/// assert!(!attacks.intersects(Square::A4));
/// assert_eq!(attacks.population(), 2 + 7);
/// ```
#[inline(always)]
pub fn rook_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    Bitboard::new(ROOK_ATTACK_TABLE[ROOK_MAGICS[square.index()].index(blockers)])
}

/// Bishop attacks from `square`, stopping at (and including) the first blocker in each direction.
#[inline(always)]
pub fn bishop_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    Bitboard::new(BISHOP_ATTACK_TABLE[BISHOP_MAGICS[square.index()].index(blockers)])
}

/// The union of [`rook_attacks`] and [`bishop_attacks`].
#[inline(always)]
pub fn queen_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    rook_attacks(square, blockers) | bishop_attacks(square, blockers)
}

/// Rook attacks from `square` on an empty board.
#[inline(always)]
pub const fn rook_rays(square: Square) -> Bitboard {
    ROOK_RAYS[square.index()]
}

/// Bishop attacks from `square` on an empty board.
#[inline(always)]
pub const fn bishop_rays(square: Square) -> Bitboard {
    BISHOP_RAYS[square.index()]
}

#[inline(always)]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square.index()]
}

#[inline(always)]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square.index()]
}

/// Squares a pawn of `color` on `square` attacks diagonally.
///
/// # Example
/// ```
/// # use gambit::*;
/// assert_eq!(pawn_attacks(Square::A2, Color::White), Square::B3.bitboard());
/// assert_eq!(pawn_attacks(Square::E5, Color::Black), Square::D4.bitboard() | Square::F4);
/// ```
#[inline(always)]
pub const fn pawn_attacks(square: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][square.index()]
}

const fn generate_pawn_attacks(color: Color) -> [Bitboard; Square::COUNT] {
    let mut boards = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let forward = Bitboard::from_square(Square::from_index_unchecked(i)).forward(color);
        boards[i] = forward.east().or(forward.west());
        i += 1;
    }
    boards
}

/// Leapers jump straight to a square a fixed distance away, so each delta contributes at most one square.
const fn generate_leaper_attacks(deltas: &[(i8, i8)]) -> [Bitboard; Square::COUNT] {
    let mut attacks = [Bitboard::EMPTY_BOARD; Square::COUNT];

    let mut i = 0;
    while i < Square::COUNT {
        let square = Square::from_index_unchecked(i);
        let mut j = 0;
        while j < deltas.len() {
            let (df, dr) = deltas[j];
            if let Some(target) = square.offset(df, dr) {
                attacks[i] = attacks[i].or(target.bitboard());
            }
            j += 1;
        }
        i += 1;
    }

    attacks
}

/// Riders slide along each delta until the edge of the board.
const fn generate_rider_rays(deltas: &[(i8, i8)]) -> [Bitboard; Square::COUNT] {
    let mut rays = [Bitboard::EMPTY_BOARD; Square::COUNT];

    let mut i = 0;
    while i < Square::COUNT {
        let mut j = 0;
        while j < deltas.len() {
            let (df, dr) = deltas[j];
            let mut ray = Square::from_index_unchecked(i);
            while let Some(next) = ray.offset(df, dr) {
                rays[i] = rays[i].or(next.bitboard());
                ray = next;
            }
            j += 1;
        }
        i += 1;
    }

    rays
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Slow reference implementation to validate the magic tables against.
    fn traced_attacks(square: Square, blockers: Bitboard, deltas: &[(i8, i8)]) -> Bitboard {
        let mut attacks = Bitboard::EMPTY_BOARD;
        for &(df, dr) in deltas {
            let mut ray = square;
            while let Some(next) = ray.offset(df, dr) {
                attacks.set(next);
                if blockers.intersects(next) {
                    break;
                }
                ray = next;
            }
        }
        attacks
    }

    #[test]
    fn test_rook_blockers() {
        // . . . X . . . X
        // . . . . . . . .
        // . . . X . . . .
        // . . . . . . . .
        // . . . . . . . X
        // . . X . . . . .
        // . . . X . X . .
        // . . . . . . . .
        let blockers =
            Bitboard::new(0b1000100000000000000010000000000010000000000001000010100000000000);
        let expected: Bitboard = [
            Square::D2,
            Square::D3,
            Square::D5,
            Square::D6,
            Square::A4,
            Square::B4,
            Square::C4,
            Square::E4,
            Square::F4,
            Square::G4,
            Square::H4,
        ]
        .into_iter()
        .collect();

        assert_eq!(rook_attacks(Square::D4, blockers), expected);
    }

    #[test]
    fn test_magic_tables_match_ray_tracing() {
        let blocker_sets = [
            Bitboard::EMPTY_BOARD,
            Bitboard::FULL_BOARD,
            Bitboard::RANK_2 | Bitboard::RANK_7,
            Bitboard::new(0x0000_2400_0042_1800),
            Bitboard::new(0x8142_2418_1824_4281),
        ];
        for square in Square::iter() {
            for &blockers in &blocker_sets {
                assert_eq!(
                    rook_attacks(square, blockers),
                    traced_attacks(square, blockers, &ROOK_DELTAS),
                    "rook on {square} with blockers {blockers:?}"
                );
                assert_eq!(
                    bishop_attacks(square, blockers),
                    traced_attacks(square, blockers, &BISHOP_DELTAS),
                    "bishop on {square} with blockers {blockers:?}"
                );
            }
        }
    }

    #[test]
    fn test_leaper_tables() {
        assert_eq!(knight_attacks(Square::A1), Square::B3.bitboard() | Square::C2);
        assert_eq!(king_attacks(Square::E4).population(), 8);
        assert_eq!(king_attacks(Square::H8).population(), 3);
        assert_eq!(pawn_attacks(Square::E8, Color::White), Bitboard::EMPTY_BOARD);
        assert_eq!(pawn_attacks(Square::H2, Color::White), Square::G3.bitboard());
    }

    #[test]
    fn test_ray_between() {
        assert_eq!(
            ray_between(Square::A1, Square::H8),
            [Square::B2, Square::C3, Square::D4, Square::E5, Square::F6, Square::G7]
                .into_iter()
                .collect()
        );
        assert_eq!(ray_between(Square::E1, Square::E2), Bitboard::EMPTY_BOARD);
        assert_eq!(ray_between(Square::H1, Square::A1).population(), 6);
        assert_eq!(ray_between(Square::D4, Square::D4), Bitboard::EMPTY_BOARD);
    }

    #[test]
    fn test_empty_board_rays() {
        assert_eq!(rook_rays(Square::A1).population(), 14);
        assert_eq!(bishop_rays(Square::D4).population(), 13);
        assert_eq!(rook_rays(Square::E4), rook_attacks(Square::E4, Bitboard::EMPTY_BOARD));
    }
}
