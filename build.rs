/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Searches for magic numbers for rook and bishop attacks and writes them, along with the
//! attack tables they index into, to `$OUT_DIR/magics.rs`.

use std::{
    env,
    fmt::LowerHex,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

#[allow(dead_code)]
#[path = "src/board/prng.rs"]
mod prng;

use prng::XoShiRo;

/// Fixed seed for the magic search, so every build emits identical tables.
const MAGIC_SEED: u64 = 0x5EED_0F_0BAD_CAFE;

const ROOK_DELTAS: [(i8, i8); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];
const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// A solved magic for one square.
struct Magic {
    mask: u64,
    magic: u64,
    shift: u8,
    offset: u32,
}

#[inline(always)]
fn on_board(file: i8, rank: i8) -> bool {
    (0..8).contains(&file) && (0..8).contains(&rank)
}

#[inline(always)]
fn bit(file: i8, rank: i8) -> u64 {
    1 << (rank * 8 + file)
}

/// Squares whose occupancy can change the attacks from `square`.
///
/// The last square along each ray is never relevant: a piece there blocks nothing beyond it.
fn relevant_mask(square: usize, deltas: &[(i8, i8)]) -> u64 {
    let (file, rank) = ((square % 8) as i8, (square / 8) as i8);
    let mut mask = 0;

    for &(df, dr) in deltas {
        let (mut f, mut r) = (file + df, rank + dr);
        while on_board(f + df, r + dr) {
            mask |= bit(f, r);
            f += df;
            r += dr;
        }
    }

    mask
}

/// Ray-traced attacks from `square`, stopping at (and including) the first blocker in each direction.
fn sliding_attacks(square: usize, occupied: u64, deltas: &[(i8, i8)]) -> u64 {
    let (file, rank) = ((square % 8) as i8, (square / 8) as i8);
    let mut attacks = 0;

    for &(df, dr) in deltas {
        let (mut f, mut r) = (file + df, rank + dr);
        while on_board(f, r) {
            attacks |= bit(f, r);
            if occupied & bit(f, r) != 0 {
                break;
            }
            f += df;
            r += dr;
        }
    }

    attacks
}

/// Every subset of `mask`, starting with the empty set, via the Carry-Rippler trick.
fn subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// Searches for a magic for `square`, appending its attack table to `table`.
fn find_magic(
    rng: &mut XoShiRo,
    square: usize,
    deltas: &[(i8, i8)],
    table: &mut Vec<u64>,
) -> Magic {
    let mask = relevant_mask(square, deltas);
    let bits = mask.count_ones();
    let shift = (64 - bits) as u8;
    let occupancies = subsets(mask);
    let attacks: Vec<u64> = occupancies
        .iter()
        .map(|&occ| sliding_attacks(square, occ, deltas))
        .collect();

    let mut slots: Vec<Option<u64>> = vec![None; 1 << bits];

    loop {
        let magic = rng.get_sparse();

        // Candidates that leave the top byte of the product sparse rarely work.
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        slots.iter_mut().for_each(|slot| *slot = None);

        let collision_free = occupancies.iter().zip(&attacks).all(|(&occ, &attack)| {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            match slots[index] {
                None => {
                    slots[index] = Some(attack);
                    true
                }
                // Constructive collisions are fine
                Some(existing) => existing == attack,
            }
        });

        if collision_free {
            let offset = table.len() as u32;
            // Unreached slots are never looked up, since every reachable occupancy was hashed above
            table.extend(slots.iter().map(|slot| slot.unwrap_or_default()));
            return Magic {
                mask,
                magic,
                shift,
                offset,
            };
        }
    }
}

fn dump_magics<W: Write>(w: &mut W, name: &str, magics: &[Magic]) -> io::Result<()> {
    writeln!(w, "pub(crate) const {name}: [MagicEntry; {}] = [", magics.len())?;
    for m in magics {
        writeln!(
            w,
            "    MagicEntry {{ mask: 0x{:016x}, magic: 0x{:016x}, shift: {}, offset: {} }},",
            m.mask, m.magic, m.shift, m.offset
        )?;
    }
    writeln!(w, "];")
}

fn dump_slice<W: Write, T: LowerHex>(
    w: &mut W,
    name: &str,
    tname: &str,
    slice: &[T],
) -> io::Result<()> {
    write!(w, "pub(crate) static {name}: [{tname}; {}] = [", slice.len())?;
    for v in slice {
        write!(w, "0x{v:x},")?;
    }
    writeln!(w, "];")
}

fn generate() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
    let dest = Path::new(&out_dir).join("magics.rs");
    let mut f = BufWriter::new(File::create(dest)?);

    let mut rng = XoShiRo::from_seed(MAGIC_SEED);

    let mut rook_table = Vec::new();
    let rook_magics: Vec<Magic> = (0..64)
        .map(|sq| find_magic(&mut rng, sq, &ROOK_DELTAS, &mut rook_table))
        .collect();

    let mut bishop_table = Vec::new();
    let bishop_magics: Vec<Magic> = (0..64)
        .map(|sq| find_magic(&mut rng, sq, &BISHOP_DELTAS, &mut bishop_table))
        .collect();

    writeln!(f, "// @generated by build.rs. Do not edit.")?;
    dump_magics(&mut f, "ROOK_MAGICS", &rook_magics)?;
    dump_magics(&mut f, "BISHOP_MAGICS", &bishop_magics)?;
    dump_slice(&mut f, "ROOK_ATTACK_TABLE", "u64", &rook_table)?;
    dump_slice(&mut f, "BISHOP_ATTACK_TABLE", "u64", &bishop_table)?;

    f.flush()
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/board/prng.rs");
    generate()
}
