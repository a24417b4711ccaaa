/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::debug;

use super::{Move, MoveList, Position};

/// Perform a perft at the specified depth, returning the number of leaf positions (nodes) reachable.
///
/// Moves are made and undone on `position` in place, which is left as it was found.
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// # Example
/// ```
/// # use gambit::*;
/// let mut pos = Position::default();
/// assert_eq!(perft(&mut pos, 3), 8_902);
/// assert_eq!(pos, Position::default());
/// ```
pub fn perft(position: &mut Position, depth: usize) -> u64 {
    let nodes = perft_recursive(position, depth);
    debug!(depth, nodes, fen = %position, "perft");
    nodes
}

/// Perform a splitperft at the specified depth, returning the number of nodes reachable after
/// each move available at the root, in generation order.
///
/// # Example
/// ```
/// # use gambit::*;
/// let mut pos = Position::default();
/// let split = splitperft(&mut pos, 2);
/// assert_eq!(split.len(), 20);
/// assert!(split.iter().all(|&(_, nodes)| nodes == 20));
/// ```
pub fn splitperft(position: &mut Position, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let split: Vec<(Move, u64)> = position
        .legal_moves()
        .into_iter()
        .map(|mv| {
            position.make_move(mv);
            let nodes = perft_recursive(position, depth - 1);
            position.undo_move(mv);
            (mv, nodes)
        })
        .collect();

    let nodes: u64 = split.iter().map(|(_, nodes)| nodes).sum();
    debug!(depth, nodes, fen = %position, "splitperft");
    split
}

fn perft_recursive(position: &mut Position, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    // One list per ply, living on the stack
    let mut moves = MoveList::new();
    position.generate_legal_moves_into(&mut moves);

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        position.make_move(mv);
        nodes += perft_recursive(position, depth - 1);
        position.undo_move(mv);
    }
    nodes
}

impl Position {
    /// Convenience wrapper for [`perft`], run on a copy of this position.
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> u64 {
        perft(&mut self.clone(), depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    #[test]
    fn test_perft_depth_zero() {
        assert_eq!(Position::default().perft(0), 1);
        assert!(splitperft(&mut Position::default(), 0).is_empty());
    }

    #[test]
    fn test_splitperft_sums_to_perft() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let split = splitperft(&mut pos, 2);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2039);
        assert_eq!(pos.to_fen(), FEN_KIWIPETE);
    }
}
