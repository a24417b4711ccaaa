/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    bishop_attacks, bishop_rays, king_attacks, knight_attacks, pawn_attacks, queen_attacks,
    ray_between, rook_attacks, rook_rays, Bitboard, CastlingRights, File, Move, MoveKind,
    MoveList, Piece, PieceKind, Position, Square, Table,
};

/// Everything the move generator needs to know about checks and pins for the side to move.
#[derive(Debug, Clone)]
struct LegalMasks {
    /// The side-to-move's King.
    king: Square,

    /// Enemy pieces attacking the King.
    checkers: Bitboard,

    /// Squares a non-King move may land on: anything when not in check, the checker and the
    /// path to it when in single check, and nothing when in double check.
    checkmask: Bitboard,

    /// Squares each piece may move to without exposing its King. Unpinned pieces get the full board.
    pin_masks: Table<Bitboard>,
}

impl LegalMasks {
    /// Legal destinations for a non-King piece on `from`.
    #[inline(always)]
    fn for_piece(&self, from: Square) -> Bitboard {
        self.checkmask & self.pin_masks[from]
    }
}

impl Position {
    /// Generate all legal moves from the current position.
    ///
    /// Moves come in no particular order.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let pos = Position::default();
    /// assert_eq!(pos.legal_moves().len(), 20);
    ///
    /// let kiwipete = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(kiwipete.legal_moves().len(), 48);
    /// ```
    #[inline(always)]
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_legal_moves_into(&mut moves);
        moves
    }

    /// Appends all legal moves from the current position onto `moves`.
    pub fn generate_legal_moves_into(&self, moves: &mut MoveList) {
        let Some(masks) = self.legal_masks() else {
            return;
        };

        // In double check, only the King can move
        if masks.checkers.population() < 2 {
            self.generate_pawn_moves(&masks, moves);
            for kind in [
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen,
            ] {
                self.generate_piece_moves(&masks, kind, moves);
            }
        }

        self.generate_king_moves(&masks, moves);

        if masks.checkers.is_empty() {
            self.generate_castling_moves(&masks, moves);
        }
    }

    /// Returns `true` if the side to move has at least one legal move.
    #[inline(always)]
    pub fn has_legal_moves(&self) -> bool {
        !self.legal_moves().is_empty()
    }

    /// Computes the checkers, checkmask and pin masks for the side to move.
    ///
    /// Returns `None` only if the side to move has no King.
    fn legal_masks(&self) -> Option<LegalMasks> {
        let color = self.side_to_move();
        let opponent = color.opponent();
        let board = self.board();
        let king = self.king_square(color)?;

        let mut masks = LegalMasks {
            king,
            // Leapers can only ever check, never pin
            checkers: (knight_attacks(king) & board.knights(opponent))
                | (pawn_attacks(king, color) & board.pawns(opponent)),
            checkmask: Bitboard::FULL_BOARD,
            pin_masks: Table::splat(Bitboard::FULL_BOARD),
        };

        self.scan_sliders(
            &mut masks,
            rook_rays(king) & board.orthogonal_sliders(opponent),
        );
        self.scan_sliders(
            &mut masks,
            bishop_rays(king) & board.diagonal_sliders(opponent),
        );

        masks.checkmask = match masks.checkers.population() {
            0 => Bitboard::FULL_BOARD,
            1 => masks.checkers | ray_between(king, masks.checkers.lsb()?),
            _ => Bitboard::EMPTY_BOARD,
        };

        Some(masks)
    }

    /// Classifies every enemy slider on an open line to the King as a checker, a pinner, or neither.
    ///
    /// `sliders` must already be limited to pieces that could attack the King along their own
    /// kind of line on an empty board.
    fn scan_sliders(&self, masks: &mut LegalMasks, sliders: Bitboard) {
        let friendlies = self.board().color(self.side_to_move());
        let occupied = self.board().occupied();

        for slider in sliders {
            let between = ray_between(masks.king, slider);
            let blockers = between & occupied;

            match blockers.population() {
                0 => masks.checkers |= slider,
                1 => {
                    if let Some(pinned) = (blockers & friendlies).lsb() {
                        masks.pin_masks[pinned] = between | slider;
                    }
                }
                _ => {}
            }
        }
    }

    /// Knights, Bishops, Rooks and Queens.
    fn generate_piece_moves(&self, masks: &LegalMasks, kind: PieceKind, moves: &mut MoveList) {
        let color = self.side_to_move();
        let board = self.board();
        let piece = Piece::new(color, kind);
        let occupied = board.occupied();
        let not_friendly = !board.color(color);

        for from in board.piece(piece) {
            let attacks = match kind {
                PieceKind::Knight => knight_attacks(from),
                PieceKind::Bishop => bishop_attacks(from, occupied),
                PieceKind::Rook => rook_attacks(from, occupied),
                _ => queen_attacks(from, occupied),
            };

            for to in attacks & not_friendly & masks.for_piece(from) {
                moves.push(Move::new(from, to, piece, board.piece_at(to)));
            }
        }
    }

    fn generate_pawn_moves(&self, masks: &LegalMasks, moves: &mut MoveList) {
        let color = self.side_to_move();
        let board = self.board();
        let pawn = Piece::new(color, PieceKind::Pawn);
        let empty = board.empty();
        let enemies = board.color(color.opponent());
        let promotion_rank = Bitboard::eighth_rank(color);

        for from in board.pawns(color) {
            let single = from.bitboard().forward(color) & empty;
            let double = (single & Bitboard::third_rank(color)).forward(color) & empty;
            let captures = pawn_attacks(from, color) & enemies;

            for to in (single | double | captures) & masks.for_piece(from) {
                let captured = board.piece_at(to);

                if promotion_rank.intersects(to) {
                    for promotion in PieceKind::promotions() {
                        moves.push(Move::new_promotion(from, to, pawn, captured, promotion));
                    }
                } else if double.intersects(to) {
                    moves.push(Move::new_special(from, to, pawn, MoveKind::PawnDoublePush));
                } else {
                    moves.push(Move::new(from, to, pawn, captured));
                }
            }

            if let Some(ep_square) = self.ep_square() {
                if pawn_attacks(from, color).intersects(ep_square)
                    && self.is_legal_en_passant(masks, from, ep_square)
                {
                    moves.push(Move::new_special(from, ep_square, pawn, MoveKind::EnPassant));
                }
            }
        }
    }

    /// En passant removes two pieces from the board at once, which the pin masks cannot account for.
    /// The capture is simulated on the occupancy, and the King must not be attacked afterwards.
    fn is_legal_en_passant(&self, masks: &LegalMasks, from: Square, ep_square: Square) -> bool {
        let color = self.side_to_move();
        let Some(victim) = ep_square.backward(color) else {
            return false;
        };

        let occupied = (self.board().occupied() ^ from ^ victim) | ep_square;
        let attackers = self.attackers_to_with(masks.king, color.opponent(), occupied);

        // The captured pawn no longer attacks anything
        (attackers & !victim.bitboard()).is_empty()
    }

    fn generate_king_moves(&self, masks: &LegalMasks, moves: &mut MoveList) {
        let color = self.side_to_move();
        let board = self.board();
        let king = Piece::new(color, PieceKind::King);

        // The King must not block attacks on the squares behind him
        let occupied = board.occupied() ^ masks.king;

        for to in king_attacks(masks.king) & !board.color(color) {
            if self
                .attackers_to_with(to, color.opponent(), occupied)
                .is_empty()
            {
                moves.push(Move::new(masks.king, to, king, board.piece_at(to)));
            }
        }
    }

    /// Castling moves for a King that is not in check.
    fn generate_castling_moves(&self, masks: &LegalMasks, moves: &mut MoveList) {
        let color = self.side_to_move();
        let opponent = color.opponent();
        let rights = self.castling_rights();
        let occupied = self.board().occupied();
        let king = Piece::new(color, PieceKind::King);
        let from = masks.king;

        for (right, kind, king_file, rook_file) in [
            (
                CastlingRights::kingside(color),
                MoveKind::ShortCastle,
                File::G,
                File::H,
            ),
            (
                CastlingRights::queenside(color),
                MoveKind::LongCastle,
                File::C,
                File::A,
            ),
        ] {
            if !rights.contains(right) {
                continue;
            }

            let rank = from.rank();
            let to = Square::new(king_file, rank);
            let rook = Square::new(rook_file, rank);

            if ray_between(from, rook).intersects(occupied) {
                continue;
            }

            // The King's start square was already checked, since the King is not in check
            let path = ray_between(from, to) | to;
            if path
                .into_iter()
                .all(|sq| !self.is_square_attacked(sq, opponent))
            {
                moves.push(Move::new_special(from, to, king, kind));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    fn moves_of(fen: &str) -> Vec<String> {
        let mut moves: Vec<String> = Position::from_fen(fen)
            .unwrap()
            .legal_moves()
            .iter()
            .map(Move::to_uci)
            .collect();
        moves.sort();
        moves
    }

    #[test]
    fn test_startpos_moves() {
        let moves = moves_of(crate::FEN_STARTPOS);
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&String::from("e2e4")));
        assert!(moves.contains(&String::from("g1f3")));
    }

    #[test]
    fn test_kiwipete_castling() {
        let moves = moves_of(FEN_KIWIPETE);
        assert!(moves.contains(&String::from("e1g1")));
        assert!(moves.contains(&String::from("e1c1")));
    }

    #[test]
    fn test_castling_through_attack_is_illegal() {
        // A black Rook on f8 covers f1
        let moves = moves_of("1k3r2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
        assert!(moves.contains(&String::from("e1c1")));

        // The b-file may be attacked when castling long, since the King never crosses it
        let moves = moves_of("1r4k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(moves.contains(&String::from("e1c1")));
    }

    #[test]
    fn test_castling_blocked() {
        let moves = moves_of("r3k2r/8/8/8/8/8/8/RN2K1nR w KQkq - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
        assert!(!moves.contains(&String::from("e1c1")));
    }

    #[test]
    fn test_no_castling_out_of_check() {
        let moves = moves_of("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        assert!(!moves.iter().any(|mv| mv == "e1g1" || mv == "e1c1"));
    }

    #[test]
    fn test_pinned_piece_stays_on_ray() {
        // The Bishop on d2 is pinned by the Bishop on a5
        let moves = moves_of("4k3/8/8/b7/8/8/3B4/4K3 w - - 0 1");
        let bishop_moves: Vec<_> = moves.iter().filter(|mv| mv.starts_with("d2")).collect();
        assert_eq!(bishop_moves, ["d2a5", "d2b4", "d2c3"]);
    }

    #[test]
    fn test_pinned_knight_cannot_move() {
        let moves = moves_of("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(!moves.iter().any(|mv| mv.starts_with("e2")));
    }

    #[test]
    fn test_single_check_must_be_resolved() {
        // The Rook on e8 checks, and the Knight can only interpose
        let moves = moves_of("k3r3/8/8/8/8/2N5/8/4K3 w - - 0 1");
        let knight_moves: Vec<_> = moves.iter().filter(|mv| mv.starts_with("c3")).collect();
        assert_eq!(knight_moves, ["c3e2", "c3e4"]);
    }

    #[test]
    fn test_double_check_only_king_moves() {
        let moves = moves_of("k3r3/8/8/8/8/3n4/8/4K3 w - - 0 1");
        assert!(moves.iter().all(|mv| mv.starts_with("e1")));
        assert!(!moves.is_empty());
    }

    #[test]
    fn test_king_cannot_retreat_along_check_ray() {
        let moves = moves_of("4k3/8/8/8/4r3/8/8/4K3 w - - 0 1");
        assert!(!moves.contains(&String::from("e1e2")));
        assert!(moves.contains(&String::from("e1d1")));
    }

    #[test]
    fn test_en_passant_discovered_check_is_illegal() {
        // Capturing en passant would remove both pawns from the 5th rank and expose the King to the Rook
        let moves = moves_of("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(!moves.contains(&String::from("e5d6")));
        assert!(moves.contains(&String::from("e5e6")));
    }

    #[test]
    fn test_en_passant_resolves_pawn_check() {
        // The d5 pawn just gave check by double pushing
        let moves = moves_of("8/8/8/3pP3/4K3/8/8/7k w - d6 0 1");
        assert!(moves.contains(&String::from("e5d6")));
    }

    #[test]
    fn test_promotions() {
        let moves = moves_of("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N w - - 0 1");
        for uci in ["b7b8q", "b7b8r", "b7b8b", "b7b8n", "b7a8q", "b7c8n"] {
            assert!(moves.contains(&String::from(uci)), "{uci}");
        }
    }

    #[test]
    fn test_checkmate_has_no_moves() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mv = Move::from_uci(&pos, "a1a8").unwrap();
        let mut pos = pos;
        pos.make_move(mv);
        assert!(pos.is_in_check());
        assert!(!pos.has_legal_moves());
    }
}
