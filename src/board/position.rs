/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use bitflags::bitflags;

use super::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks, Bitboard, Color,
    File, Move, Piece, PieceKind, Rank, Square, Table, ZobristKey,
};

bitflags! {
    /// Which castling moves each side may still make.
    ///
    /// A right only says that neither the King nor that Rook has moved; whether castling is
    /// possible right now is up to the move generator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 1;
        const WHITE_QUEENSIDE = 2;
        const BLACK_KINGSIDE = 4;
        const BLACK_QUEENSIDE = 8;
    }
}

impl CastlingRights {
    /// Number of distinct sets of castling rights.
    pub const COUNT: usize = 16;

    /// The kingside right of `color`.
    #[inline(always)]
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    /// The queenside right of `color`.
    #[inline(always)]
    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Rights that are lost forever once anything moves from, or is captured on, `square`.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// assert_eq!(CastlingRights::touched_by(Square::H1), CastlingRights::WHITE_KINGSIDE);
    /// assert_eq!(
    ///     CastlingRights::touched_by(Square::E8),
    ///     CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
    /// );
    /// assert!(CastlingRights::touched_by(Square::E4).is_empty());
    /// ```
    #[inline(always)]
    pub const fn touched_by(square: Square) -> Self {
        match square.index() {
            0 => Self::WHITE_QUEENSIDE,
            4 => Self::WHITE_KINGSIDE.union(Self::WHITE_QUEENSIDE),
            7 => Self::WHITE_KINGSIDE,
            56 => Self::BLACK_QUEENSIDE,
            60 => Self::BLACK_KINGSIDE.union(Self::BLACK_QUEENSIDE),
            63 => Self::BLACK_KINGSIDE,
            _ => Self::empty(),
        }
    }
}

impl fmt::Display for CastlingRights {
    /// Formats these rights as they appear in a FEN string, such as `KQkq`, `Kq` or `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// All pieces and their locations on a chess board.
///
/// Knows nothing about castling rights, en passant or move counters; see [`Position`].
///
/// Every piece is tracked twice: in a [`Bitboard`] per piece and per color, and in a
/// square-indexed mailbox. The two are only ever written together, through [`Board::place`] and [`Board::take`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Squares occupied by each [`Piece`].
    pieces: [Bitboard; Piece::COUNT],

    /// Squares occupied by each [`Color`].
    colors: [Bitboard; Color::COUNT],

    /// Squares occupied by anything.
    occupied: Bitboard,

    /// The piece on each square, if any.
    mailbox: Table<Option<Piece>>,
}

impl Board {
    /// An empty board.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            pieces: [Bitboard::EMPTY_BOARD; Piece::COUNT],
            colors: [Bitboard::EMPTY_BOARD; Color::COUNT],
            occupied: Bitboard::EMPTY_BOARD,
            mailbox: Table::splat(None),
        }
    }

    /// The board as it stands at the start of a standard game.
    pub fn standard() -> Self {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Self::new();
        for color in Color::all() {
            let first = Rank::first(color);
            let second = first.offset(if color.is_white() { 1 } else { -1 });
            for file in File::iter() {
                board.place(Piece::new(color, back_rank[file]), Square::new(file, first));
                if let Some(rank) = second {
                    board.place(Piece::new(color, PieceKind::Pawn), Square::new(file, rank));
                }
            }
        }
        board
    }

    /// Puts `piece` on `square`, which must be empty.
    #[inline(always)]
    pub(crate) fn place(&mut self, piece: Piece, square: Square) {
        self.pieces[piece].set(square);
        self.colors[piece.color()].set(square);
        self.occupied.set(square);
        self.mailbox[square] = Some(piece);
    }

    /// Removes and returns whatever was on `square`.
    #[inline(always)]
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.mailbox[square].take()?;
        self.pieces[piece].clear(square);
        self.colors[piece.color()].clear(square);
        self.occupied.clear(square);
        Some(piece)
    }

    /// The piece on `square`, if any.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square]
    }

    /// Squares occupied by `piece`.
    #[inline(always)]
    pub const fn piece(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Squares occupied by pieces of `color` and `kind`.
    #[inline(always)]
    pub const fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.piece(Piece::new(color, kind))
    }

    /// Squares occupied by `kind`, of either color.
    #[inline(always)]
    pub const fn kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces(Color::White, kind)
            .or(self.pieces(Color::Black, kind))
    }

    /// Squares occupied by `color`.
    #[inline(always)]
    pub const fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline(always)]
    pub const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline(always)]
    pub const fn empty(&self) -> Bitboard {
        self.occupied.not()
    }

    #[inline(always)]
    pub const fn pawns(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn knights(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Knight)
    }

    #[inline(always)]
    pub const fn king(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::King)
    }

    /// Rooks and Queens of `color`.
    #[inline(always)]
    pub const fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Rook)
            .or(self.pieces(color, PieceKind::Queen))
    }

    /// Bishops and Queens of `color`.
    #[inline(always)]
    pub const fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Bishop)
            .or(self.pieces(color, PieceKind::Queen))
    }

    /// Every occupied square and its piece, from `a1` to `h8`.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.mailbox
            .iter()
            .filter_map(|(square, piece)| piece.map(|p| (square, p)))
    }

    /// Returns `true` if the mailbox and all bitboards describe the same placement.
    pub fn is_consistent(&self) -> bool {
        let mut colors = [Bitboard::EMPTY_BOARD; Color::COUNT];
        let mut seen = Bitboard::EMPTY_BOARD;

        for piece in Piece::all() {
            let squares = self.piece(piece);
            // Piece bitboards must be mutually exclusive
            if seen.intersects(squares) {
                return false;
            }
            seen |= squares;
            colors[piece.color()] |= squares;

            if squares.iter().any(|sq| self.mailbox[sq] != Some(piece)) {
                return false;
            }
        }

        let mailbox_count = self.iter().count();
        mailbox_count == seen.population() as usize
            && colors == self.colors
            && seen == self.occupied
            && (colors[Color::White] & colors[Color::Black]).is_empty()
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |p| p.to_uci());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, " +----------------\n   a b c d e f g h")
    }
}

/// The irreversible parts of a [`Position`], saved before each move so it can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Undo {
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmove: usize,
    key: ZobristKey,
}

/// A complete game state: placement, side to move, castling rights, en passant target,
/// move clocks, an incrementally maintained [`ZobristKey`], and the history needed to undo moves.
///
/// A [`Position`] only changes through [`Position::make_move`] and [`Position::undo_move`].
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,

    side_to_move: Color,

    castling_rights: CastlingRights,

    /// Square a pawn may capture onto via en passant this ply.
    ep_square: Option<Square>,

    /// Plies since the last capture or pawn move.
    halfmove: usize,

    /// Starts at 1 and increments after each of Black's moves.
    fullmove: usize,

    key: ZobristKey,

    /// One entry per move made, most recent last.
    history: Vec<Undo>,
}

impl Position {
    /// A [`Position`] from its parts, with an empty history and a freshly computed key.
    pub(crate) fn from_parts(
        board: Board,
        side_to_move: Color,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        halfmove: usize,
        fullmove: usize,
    ) -> Self {
        let key = ZobristKey::from_parts(&board, castling_rights, ep_square, side_to_move);
        Self {
            board,
            side_to_move,
            castling_rights,
            ep_square,
            halfmove,
            fullmove,
            key,
            history: Vec::with_capacity(256),
        }
    }

    /// The standard starting position.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// assert_eq!(Position::new().to_fen(), FEN_STARTPOS);
    /// ```
    pub fn new() -> Self {
        Self::from_parts(
            Board::standard(),
            Color::White,
            CastlingRights::all(),
            None,
            0,
            1,
        )
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// The incrementally maintained Zobrist key.
    #[inline(always)]
    pub const fn key(&self) -> ZobristKey {
        self.key
    }

    /// Number of moves that can currently be undone.
    #[inline(always)]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Keys of the positions before each move in the history, oldest first.
    pub fn key_history(
        &self,
    ) -> impl DoubleEndedIterator<Item = ZobristKey> + ExactSizeIterator + '_ {
        self.history.iter().map(|undo| undo.key)
    }

    /// The piece on `square`, if any.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// The piece on the square with index `index`; `None` if empty or off the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let pos = Position::default();
    /// assert_eq!(pos.piece_at_index(4), Some(Piece::WHITE_KING));
    /// assert_eq!(pos.piece_at_index(32), None);
    /// assert_eq!(pos.piece_at_index(64), None);
    /// ```
    #[inline(always)]
    pub fn piece_at_index(&self, index: usize) -> Option<Piece> {
        Square::try_from(index)
            .ok()
            .and_then(|square| self.piece_at(square))
    }

    /// The square of `color`'s King.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king(color).lsb()
    }

    /// Every piece of `color` attacking `square`, given the current occupancy.
    #[inline(always)]
    pub fn attackers_to(&self, square: Square, color: Color) -> Bitboard {
        self.attackers_to_with(square, color, self.board.occupied())
    }

    /// Like [`Position::attackers_to`], but sliders see through the board as if `occupied` were the occupancy.
    pub(crate) fn attackers_to_with(
        &self,
        square: Square,
        color: Color,
        occupied: Bitboard,
    ) -> Bitboard {
        let board = &self.board;
        // A pawn of `color` attacks `square` exactly when a pawn of the other color on `square` would attack it back
        (pawn_attacks(square, color.opponent()) & board.pawns(color))
            | (knight_attacks(square) & board.knights(color))
            | (king_attacks(square) & board.king(color))
            | (rook_attacks(square, occupied) & board.orthogonal_sliders(color))
            | (bishop_attacks(square, occupied) & board.diagonal_sliders(color))
    }

    /// Returns `true` if any piece of `color` attacks `square`.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let pos = Position::default();
    /// assert!(pos.is_square_attacked(Square::F3, Color::White));
    /// assert!(!pos.is_square_attacked(Square::E4, Color::White));
    /// ```
    #[inline(always)]
    pub fn is_square_attacked(&self, square: Square, color: Color) -> bool {
        self.attackers_to(square, color).is_nonempty()
    }

    /// Pieces giving check to the side to move.
    #[inline(always)]
    pub fn checkers(&self) -> Bitboard {
        let color = self.side_to_move;
        self.king_square(color)
            .map_or(Bitboard::EMPTY_BOARD, |king| {
                self.attackers_to(king, color.opponent())
            })
    }

    /// Returns `true` if the side to move is in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        self.checkers().is_nonempty()
    }

    /// Puts `piece` on `square`, updating the key.
    #[inline(always)]
    fn place(&mut self, piece: Piece, square: Square) {
        self.board.place(piece, square);
        self.key.hash_piece(square, piece);
    }

    /// Removes the piece on `square`, updating the key.
    #[inline(always)]
    fn take(&mut self, square: Square) {
        if let Some(piece) = self.board.take(square) {
            self.key.hash_piece(square, piece);
        }
    }

    /// Applies `mv`, which must be a legal move for this position.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut pos = Position::default();
    /// let mv = Move::from_uci(&pos, "e2e4").unwrap();
    /// pos.make_move(mv);
    /// assert_eq!(pos.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    /// ```
    pub fn make_move(&mut self, mv: Move) {
        let color = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());

        self.history.push(Undo {
            castling_rights: self.castling_rights,
            ep_square: self.ep_square,
            halfmove: self.halfmove,
            key: self.key,
        });

        // Old castling and en passant keys come out; the new ones go back in once known
        self.key.hash_ep_square(self.ep_square.take());
        self.key.hash_castling_rights(self.castling_rights);

        self.take(from);

        if mv.is_capture() {
            self.take(mv.capture_square());
        }

        if let Some((rook_from, rook_to)) = mv.castling_rook_squares() {
            self.take(rook_from);
            self.place(Piece::new(color, PieceKind::Rook), rook_to);
        }

        let piece = match mv.promotion() {
            Some(promotion) => mv.piece().promoted(promotion),
            None => mv.piece(),
        };
        self.place(piece, to);

        self.castling_rights
            .remove(CastlingRights::touched_by(from) | CastlingRights::touched_by(to));
        self.key.hash_castling_rights(self.castling_rights);

        if mv.is_pawn_double_push() {
            self.ep_square = from.forward(color);
            self.key.hash_ep_square(self.ep_square);
        }

        if mv.piece().is_pawn() || mv.is_capture() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        self.fullmove += color.index();

        self.side_to_move = color.opponent();
        self.key.hash_turn();
    }

    /// Reverts `mv`, which must be the last move made. Does nothing if no move has been made.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let mut pos = Position::default();
    /// let before = pos.clone();
    /// let mv = Move::from_uci(&pos, "g1f3").unwrap();
    /// pos.make_move(mv);
    /// pos.undo_move(mv);
    /// assert_eq!(pos, before);
    /// ```
    pub fn undo_move(&mut self, mv: Move) {
        let Some(undo) = self.history.pop() else {
            return;
        };

        let color = self.side_to_move.opponent();
        self.side_to_move = color;
        self.fullmove -= color.index();

        // The key is restored wholesale below, so pieces move on the board alone
        self.board.take(mv.to());
        self.board.place(mv.piece(), mv.from());

        if let Some((rook_from, rook_to)) = mv.castling_rook_squares() {
            self.board.take(rook_to);
            self.board.place(Piece::new(color, PieceKind::Rook), rook_from);
        }

        if let Some(captured) = mv.captured() {
            self.board.place(captured, mv.capture_square());
        }

        self.castling_rights = undo.castling_rights;
        self.ep_square = undo.ep_square;
        self.halfmove = undo.halfmove;
        self.key = undo.key;
    }

    /// Returns `true` if every internal invariant holds:
    /// the board is consistent, each side has exactly one King,
    /// and the key matches one computed from scratch.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// assert!(Position::default().is_consistent());
    /// ```
    pub fn is_consistent(&self) -> bool {
        self.board.is_consistent()
            && Color::all()
                .into_iter()
                .all(|color| self.board.king(color).population() == 1)
            && self.key == ZobristKey::new(self)
    }
}

impl Default for Position {
    /// The standard starting position.
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    /// A [`Position`] displays as its FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    /// Prints a diagram of the board alongside the rest of the state.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagram = format!("{:?}", self.board);
        let ep = self
            .ep_square
            .map_or_else(|| String::from("-"), |sq| sq.to_string());
        let info = [
            format!("FEN: {}", self.to_fen()),
            format!("Side: {}", self.side_to_move.name()),
            format!("Castling: {}", self.castling_rights),
            format!("EP: {ep}"),
            format!("Half-move: {}", self.halfmove),
            format!("Full-move: {}", self.fullmove),
            format!("Key: {}", self.key),
        ];

        for (i, line) in diagram.lines().enumerate() {
            match info.get(i) {
                Some(extra) => writeln!(f, "{line}     {extra}")?,
                None => writeln!(f, "{line}")?,
            }
        }
        Ok(())
    }
}
