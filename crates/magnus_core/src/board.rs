use std::ops::{Deref, DerefMut};

use log::debug;
use thiserror::Error;

use crate::moves::pseudo_legal_from;
use crate::{Color, Move, Piece, PieceType, Square};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("piece on {0} belongs to the side not to move")]
    NotYourTurn(Square),
    #[error("move {0} is not legal in this position")]
    Illegal(Move),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    /// No castling available for either side. Custom positions start here
    /// and opt in explicitly.
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }
}

/// Everything `pop` must restore. Saved wholesale on every `push` so undo
/// is an exact inverse no matter what the move did (capture, promotion,
/// castle, en passant).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    mv: Move,
    squares: [Option<Piece>; 64],
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    turn: Color,
    castling: CastlingRights,
    /// Square a pawn may capture onto en passant, set for one ply after a
    /// double pawn push.
    en_passant: Option<Square>,
    history: Vec<Frame>,
}

fn square_index(sq: Square) -> usize {
    ((sq.rank - 1) * 8 + (sq.file - 1)) as usize
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard initial position, White to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.castling = CastlingRights::default();
        board.setup_initial_position();
        board
    }

    /// Bare board with no pieces, no castling rights, White to move.
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
            turn: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            history: Vec::new(),
        }
    }

    fn setup_initial_position(&mut self) {
        for file in 1..=8 {
            self.place(
                Square { file, rank: 2 },
                Piece::new(PieceType::Pawn, Color::White),
            );
            self.place(
                Square { file, rank: 7 },
                Piece::new(PieceType::Pawn, Color::Black),
            );
        }

        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in (1..=8).zip(piece_order.iter()) {
            self.place(Square { file, rank: 1 }, Piece::new(piece_type, Color::White));
            self.place(Square { file, rank: 8 }, Piece::new(piece_type, Color::Black));
        }
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[square_index(sq)]
    }

    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.squares[square_index(sq)] = Some(piece);
    }

    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.turn = color;
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling = rights;
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    /// Applies a move in place, recording an undo frame. The move must come
    /// from `legal_moves`; feeding anything else is a caller bug (use
    /// [`Board::play`] for untrusted input).
    pub fn push(&mut self, mv: Move) {
        self.history.push(Frame {
            mv,
            squares: self.squares,
            turn: self.turn,
            castling: self.castling,
            en_passant: self.en_passant,
        });
        self.apply(mv);
    }

    /// Undoes the most recent `push`, restoring the exact prior state.
    /// Returns the undone move, or `None` if there is nothing to undo.
    pub fn pop(&mut self) -> Option<Move> {
        let frame = self.history.pop()?;
        self.squares = frame.squares;
        self.turn = frame.turn;
        self.castling = frame.castling;
        self.en_passant = frame.en_passant;
        Some(frame.mv)
    }

    /// Pushes a move and returns a guard that pops it when dropped, so the
    /// undo happens on every exit path.
    pub fn scoped_push(&mut self, mv: Move) -> ScopedMove<'_> {
        self.push(mv);
        ScopedMove { board: self }
    }

    /// Validated apply for host input: checks the origin square, the side
    /// to move, and full legality before pushing.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        let piece = self.piece_at(mv.from).ok_or(MoveError::EmptySquare(mv.from))?;
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn(mv.from));
        }
        if !self.legal_moves().contains(&mv) {
            return Err(MoveError::Illegal(mv));
        }
        self.push(mv);
        debug!("played {}", mv);
        Ok(())
    }

    /// Applies a move without recording history. Only called with moves
    /// that have a piece on their origin square.
    fn apply(&mut self, mv: Move) {
        let piece = match self.squares[square_index(mv.from)].take() {
            Some(piece) => piece,
            None => return,
        };

        // En passant: a pawn capturing onto the empty target square removes
        // the pawn that just double-pushed past it.
        if piece.piece_type == PieceType::Pawn
            && Some(mv.to) == self.en_passant
            && mv.from.file != mv.to.file
        {
            let captured = Square {
                file: mv.to.file,
                rank: mv.from.rank,
            };
            self.squares[square_index(captured)] = None;
        }

        // Castling: the king moves two files and drags the rook along.
        if piece.piece_type == PieceType::King
            && (mv.to.file as i8 - mv.from.file as i8).abs() == 2
        {
            let (rook_from_file, rook_to_file) = if mv.to.file > mv.from.file {
                (8, 6)
            } else {
                (1, 4)
            };
            let rook_from = Square {
                file: rook_from_file,
                rank: mv.from.rank,
            };
            let rook_to = Square {
                file: rook_to_file,
                rank: mv.from.rank,
            };
            if let Some(rook) = self.squares[square_index(rook_from)].take() {
                self.squares[square_index(rook_to)] = Some(rook);
            }
        }

        self.en_passant = if piece.piece_type == PieceType::Pawn
            && (mv.to.rank as i8 - mv.from.rank as i8).abs() == 2
        {
            Square::new(mv.from.file, (mv.from.rank + mv.to.rank) / 2)
        } else {
            None
        };

        let landed = match mv.promotion {
            Some(promotion) => Piece::new(promotion, piece.color),
            None => piece,
        };
        self.squares[square_index(mv.to)] = Some(landed);

        self.update_castling_rights(piece, mv);
        self.turn = self.turn.opponent();
    }

    fn update_castling_rights(&mut self, piece: Piece, mv: Move) {
        match piece.piece_type {
            PieceType::King => {
                if piece.color == Color::White {
                    self.castling.white_kingside = false;
                    self.castling.white_queenside = false;
                } else {
                    self.castling.black_kingside = false;
                    self.castling.black_queenside = false;
                }
            }
            PieceType::Rook => self.clear_rook_rights(mv.from),
            _ => {}
        }
        // Capturing a rook on its home square also ends castling that way.
        self.clear_rook_rights(mv.to);
    }

    fn clear_rook_rights(&mut self, sq: Square) {
        match (sq.file, sq.rank) {
            (1, 1) => self.castling.white_queenside = false,
            (8, 1) => self.castling.white_kingside = false,
            (1, 8) => self.castling.black_queenside = false,
            (8, 8) => self.castling.black_kingside = false,
            _ => {}
        }
    }

    /// Every legal move for the side to move, in a deterministic order:
    /// origin squares rank-major, then the piece's generation order, with
    /// castling moves last.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for from in Square::all() {
            let piece = match self.piece_at(from) {
                Some(piece) if piece.color == self.turn => piece,
                _ => continue,
            };
            for mv in pseudo_legal_from(self, from, piece) {
                if !self.leaves_king_exposed(mv, piece.color) {
                    moves.push(mv);
                }
            }
        }
        self.castling_moves(&mut moves);
        moves
    }

    fn leaves_king_exposed(&self, mv: Move, color: Color) -> bool {
        let mut probe = self.clone();
        probe.history.clear();
        probe.apply(mv);
        probe.is_in_check(color)
    }

    fn castling_moves(&self, moves: &mut Vec<Move>) {
        let color = self.turn;
        let rank = match color {
            Color::White => 1,
            Color::Black => 8,
        };
        let king_sq = Square { file: 5, rank };
        if self.piece_at(king_sq) != Some(Piece::new(PieceType::King, color)) {
            return;
        }
        let attacker = color.opponent();
        if self.is_square_attacked(king_sq, attacker) {
            return;
        }

        let (kingside, queenside) = match color {
            Color::White => (self.castling.white_kingside, self.castling.white_queenside),
            Color::Black => (self.castling.black_kingside, self.castling.black_queenside),
        };
        let rook = Piece::new(PieceType::Rook, color);

        if kingside
            && self.piece_at(Square { file: 8, rank }) == Some(rook)
            && [6, 7]
                .iter()
                .all(|&file| self.piece_at(Square { file, rank }).is_none())
            && [6, 7]
                .iter()
                .all(|&file| !self.is_square_attacked(Square { file, rank }, attacker))
        {
            moves.push(Move::new(king_sq, Square { file: 7, rank }));
        }

        if queenside
            && self.piece_at(Square { file: 1, rank }) == Some(rook)
            && [2, 3, 4]
                .iter()
                .all(|&file| self.piece_at(Square { file, rank }).is_none())
            && [3, 4]
                .iter()
                .all(|&file| !self.is_square_attacked(Square { file, rank }, attacker))
        {
            moves.push(Move::new(king_sq, Square { file: 3, rank }));
        }
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        let king_sq = Square::all().find(|&sq| {
            self.piece_at(sq) == Some(Piece::new(PieceType::King, color))
        });
        match king_sq {
            Some(sq) => self.is_square_attacked(sq, color.opponent()),
            None => false,
        }
    }

    pub fn is_square_attacked(&self, target: Square, by: Color) -> bool {
        for from in Square::all() {
            let piece = match self.piece_at(from) {
                Some(piece) if piece.color == by => piece,
                _ => continue,
            };
            let file_diff = target.file as i8 - from.file as i8;
            let rank_diff = target.rank as i8 - from.rank as i8;
            let attacks = match piece.piece_type {
                PieceType::Pawn => {
                    let direction = match by {
                        Color::White => 1,
                        Color::Black => -1,
                    };
                    rank_diff == direction && file_diff.abs() == 1
                }
                PieceType::Knight => {
                    (file_diff.abs() == 1 && rank_diff.abs() == 2)
                        || (file_diff.abs() == 2 && rank_diff.abs() == 1)
                }
                PieceType::King => {
                    file_diff.abs() <= 1 && rank_diff.abs() <= 1 && (file_diff, rank_diff) != (0, 0)
                }
                PieceType::Bishop => {
                    file_diff.abs() == rank_diff.abs() && self.is_path_clear(from, target)
                }
                PieceType::Rook => {
                    (file_diff == 0 || rank_diff == 0) && self.is_path_clear(from, target)
                }
                PieceType::Queen => {
                    (file_diff.abs() == rank_diff.abs() || file_diff == 0 || rank_diff == 0)
                        && self.is_path_clear(from, target)
                }
            };
            if attacks {
                return true;
            }
        }
        false
    }

    /// Whether the squares strictly between `from` and `to` (which must be
    /// aligned on a rank, file, or diagonal) are all empty.
    fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let file_step = (to.file as i8 - from.file as i8).signum();
        let rank_step = (to.rank as i8 - from.rank as i8).signum();
        let mut current = from;
        loop {
            current = match current.offset(file_step, rank_step) {
                Some(sq) if sq != to => sq,
                _ => return true,
            };
            if self.piece_at(current).is_some() {
                return false;
            }
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.turn) && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.turn) && self.legal_moves().is_empty()
    }

    pub fn has_insufficient_material(&self) -> bool {
        let mut white = Vec::new();
        let mut black = Vec::new();
        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                let entry = (piece.piece_type, sq);
                match piece.color {
                    Color::White => white.push(entry),
                    Color::Black => black.push(entry),
                }
            }
        }

        // King vs king
        if white.len() == 1 && black.len() == 1 {
            return true;
        }

        // King and one minor piece vs bare king
        if white.len() + black.len() == 3 {
            let larger = if white.len() == 2 { &white } else { &black };
            return larger.iter().any(|&(piece_type, _)| {
                matches!(piece_type, PieceType::Bishop | PieceType::Knight)
            });
        }

        // King and bishop each, bishops on same-colored squares
        if white.len() == 2 && black.len() == 2 {
            let bishop_square = |side: &[(PieceType, Square)]| {
                side.iter()
                    .find(|&&(piece_type, _)| piece_type == PieceType::Bishop)
                    .map(|&(_, sq)| sq)
            };
            if let (Some(wb), Some(bb)) = (bishop_square(&white), bishop_square(&black)) {
                return (wb.file + wb.rank) % 2 == (bb.file + bb.rank) % 2;
            }
        }

        false
    }

    /// Terminal test used at search leaves and by hosts before asking for
    /// a move: checkmate, stalemate, or a dead (insufficient material) draw.
    pub fn is_game_over(&self) -> bool {
        self.has_insufficient_material() || self.legal_moves().is_empty()
    }
}

/// RAII guard from [`Board::scoped_push`]. Dereferences to the board with
/// the move applied and pops it on drop.
pub struct ScopedMove<'a> {
    board: &'a mut Board,
}

impl Deref for ScopedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for ScopedMove<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        let _ = self.board.pop();
    }
}
