use std::fmt;

use crate::{Board, Color, Piece, PieceType, Square};

/// A move as produced by move generation: origin, destination, and the
/// promotion piece for pawn moves onto the last rank. Plain value type,
/// compared by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            let letter = match promotion {
                PieceType::Queen => 'q',
                PieceType::Rook => 'r',
                PieceType::Bishop => 'b',
                PieceType::Knight => 'n',
                // Not reachable from move generation; printed for completeness.
                PieceType::Pawn => 'p',
                PieceType::King => 'k',
            };
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const PROMOTION_PIECES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// Moves the piece on `from` could make by its movement pattern alone.
/// Castling needs attack information and lives on `Board`; self-check
/// filtering is also the board's job.
pub(crate) fn pseudo_legal_from(board: &Board, from: Square, piece: Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, from, piece.color, &mut moves),
        PieceType::Knight => step_moves(board, from, piece.color, &KNIGHT_STEPS, &mut moves),
        PieceType::King => step_moves(board, from, piece.color, &KING_STEPS, &mut moves),
        PieceType::Bishop => slide_moves(board, from, piece.color, &BISHOP_DIRS, &mut moves),
        PieceType::Rook => slide_moves(board, from, piece.color, &ROOK_DIRS, &mut moves),
        PieceType::Queen => {
            slide_moves(board, from, piece.color, &BISHOP_DIRS, &mut moves);
            slide_moves(board, from, piece.color, &ROOK_DIRS, &mut moves);
        }
    }
    moves
}

fn pawn_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    let direction: i8 = match color {
        Color::White => 1,
        Color::Black => -1,
    };
    let start_rank = match color {
        Color::White => 2,
        Color::Black => 7,
    };
    let promotion_rank = match color {
        Color::White => 8,
        Color::Black => 1,
    };

    // Forward pushes
    if let Some(one) = from.offset(0, direction) {
        if board.piece_at(one).is_none() {
            push_pawn_move(from, one, promotion_rank, moves);
            if from.rank == start_rank {
                if let Some(two) = from.offset(0, 2 * direction) {
                    if board.piece_at(two).is_none() {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    // Diagonal captures, including en passant onto the empty target square
    for file_step in [-1, 1] {
        if let Some(to) = from.offset(file_step, direction) {
            match board.piece_at(to) {
                Some(target) if target.color != color => {
                    push_pawn_move(from, to, promotion_rank, moves);
                }
                None if board.en_passant_square() == Some(to) => {
                    moves.push(Move::new(from, to));
                }
                _ => {}
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, promotion_rank: u8, moves: &mut Vec<Move>) {
    if to.rank == promotion_rank {
        for promotion in PROMOTION_PIECES {
            moves.push(Move::with_promotion(from, to, promotion));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

fn step_moves(
    board: &Board,
    from: Square,
    color: Color,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(file_step, rank_step) in steps {
        if let Some(to) = from.offset(file_step, rank_step) {
            match board.piece_at(to) {
                Some(target) if target.color == color => {}
                _ => moves.push(Move::new(from, to)),
            }
        }
    }
}

fn slide_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(file_step, rank_step) in directions {
        let mut current = from;
        while let Some(to) = current.offset(file_step, rank_step) {
            match board.piece_at(to) {
                None => {
                    moves.push(Move::new(from, to));
                    current = to;
                }
                Some(target) => {
                    if target.color != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
        }
    }
}
