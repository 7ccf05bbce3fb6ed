use magnus_core::{Board, Color, PieceType, Square};

/// Evaluation score. Positive favors the perspective side; `f32` so alpha
/// and beta can start from the infinity sentinels.
pub type Score = f32;

// Classic piece values in pawns. The king carries no material value since
// it is never captured.
const PAWN_VALUE: Score = 1.0;
const KNIGHT_VALUE: Score = 3.0;
const BISHOP_VALUE: Score = 3.0;
const ROOK_VALUE: Score = 5.0;
const QUEEN_VALUE: Score = 9.0;
const KING_VALUE: Score = 0.0;

/// Flat bonus per piece sitting on one of the four central squares
/// (d4, d5, e4, e5), regardless of piece type.
const CENTER_BONUS: Score = 0.2;

/// Scores a position for `perspective`: material plus the central-square
/// bonus, own total minus the opponent's. Pure and deterministic; an empty
/// or kings-only board scores zero.
pub fn evaluate(board: &Board, perspective: Color) -> Score {
    side_total(board, perspective, true) - side_total(board, perspective.opponent(), true)
}

/// Material-only balance for `perspective`, without the positional term.
/// Handy for quick material checks outside the search.
pub fn material_balance(board: &Board, perspective: Color) -> Score {
    side_total(board, perspective, false) - side_total(board, perspective.opponent(), false)
}

fn side_total(board: &Board, color: Color, positional: bool) -> Score {
    let mut total = 0.0;
    for sq in Square::all() {
        let piece = match board.piece_at(sq) {
            Some(piece) if piece.color == color => piece,
            _ => continue,
        };
        total += piece_value(piece.piece_type);
        if positional && is_central(sq) {
            total += CENTER_BONUS;
        }
    }
    total
}

fn is_central(sq: Square) -> bool {
    (4..=5).contains(&sq.file) && (4..=5).contains(&sq.rank)
}

fn piece_value(piece_type: PieceType) -> Score {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}
