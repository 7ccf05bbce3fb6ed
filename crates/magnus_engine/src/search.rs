use log::debug;

use magnus_core::{Board, Color, Move};

use crate::evaluation::{evaluate, Score};

/// Finds the best move for `perspective` with a fixed-depth negamax
/// alpha-beta search.
///
/// `perspective` must be the side to move on `board`. `depth` is the ply
/// count and cannot be negative by construction; depth 0 degenerates to a
/// one-ply greedy search (every legal move is evaluated once and the best
/// immediate evaluation wins). Ties are broken by the first move in
/// `legal_moves` enumeration order, so results are reproducible.
///
/// Returns `None` when there is no legal move (checkmate or stalemate
/// already on the board); callers should treat that as the game ending.
/// The board is exclusively borrowed for the duration of the search and is
/// restored exactly before returning.
pub fn best_move(board: &mut Board, perspective: Color, depth: u8) -> Option<Move> {
    debug_assert_eq!(
        board.side_to_move(),
        perspective,
        "search must start on the perspective side's turn"
    );

    let mut best: Option<Move> = None;
    let mut best_score = Score::NEG_INFINITY;
    let mut alpha = Score::NEG_INFINITY;

    for mv in board.legal_moves() {
        let score = {
            let mut child = board.scoped_push(mv);
            -negamax(&mut child, depth.saturating_sub(1), Score::NEG_INFINITY, -alpha)
        };
        debug!("candidate {} scores {:.2} at depth {}", mv, score, depth);
        // Strictly greater: the first of equal-scoring moves stays put.
        if score > best_score {
            best_score = score;
            best = Some(mv);
        }
        alpha = alpha.max(score);
    }

    if let Some(mv) = best {
        debug!("best move {} with score {:.2}", mv, best_score);
    }
    best
}

/// Negamax with alpha-beta pruning. Returns the position's value from the
/// viewpoint of the side to move; the caller negates it across the ply
/// boundary. Fail-soft: may return a value outside (alpha, beta), which is
/// then a bound rather than an exact score.
fn negamax(board: &mut Board, depth: u8, mut alpha: Score, beta: Score) -> Score {
    if depth == 0 || board.is_game_over() {
        return evaluate(board, board.side_to_move());
    }

    let mut best = Score::NEG_INFINITY;
    for mv in board.legal_moves() {
        let score = {
            let mut child = board.scoped_push(mv);
            -negamax(&mut child, depth - 1, -beta, -alpha)
        };
        best = best.max(score);
        alpha = alpha.max(score);
        if beta <= alpha {
            // The opponent already has a better option earlier in the tree;
            // nothing below this node can change the root decision.
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnus_core::{Piece, PieceType, Square};

    fn sq(notation: &str) -> Square {
        Square::from_algebraic(notation).unwrap()
    }

    /// Plain full-width negamax, no pruning. Reference for the equivalence
    /// tests: pruning must never change the chosen move or its score.
    fn negamax_full(board: &mut Board, depth: u8) -> Score {
        if depth == 0 || board.is_game_over() {
            return evaluate(board, board.side_to_move());
        }
        let mut best = Score::NEG_INFINITY;
        for mv in board.legal_moves() {
            let mut child = board.scoped_push(mv);
            best = best.max(-negamax_full(&mut child, depth - 1));
        }
        best
    }

    fn best_move_full(board: &mut Board, depth: u8) -> Option<(Move, Score)> {
        let mut best = None;
        let mut best_score = Score::NEG_INFINITY;
        for mv in board.legal_moves() {
            let score = {
                let mut child = board.scoped_push(mv);
                -negamax_full(&mut child, depth.saturating_sub(1))
            };
            if score > best_score {
                best_score = score;
                best = Some((mv, score));
            }
        }
        best
    }

    /// Undefended black queen on d4, capturable by the d1 rook.
    fn free_queen_position() -> Board {
        let mut board = Board::empty();
        board.place(sq("e1"), Piece::new(PieceType::King, Color::White));
        board.place(sq("d1"), Piece::new(PieceType::Rook, Color::White));
        board.place(sq("e8"), Piece::new(PieceType::King, Color::Black));
        board.place(sq("d4"), Piece::new(PieceType::Queen, Color::Black));
        board
    }

    #[test]
    fn captures_the_free_queen() {
        for depth in [1, 2, 3] {
            let mut board = free_queen_position();
            let chosen = best_move(&mut board, Color::White, depth);
            assert_eq!(chosen, Some(Move::new(sq("d1"), sq("d4"))), "depth {depth}");
        }
    }

    #[test]
    fn depth_zero_is_one_ply_greedy() {
        let mut board = free_queen_position();
        let chosen = best_move(&mut board, Color::White, 0);
        assert_eq!(chosen, Some(Move::new(sq("d1"), sq("d4"))));
    }

    #[test]
    fn search_is_deterministic_and_restores_the_board() {
        let mut board = Board::new();
        let before = board.clone();
        let first = best_move(&mut board, Color::White, 2);
        assert_eq!(board, before);
        let second = best_move(&mut board, Color::White, 2);
        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(board, before);
    }

    #[test]
    fn board_is_restored_even_when_pruning_cuts_early() {
        let mut board = free_queen_position();
        let before = board.clone();
        best_move(&mut board, Color::White, 3);
        assert_eq!(board, before);
    }

    #[test]
    fn pruning_matches_full_minimax() {
        let mut positions = vec![Board::new(), free_queen_position()];
        let mut midgame = Board::new();
        midgame.push(Move::new(sq("e2"), sq("e4")));
        midgame.push(Move::new(sq("d7"), sq("d5")));
        positions.push(midgame);

        for board in &mut positions {
            for depth in [1, 2] {
                let perspective = board.side_to_move();
                let pruned = best_move(board, perspective, depth);
                let (full_move, _) = best_move_full(board, depth).expect("moves exist");
                assert_eq!(pruned, Some(full_move), "depth {depth}");
            }
        }
    }

    #[test]
    fn checkmated_root_yields_no_move() {
        let mut board = Board::empty();
        board.place(sq("h8"), Piece::new(PieceType::King, Color::Black));
        board.place(sq("g7"), Piece::new(PieceType::Pawn, Color::Black));
        board.place(sq("h7"), Piece::new(PieceType::Pawn, Color::Black));
        board.place(sq("a8"), Piece::new(PieceType::Rook, Color::White));
        board.place(sq("a1"), Piece::new(PieceType::King, Color::White));
        board.set_side_to_move(Color::Black);

        assert_eq!(best_move(&mut board, Color::Black, 2), None);
    }

    #[test]
    fn stalemated_root_yields_no_move() {
        let mut board = Board::empty();
        board.place(sq("a8"), Piece::new(PieceType::King, Color::Black));
        board.place(sq("b6"), Piece::new(PieceType::King, Color::White));
        board.place(sq("c7"), Piece::new(PieceType::Queen, Color::White));
        board.set_side_to_move(Color::Black);

        assert_eq!(best_move(&mut board, Color::Black, 3), None);
    }

    #[test]
    fn equal_scores_keep_the_first_enumerated_move() {
        // Two bare kings: every move scores exactly zero, so the winner must
        // be the first move enumeration yields.
        let mut board = Board::empty();
        board.place(sq("e1"), Piece::new(PieceType::King, Color::White));
        board.place(sq("e8"), Piece::new(PieceType::King, Color::Black));

        let first_legal = board.legal_moves()[0];
        assert_eq!(best_move(&mut board, Color::White, 1), Some(first_legal));
    }

    #[test]
    fn opening_search_prefers_the_center() {
        // From the start no capture exists, so material is level everywhere;
        // the 0.2 center bonus makes the first central pawn push win the
        // one-ply search.
        let mut board = Board::new();
        let chosen = best_move(&mut board, Color::White, 1);
        assert_eq!(chosen, Some(Move::new(sq("d2"), sq("d4"))));
    }
}
