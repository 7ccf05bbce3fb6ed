// Core chess rules: board state, move generation, push/pop, game-over detection
pub mod board;
pub mod moves;
pub mod piece;
pub mod square;

// Re-export main types for convenience
pub use board::{Board, CastlingRights, MoveError, ScopedMove};
pub use moves::Move;
pub use piece::{Color, Piece, PieceType};
pub use square::Square;
