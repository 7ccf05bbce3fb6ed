use std::str::FromStr;

use log::info;
use thiserror::Error;

use magnus_core::{Board, Color, Move};

use crate::search::best_move;

/// Playing strength, mapped to a fixed search depth in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Pro,
    Advanced,
}

impl Difficulty {
    pub fn search_depth(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Pro => 3,
            Difficulty::Advanced => 4,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty level: {0}")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "pro" => Ok(Difficulty::Pro),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

/// Which side the bot plays and how deep it thinks. Threaded explicitly
/// through the host instead of living in shared mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotConfig {
    pub side: Color,
    pub difficulty: Difficulty,
}

/// A configured opponent: asks the searcher for a move whenever it is its
/// turn and the game is still running.
#[derive(Debug, Clone, Copy)]
pub struct ChessBot {
    config: BotConfig,
}

impl ChessBot {
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> BotConfig {
        self.config
    }

    /// Picks the bot's move, or `None` when it is not the bot's turn or the
    /// game is already over. The host applies the returned move via
    /// [`Board::play`].
    pub fn choose_move(&self, board: &mut Board) -> Option<Move> {
        if board.side_to_move() != self.config.side || board.is_game_over() {
            return None;
        }
        let depth = self.config.difficulty.search_depth();
        let chosen = best_move(board, self.config.side, depth);
        if let Some(mv) = chosen {
            info!(
                "bot plays {} ({:?}, depth {})",
                mv, self.config.difficulty, depth
            );
        }
        chosen
    }
}
