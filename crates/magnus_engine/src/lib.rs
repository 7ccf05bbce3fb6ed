// Move-search engine: static evaluation, negamax alpha-beta search, and the
// difficulty-configured bot that drives them.
pub mod bot;
pub mod evaluation;
pub mod search;

pub use bot::{BotConfig, ChessBot, Difficulty, ParseDifficultyError};
pub use evaluation::{evaluate, material_balance, Score};
pub use search::best_move;
