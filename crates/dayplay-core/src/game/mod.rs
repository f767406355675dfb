//! Tic-tac-toe: board, engine, heuristic opponent and score keeping.

mod board;
mod engine;
mod opponent;
mod scores;
mod session;

pub use board::{check_win, Board, Line, Mark, CELLS, CENTER, LINES};
pub use engine::{GameEngine, GameStatus, MoveResult};
pub use opponent::{choose_move, completing_cell};
pub use scores::{PlayerRecord, ScoreStore, SessionCounters};
pub use session::{GameCommand, GameSession, Mode, Players};
