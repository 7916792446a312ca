//! Core Connect Four game logic: board representation, run-length analysis,
//! player types, and the round state machine with scores.

mod analysis;
mod board;
mod player;
mod state;

pub use analysis::line_runs;
pub use board::{Board, BoardOracle, BoardShape, Cell, COLS, CONNECT, ROWS};
pub use player::Player;
pub use state::{FirstMove, GameOutcome, GameState, MoveReport, Scoreboard};
