//! The game loop the engine plays in: coin insertion, the engine's thinking
//! delay, round endings, and resets.
//!
//! Time is passed in explicitly. A caller drives the session by forwarding
//! coin insertions and calling [`Session::poll`] from its frame loop.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::ai::ActrEngine;
use crate::error::MoveError;
use crate::game::{BoardShape, GameOutcome, GameState, MoveReport, Player, Scoreboard};
use crate::memory::{ChunkStore, DeclarativeMemory};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between the opponent's coin and the engine's reply.
    pub think_delay_ms: u64,
    /// Colour the engine plays.
    pub engine_player: Player,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            think_delay_ms: 500,
            engine_player: Player::Yellow,
        }
    }
}

impl SessionConfig {
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

/// One scheduled engine move. Dropping it cancels the move.
#[derive(Debug, Clone, Copy)]
struct DeferredMove {
    due: Instant,
}

pub struct Session<M: DeclarativeMemory = ChunkStore> {
    state: GameState,
    engine: ActrEngine<M>,
    pending: Option<DeferredMove>,
    think_delay: Duration,
}

impl<M: DeclarativeMemory> Session<M> {
    /// The engine plays the colour it was built for.
    pub fn new(shape: BoardShape, engine: ActrEngine<M>, config: &SessionConfig) -> Self {
        if engine.player() != config.engine_player {
            warn!(
                engine = engine.player().name(),
                configured = config.engine_player.name(),
                "engine colour differs from session config"
            );
        }
        Session {
            state: GameState::with_shape(shape),
            engine,
            pending: None,
            think_delay: config.think_delay(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn engine(&self) -> &ActrEngine<M> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ActrEngine<M> {
        &mut self.engine
    }

    pub fn into_engine(self) -> ActrEngine<M> {
        self.engine
    }

    pub fn scores(&self) -> Scoreboard {
        self.state.scores()
    }

    pub fn is_engine_turn(&self) -> bool {
        !self.state.is_terminal() && self.state.current_player() == self.engine.player()
    }

    /// True while the engine's reply is scheduled but not yet played.
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// A coin from the opponent at `column`.
    ///
    /// Ignored (returns `Ok(None)`) while the engine is thinking or when it
    /// is the engine's turn; in the latter case the engine's move is
    /// scheduled. A coin after the round ended starts a new round first.
    pub fn insert_coin(
        &mut self,
        column: usize,
        now: Instant,
    ) -> Result<Option<MoveReport>, MoveError> {
        if self.pending.is_some() {
            debug!(column, "coin ignored, engine is thinking");
            return Ok(None);
        }
        if self.state.is_terminal() {
            self.reset_round();
        }
        if self.is_engine_turn() {
            debug!(column, "coin ignored, engine to move");
            self.schedule(now);
            return Ok(None);
        }

        let report = self.play_move(column)?;
        if self.is_engine_turn() {
            self.schedule(now);
        }
        Ok(Some(report))
    }

    /// Play the scheduled engine move once its delay has passed.
    pub fn poll(&mut self, now: Instant) -> Option<MoveReport> {
        match self.pending {
            Some(deferred) if now >= deferred.due => {
                self.pending = None;
                self.play_engine_move()
            }
            _ => None,
        }
    }

    /// Insert a coin for whoever is to move, with no delay or turn check.
    pub fn play_move(&mut self, column: usize) -> Result<MoveReport, MoveError> {
        let report = self.state.apply_move_mut(column)?;
        self.after_move(&report);
        Ok(report)
    }

    /// Ask the engine for a column and play it immediately.
    pub fn play_engine_move(&mut self) -> Option<MoveReport> {
        if !self.is_engine_turn() {
            return None;
        }
        let column = self.engine.choose_move(self.state.board())?;
        match self.play_move(column) {
            Ok(report) => Some(report),
            Err(err) => {
                warn!(column, %err, "engine move rejected");
                None
            }
        }
    }

    /// Abandon the current round: cancel any scheduled engine move, empty
    /// the board, and drop the round's trace unreinforced.
    pub fn reset_round(&mut self) {
        self.pending = None;
        self.state.reset_board();
        self.engine.reset_round();
        debug!(first = self.state.current_player().name(), "new round");
    }

    /// Zero the scoreboard and forget the memory's usage history.
    pub fn reset_scores(&mut self) {
        self.state.reset_scores();
        self.engine.memory_mut().reset();
        info!("scores and memory history reset");
    }

    fn schedule(&mut self, now: Instant) {
        self.pending = Some(DeferredMove {
            due: now + self.think_delay,
        });
    }

    fn after_move(&mut self, report: &MoveReport) {
        self.engine.observe_move();

        match report.outcome {
            Some(GameOutcome::Winner(winner)) => {
                self.pending = None;
                let won = winner == self.engine.player();
                self.engine.record_outcome(won);
                if let Some(first) = self.state.first_move().filter(|f| f.player == winner) {
                    self.engine.remember_opening(first.column);
                }
                let scores = self.state.scores();
                info!(
                    winner = winner.name(),
                    red = scores.red,
                    yellow = scores.yellow,
                    "round won"
                );
            }
            Some(GameOutcome::Draw) => {
                self.pending = None;
                self.engine.abandon_round();
                info!("stalemate, no reinforcement");
            }
            None => {}
        }
    }
}
