use std::path::PathBuf;

use tracing::{info, warn};

use crate::ai::Agent;
use crate::memory::DeclarativeMemory;
use crate::session::Session;
use crate::training::metrics::{RoundResult, TimingMetrics, TrainingMetrics};

/// Trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_rounds: usize,
    pub log_interval: usize,
    /// Where the memory snapshot is loaded from and saved to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_rounds: 1_000,
            log_interval: 100,
            snapshot_path: None,
        }
    }
}

/// Totals over a training run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    pub rounds: usize,
    pub engine_wins: usize,
    pub opponent_wins: usize,
    pub draws: usize,
}

/// Plays headless rounds of the engine against an opponent agent.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run the full training loop. The side that did not make the last move
    /// of a round opens the next one.
    pub fn train<M: DeclarativeMemory>(
        &self,
        session: &mut Session<M>,
        opponent: &mut dyn Agent,
    ) -> TrainingSummary {
        let mut metrics = TrainingMetrics::with_capacity(self.config.log_interval.max(1));
        let mut timing = TimingMetrics::new();
        let mut summary = TrainingSummary::default();

        info!(
            rounds = self.config.num_rounds,
            opponent = opponent.name(),
            engine = session.engine().player().name(),
            "starting training"
        );

        for round in 1..=self.config.num_rounds {
            let result = self.play_round(session, opponent);
            metrics.record_round(result);
            timing.record_round();

            summary.rounds += 1;
            if result.engine_won() {
                summary.engine_wins += 1;
            } else if result.engine_lost() {
                summary.opponent_wins += 1;
            } else {
                summary.draws += 1;
            }

            if self.config.log_interval > 0 && round % self.config.log_interval == 0 {
                let window = self.config.log_interval;
                let stats = session.engine().stats();
                info!(
                    round,
                    win_rate = %format!("{:.1}%", metrics.win_rate(window) * 100.0),
                    draw_rate = %format!("{:.1}%", metrics.draw_rate(window) * 100.0),
                    avg_len = %format!("{:.1}", metrics.average_game_length(window)),
                    fallbacks = stats.fallbacks,
                    rounds_per_sec = %format!("{:.0}", timing.rounds_per_sec()),
                    "training progress"
                );
                timing.reset_window();
            }
        }

        info!(
            rounds = metrics.total_rounds(),
            engine_wins = summary.engine_wins,
            opponent_wins = summary.opponent_wins,
            draws = summary.draws,
            "training complete"
        );
        summary
    }

    /// Play one round from an empty board to a win or stalemate.
    pub fn play_round<M: DeclarativeMemory>(
        &self,
        session: &mut Session<M>,
        opponent: &mut dyn Agent,
    ) -> RoundResult {
        session.reset_round();
        let mut game_length = 0;

        while !session.state().is_terminal() {
            let played = if session.is_engine_turn() {
                session.play_engine_move().is_some()
            } else {
                match opponent.select_action(session.state()) {
                    Some(column) => match session.play_move(column) {
                        Ok(_) => true,
                        Err(err) => {
                            warn!(column, %err, "opponent move rejected");
                            false
                        }
                    },
                    None => false,
                }
            };
            if !played {
                warn!(game_length, "round stopped without a legal move");
                break;
            }
            game_length += 1;
        }

        RoundResult {
            winner: session.state().winner(),
            engine_player: session.engine().player(),
            game_length,
        }
    }
}
