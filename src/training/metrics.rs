use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::game::Player;

/// Result of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub winner: Option<Player>,
    pub engine_player: Player,
    pub game_length: usize,
}

impl RoundResult {
    pub fn engine_won(&self) -> bool {
        self.winner == Some(self.engine_player)
    }

    pub fn engine_lost(&self) -> bool {
        matches!(self.winner, Some(winner) if winner != self.engine_player)
    }
}

/// Rolling-window statistics over recent rounds.
pub struct TrainingMetrics {
    round_results: VecDeque<RoundResult>,
    capacity: usize,
    total_rounds: usize, // lifetime count, never capped
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            round_results: VecDeque::with_capacity(capacity),
            capacity,
            total_rounds: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_round(&mut self, result: RoundResult) {
        self.total_rounds += 1;
        self.round_results.push_back(result);
        if self.round_results.len() > self.capacity {
            self.round_results.pop_front();
        }
    }

    fn rate(&self, last_n: usize, pred: impl Fn(&RoundResult) -> bool) -> f32 {
        let n = self.round_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self.round_results.iter().rev().take(n).filter(|r| pred(*r)).count();
        hits as f32 / n as f32
    }

    /// Share of the last N rounds the engine won.
    pub fn win_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, RoundResult::engine_won)
    }

    pub fn loss_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, RoundResult::engine_lost)
    }

    /// Draw rate in the last N rounds.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner.is_none())
    }

    /// Average game length over the last N rounds.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.round_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self
            .round_results
            .iter()
            .rev()
            .take(n)
            .map(|r| r.game_length)
            .sum();
        total as f32 / n as f32
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Throughput of the training loop between log lines.
pub struct TimingMetrics {
    window_start: Instant,
    window_count: usize,
}

impl TimingMetrics {
    pub fn new() -> Self {
        TimingMetrics {
            window_start: Instant::now(),
            window_count: 0,
        }
    }

    pub fn record_round(&mut self) {
        self.window_count += 1;
    }

    /// Rounds per second since the last `reset_window` call.
    pub fn rounds_per_sec(&self) -> f32 {
        self.rate_over(self.window_start.elapsed())
    }

    fn rate_over(&self, elapsed: Duration) -> f32 {
        let secs = elapsed.as_secs_f32();
        if secs <= 0.0 {
            return 0.0;
        }
        self.window_count as f32 / secs
    }

    /// Reset the throughput window (call after each log interval).
    pub fn reset_window(&mut self) {
        self.window_start = Instant::now();
        self.window_count = 0;
    }
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
