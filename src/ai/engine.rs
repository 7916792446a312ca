//! The adaptive mover: picks columns from remembered scenarios and learns
//! from round outcomes.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use super::agent::Agent;
use super::random::seeded_rng;
use super::reinforcement::{ReinforcementRule, RetrievalTrace};
use super::scenario::{encode_scenario, start_move_query, start_move_record};
use super::seeder::seed_prior_knowledge;
use super::strategy::available_strategies;
use crate::game::{BoardOracle, GameState, Player};
use crate::memory::{Chunk, ChunkStore, DeclarativeMemory, Slot, SlotValue};

/// Engine tuning: prior activations, reinforcement rates, opening retrieval.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prior activation of complete-4 / block-4 decisions.
    pub strong_activation: f64,
    /// Prior activation of every other decision.
    pub base_activation: f64,
    pub win_rate: f64,
    pub loss_rate: f64,
    /// Importance of complete-4 / block-4 in reinforcement; others count 1.
    pub critical_importance: f64,
    /// Decay and latency used while recalling an opening column.
    pub first_move_decay: f64,
    pub first_move_latency: f64,
    /// Model seconds that pass per coin inserted.
    pub seconds_per_move: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            strong_activation: 1.7,
            base_activation: 1.0,
            win_rate: 0.35,
            loss_rate: 0.1,
            critical_importance: 2.0,
            first_move_decay: 0.1,
            first_move_latency: 0.1,
            seconds_per_move: 0.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    FirstMove,
    NormalMove,
    RoundOver,
}

/// Running counters, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub moves: u64,
    pub openings_recalled: u64,
    pub fallbacks: u64,
    pub reinforcement_passes: u64,
}

pub struct ActrEngine<M: DeclarativeMemory = ChunkStore> {
    memory: M,
    player: Player,
    config: EngineConfig,
    rule: ReinforcementRule,
    trace: RetrievalTrace,
    phase: EnginePhase,
    rng: StdRng,
    /// Column played when no usable opening is remembered.
    default_first_column: Option<usize>,
    stats: EngineStats,
}

impl<M: DeclarativeMemory> ActrEngine<M> {
    /// Wrap an already populated memory.
    pub fn new(memory: M, player: Player, config: EngineConfig) -> Self {
        ActrEngine {
            memory,
            player,
            rule: ReinforcementRule::from_config(&config),
            rng: seeded_rng(config.seed),
            config,
            trace: RetrievalTrace::new(),
            phase: EnginePhase::FirstMove,
            default_first_column: None,
            stats: EngineStats::default(),
        }
    }

    /// Seed `memory` with the 192 prior scenarios, then wrap it.
    pub fn with_prior_knowledge(mut memory: M, player: Player, config: EngineConfig) -> Self {
        seed_prior_knowledge(&mut memory, &config);
        Self::new(memory, player, config)
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn trace(&self) -> &RetrievalTrace {
        &self.trace
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn into_memory(self) -> M {
        self.memory
    }

    /// Pick a column for the engine's turn, or `None` if the board is full.
    /// Only columns with room are ever returned.
    pub fn choose_move<B: BoardOracle + ?Sized>(&mut self, board: &B) -> Option<usize> {
        let legal = board.columns_with_room();
        if legal.is_empty() {
            warn!("asked for a move on a full board");
            return None;
        }

        let column = if self.phase != EnginePhase::NormalMove && board.is_empty() {
            self.opening_column(board.shape().cols, &legal)
        } else {
            self.scenario_column(board, &legal)
        };

        self.phase = EnginePhase::NormalMove;
        self.stats.moves += 1;
        Some(column)
    }

    /// Reinforce the round's retrievals and close the round.
    /// `won` is from the engine's point of view.
    pub fn record_outcome(&mut self, won: bool) {
        let updates = self.rule.apply(&mut self.memory, &mut self.trace, won);
        self.stats.reinforcement_passes += 1;
        self.phase = EnginePhase::RoundOver;
        info!(won, updates, "round finished, memory reinforced");
    }

    /// Store `column` as an opening that won its round.
    pub fn remember_opening(&mut self, column: usize) {
        self.memory.insert(start_move_record(column));
        debug!(column, "remembered winning opening");
    }

    /// Close a round that nobody won. The retrievals are dropped unreinforced.
    pub fn abandon_round(&mut self) {
        self.discard_trace();
        self.phase = EnginePhase::RoundOver;
    }

    /// Start a new round, dropping any unreinforced retrievals.
    pub fn reset_round(&mut self) {
        self.discard_trace();
        self.phase = EnginePhase::FirstMove;
    }

    fn discard_trace(&mut self) {
        if !self.trace.is_empty() {
            debug!(discarded = self.trace.len(), "round abandoned without reinforcement");
        }
        self.trace.clear();
    }

    /// Let model time pass for one inserted coin.
    pub fn observe_move(&mut self) {
        self.memory.advance_time(self.config.seconds_per_move);
    }

    fn opening_column(&mut self, cols: usize, legal: &[usize]) -> usize {
        let saved_decay = self.memory.base_level_decay();
        let saved_latency = self.memory.latency_factor();
        self.memory.set_base_level_decay(self.config.first_move_decay);
        self.memory.set_latency_factor(self.config.first_move_latency);
        let retrieved = self.memory.retrieve(&start_move_query());
        self.memory.set_base_level_decay(saved_decay);
        self.memory.set_latency_factor(saved_latency);

        let remembered = retrieved
            .and_then(|id| self.memory.chunk(id))
            .and_then(|chunk| chunk.get(Slot::FirstColumn))
            .and_then(SlotValue::number)
            .and_then(|n| column_from_number(n, cols))
            .filter(|column| legal.contains(column));

        if let Some(column) = remembered {
            self.default_first_column = Some(column);
            self.stats.openings_recalled += 1;
            debug!(column, "opening recalled from memory");
            return column;
        }

        let rng = &mut self.rng;
        let default = *self
            .default_first_column
            .get_or_insert_with(|| rng.random_range(0..cols));
        if legal.contains(&default) {
            debug!(column = default, "opening from default column");
            default
        } else {
            random_column(&mut self.rng, legal)
        }
    }

    fn scenario_column<B: BoardOracle + ?Sized>(&mut self, board: &B, legal: &[usize]) -> usize {
        let options = available_strategies(board, self.player.to_cell(), self.player.other().to_cell());
        let query = encode_scenario(&options);
        let retrieved = self.memory.retrieve(&query);
        let decision = retrieved
            .and_then(|id| self.memory.chunk(id))
            .and_then(Chunk::decision);
        if let Some(id) = retrieved {
            self.trace.push(id);
        }

        let candidates: Vec<usize> = options
            .iter()
            .filter(|option| Some(option.strategy) == decision)
            .map(|option| option.column)
            .collect();

        match (decision, candidates.choose(&mut self.rng)) {
            (Some(strategy), Some(&column)) => {
                self.memory
                    .insert(query.with(Slot::Decision, SlotValue::Strategy(strategy)));
                debug!(%strategy, column, options = options.len(), "decision retrieved");
                column
            }
            _ => {
                self.stats.fallbacks += 1;
                let column = random_column(&mut self.rng, legal);
                debug!(?decision, column, "no usable decision, playing a random column");
                column
            }
        }
    }
}

impl<M: DeclarativeMemory> Agent for ActrEngine<M> {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        self.choose_move(state.board())
    }

    fn name(&self) -> &str {
        "ACT-R"
    }
}

/// Whole, in-range column number, or `None`.
fn column_from_number(n: f64, cols: usize) -> Option<usize> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < cols as f64 {
        Some(n as usize)
    } else {
        None
    }
}

fn random_column(rng: &mut StdRng, legal: &[usize]) -> usize {
    legal[rng.random_range(0..legal.len())]
}
