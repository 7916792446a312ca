//! End-of-round adjustment of the chunks retrieved during the round.

use tracing::debug;

use super::engine::EngineConfig;
use super::strategy::Strategy;
use crate::memory::{ChunkId, DeclarativeMemory};

/// Chunks retrieved this round, in decision order.
#[derive(Debug, Clone, Default)]
pub struct RetrievalTrace {
    entries: Vec<ChunkId>,
}

impl RetrievalTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ChunkId) {
        self.entries.push(id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.entries.iter().copied()
    }
}

/// Multiplicative win/loss update.
///
/// For the chunk at position `i` of `n`, `recency = 1 + i / n`. A win adds
/// `win_rate * importance * A * recency`; a loss subtracts
/// `loss_rate / importance * A * recency`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReinforcementRule {
    pub win_rate: f64,
    pub loss_rate: f64,
    pub critical_importance: f64,
}

impl ReinforcementRule {
    pub fn from_config(config: &EngineConfig) -> Self {
        ReinforcementRule {
            win_rate: config.win_rate,
            loss_rate: config.loss_rate,
            critical_importance: config.critical_importance,
        }
    }

    pub fn importance(&self, decision: Option<Strategy>) -> f64 {
        match decision {
            Some(strategy) if strategy.is_critical() => self.critical_importance,
            _ => 1.0,
        }
    }

    pub fn adjust(&self, activation: f64, importance: f64, recency: f64, won: bool) -> f64 {
        if won {
            activation + self.win_rate * importance * activation * recency
        } else {
            activation - self.loss_rate * (1.0 / importance) * activation * recency
        }
    }

    /// Update every traced chunk and empty the trace. Chunks without a fixed
    /// activation start from 1. Returns the number of updates applied.
    pub fn apply<M: DeclarativeMemory + ?Sized>(
        &self,
        memory: &mut M,
        trace: &mut RetrievalTrace,
        won: bool,
    ) -> usize {
        let n = trace.len();
        for (i, id) in trace.iter().enumerate() {
            let recency = 1.0 + i as f64 / n as f64;
            let decision = memory.chunk(id).and_then(|chunk| chunk.decision());
            let importance = self.importance(decision);
            let current = memory.fixed_activation(id).unwrap_or(1.0);
            let updated = self.adjust(current, importance, recency, won);
            memory.set_fixed_activation(id, Some(updated));
        }
        trace.clear();
        debug!(updates = n, won, "reinforced retrieved chunks");
        n
    }
}

impl Default for ReinforcementRule {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::encode_scenario;
    use crate::ai::StrategyOption;
    use crate::memory::{ChunkStore, MemoryConfig, Slot, SlotValue};

    fn decided(memory: &mut ChunkStore, strategy: Strategy, activation: Option<f64>) -> ChunkId {
        let mut chunk = encode_scenario(&[StrategyOption {
            strategy,
            column: 0,
        }])
        .with(Slot::Decision, SlotValue::Strategy(strategy));
        chunk.fixed_activation = activation;
        memory.insert(chunk)
    }

    #[test]
    fn test_win_raises_every_traced_chunk() {
        let mut memory = ChunkStore::new(MemoryConfig::default(), None);
        let mut trace = RetrievalTrace::new();
        let ids: Vec<_> = [Strategy::Complete2, Strategy::Block3, Strategy::Complete4]
            .into_iter()
            .map(|s| decided(&mut memory, s, Some(1.0)))
            .collect();
        ids.iter().for_each(|&id| trace.push(id));

        let applied = ReinforcementRule::default().apply(&mut memory, &mut trace, true);

        assert_eq!(applied, 3);
        assert!(trace.is_empty());
        for id in ids {
            assert!(memory.fixed_activation(id).unwrap() > 1.0);
        }
    }

    #[test]
    fn test_loss_lowers_but_keeps_positive() {
        let mut memory = ChunkStore::new(MemoryConfig::default(), None);
        let mut trace = RetrievalTrace::new();
        let id = decided(&mut memory, Strategy::Block2, Some(0.3));
        for _ in 0..5 {
            trace.push(id);
        }

        ReinforcementRule::default().apply(&mut memory, &mut trace, false);

        let after = memory.fixed_activation(id).unwrap();
        assert!(after < 0.3);
        assert!(after > 0.0);
    }

    #[test]
    fn test_exact_update_values() {
        let mut memory = ChunkStore::new(MemoryConfig::default(), None);
        let mut trace = RetrievalTrace::new();
        let first = decided(&mut memory, Strategy::Complete3, Some(1.0));
        let second = decided(&mut memory, Strategy::Block4, Some(1.7));
        trace.push(first);
        trace.push(second);

        ReinforcementRule::default().apply(&mut memory, &mut trace, true);

        // 1.0 + 0.35 * 1 * 1.0 * 1.0
        assert!((memory.fixed_activation(first).unwrap() - 1.35).abs() < 1e-12);
        // 1.7 + 0.35 * 2 * 1.7 * 1.5
        assert!((memory.fixed_activation(second).unwrap() - 3.485).abs() < 1e-12);
    }

    #[test]
    fn test_unset_activation_starts_from_one() {
        let mut memory = ChunkStore::new(MemoryConfig::default(), None);
        let mut trace = RetrievalTrace::new();
        let id = decided(&mut memory, Strategy::Complete2, None);
        trace.push(id);

        ReinforcementRule::default().apply(&mut memory, &mut trace, false);

        // 1.0 - 0.1 * 1 * 1.0 * 1.0
        assert!((memory.fixed_activation(id).unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_critical_strategies_gain_more_and_lose_less() {
        let rule = ReinforcementRule::default();
        let critical = rule.importance(Some(Strategy::Complete4));
        let normal = rule.importance(Some(Strategy::Complete3));
        assert_eq!(rule.importance(Some(Strategy::Block4)), critical);
        assert_eq!(rule.importance(None), 1.0);

        for recency in [1.0, 1.25, 1.5, 1.99] {
            let gain_critical = rule.adjust(1.0, critical, recency, true) - 1.0;
            let gain_normal = rule.adjust(1.0, normal, recency, true) - 1.0;
            assert!(gain_critical > gain_normal);

            let loss_critical = 1.0 - rule.adjust(1.0, critical, recency, false);
            let loss_normal = 1.0 - rule.adjust(1.0, normal, recency, false);
            assert!(loss_critical < loss_normal);
        }
    }

    #[test]
    fn test_later_decisions_weigh_more() {
        let mut memory = ChunkStore::new(MemoryConfig::default(), None);
        let mut trace = RetrievalTrace::new();
        let early = decided(&mut memory, Strategy::Complete2, Some(1.0));
        let late = decided(&mut memory, Strategy::Block2, Some(1.0));
        trace.push(early);
        trace.push(late);

        ReinforcementRule::default().apply(&mut memory, &mut trace, true);

        assert!(memory.fixed_activation(late).unwrap() > memory.fixed_activation(early).unwrap());
    }

    #[test]
    fn test_empty_trace_is_a_no_op() {
        let mut memory = ChunkStore::new(MemoryConfig::default(), None);
        let mut trace = RetrievalTrace::new();
        assert_eq!(ReinforcementRule::default().apply(&mut memory, &mut trace, true), 0);
    }
}
