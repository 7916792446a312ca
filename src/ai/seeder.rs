//! Prior knowledge a player would take from the game manual.

use tracing::info;

use super::engine::EngineConfig;
use super::strategy::Strategy;
use crate::memory::{Chunk, ChunkKind, DeclarativeMemory, Slot, SlotValue};

/// Initial fixed activation for chunks deciding on `strategy`.
pub fn prior_activation(strategy: Strategy, config: &EngineConfig) -> f64 {
    if strategy.is_critical() {
        config.strong_activation
    } else {
        config.base_activation
    }
}

/// Insert one decided scenario for every strategy and every true/nil
/// assignment of the other five slots: 6 x 2^5 chunks. Returns how many
/// chunks were inserted.
pub fn seed_prior_knowledge<M: DeclarativeMemory + ?Sized>(
    memory: &mut M,
    config: &EngineConfig,
) -> usize {
    let mut seeded = 0;

    for strategy in Strategy::ALL {
        let others: Vec<Strategy> = Strategy::ALL
            .into_iter()
            .filter(|&other| other != strategy)
            .collect();
        let activation = prior_activation(strategy, config);

        for mask in 0u32..(1 << others.len()) {
            let mut chunk = Chunk::new(ChunkKind::Scenario);
            for (bit, &other) in others.iter().enumerate() {
                let value = if mask & (1 << bit) != 0 {
                    SlotValue::True
                } else {
                    SlotValue::Nil
                };
                chunk.set(Slot::Strategy(other), value);
            }
            chunk.set(Slot::Strategy(strategy), SlotValue::True);
            chunk.set(Slot::Decision, SlotValue::Strategy(strategy));

            memory.insert(chunk.with_fixed_activation(activation));
            seeded += 1;
        }
    }

    info!(chunks = seeded, "seeded prior strategy knowledge");
    seeded
}
