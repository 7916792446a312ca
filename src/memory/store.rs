use rand::rngs::StdRng;
use rand::Rng;
use tracing::trace;

use super::chunk::{Chunk, ChunkId};
use crate::ai::seeded_rng;

/// Smallest age (seconds) a reference can have when computing decay.
const MIN_REFERENCE_AGE: f64 = 0.05;

/// Parameters of the declarative memory.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Exponent `d` of base-level decay.
    pub base_level_decay: f64,
    /// Factor `F` of retrieval latency `F * e^(-A)`.
    pub latency_factor: f64,
    /// Chunks below this activation cannot be retrieved.
    pub retrieval_threshold: f64,
    /// Scale `s` of logistic activation noise; 0 disables noise.
    pub activation_noise: f64,
    /// Allow chunks that differ from the query, at a cost per differing slot.
    pub partial_matching: bool,
    pub mismatch_penalty: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            base_level_decay: 0.5,
            latency_factor: 0.05,
            retrieval_threshold: -2.0,
            activation_noise: 0.0,
            partial_matching: false,
            mismatch_penalty: 1.0,
        }
    }
}

/// Contract of the associative memory the decision engine relies on.
pub trait DeclarativeMemory {
    /// Store a chunk. An existing chunk with the same content is reinforced
    /// with a new reference and its id returned instead.
    fn insert(&mut self, chunk: Chunk) -> ChunkId;

    fn chunk(&self, id: ChunkId) -> Option<&Chunk>;

    /// Best match for the query, or `None` when nothing clears the threshold.
    fn retrieve(&mut self, query: &Chunk) -> Option<ChunkId>;

    fn fixed_activation(&self, id: ChunkId) -> Option<f64>;

    fn set_fixed_activation(&mut self, id: ChunkId, activation: Option<f64>);

    fn base_level_decay(&self) -> f64;

    fn set_base_level_decay(&mut self, decay: f64);

    fn latency_factor(&self) -> f64;

    fn set_latency_factor(&mut self, factor: f64);

    /// Advance model time by `seconds`.
    fn advance_time(&mut self, seconds: f64);

    fn len(&self) -> usize;

    /// Forget usage history: model time returns to zero and every chunk keeps
    /// a single reference at time zero. Chunks and fixed activations stay.
    fn reset(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) chunk: Chunk,
    /// Model times at which the chunk was created or retrieved.
    pub(crate) references: Vec<f64>,
}

/// In-process declarative memory with base-level decay.
///
/// Activation of a chunk is its fixed activation when set, otherwise
/// `ln(sum((now - t)^-d))` over its reference times. Noise is added on top.
#[derive(Debug)]
pub struct ChunkStore {
    pub(crate) entries: Vec<Entry>,
    config: MemoryConfig,
    pub(crate) time: f64,
    rng: StdRng,
}

impl ChunkStore {
    pub fn new(config: MemoryConfig, seed: Option<u64>) -> Self {
        ChunkStore {
            entries: Vec::new(),
            config,
            time: 0.0,
            rng: seeded_rng(seed),
        }
    }

    pub(crate) fn from_parts(
        entries: Vec<Entry>,
        time: f64,
        config: MemoryConfig,
        seed: Option<u64>,
    ) -> Self {
        ChunkStore {
            entries,
            config,
            time,
            rng: seeded_rng(seed),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn ids(&self) -> impl Iterator<Item = ChunkId> {
        (0..self.entries.len()).map(ChunkId)
    }

    pub fn references(&self, id: ChunkId) -> usize {
        self.entries.get(id.0).map_or(0, |e| e.references.len())
    }

    /// Activation without noise at the current model time.
    pub fn activation(&self, id: ChunkId) -> Option<f64> {
        self.entries.get(id.0).map(|entry| self.base_activation(entry))
    }

    fn base_activation(&self, entry: &Entry) -> f64 {
        if let Some(fixed) = entry.chunk.fixed_activation {
            return fixed;
        }
        let decay = self.config.base_level_decay;
        let sum: f64 = entry
            .references
            .iter()
            .map(|&t| (self.time - t).max(MIN_REFERENCE_AGE).powf(-decay))
            .sum();
        if sum > 0.0 {
            sum.ln()
        } else {
            f64::NEG_INFINITY
        }
    }

    /// Logistic noise with scale `s`.
    fn noise(&mut self) -> f64 {
        let s = self.config.activation_noise;
        if s <= 0.0 {
            return 0.0;
        }
        let p: f64 = self.rng.random_range(f64::EPSILON..1.0);
        s * ((1.0 - p) / p).ln()
    }
}

impl DeclarativeMemory for ChunkStore {
    fn insert(&mut self, chunk: Chunk) -> ChunkId {
        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.chunk.same_content(&chunk))
        {
            self.entries[index].references.push(self.time);
            return ChunkId(index);
        }
        self.entries.push(Entry {
            chunk,
            references: vec![self.time],
        });
        ChunkId(self.entries.len() - 1)
    }

    fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.entries.get(id.0).map(|entry| &entry.chunk)
    }

    fn retrieve(&mut self, query: &Chunk) -> Option<ChunkId> {
        let mut best: Option<(usize, f64)> = None;
        let mut ties = 0usize;

        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            if entry.chunk.kind() != query.kind() {
                continue;
            }
            let mismatches = entry.chunk.mismatches(query);
            if mismatches > 0 && !self.config.partial_matching {
                continue;
            }
            let matched = self.base_activation(entry)
                - self.config.mismatch_penalty * mismatches as f64;
            let activation = matched + self.noise();

            match best {
                Some((_, top)) if activation < top => {}
                Some((_, top)) if activation == top => {
                    // Reservoir pick keeps ties uniform
                    ties += 1;
                    if self.rng.random_range(0..ties) == 0 {
                        best = Some((index, activation));
                    }
                }
                _ => {
                    best = Some((index, activation));
                    ties = 1;
                }
            }
        }

        match best {
            Some((index, activation)) if activation >= self.config.retrieval_threshold => {
                self.time += self.config.latency_factor * (-activation).exp();
                self.entries[index].references.push(self.time);
                trace!(chunk = index, activation, "retrieved chunk");
                Some(ChunkId(index))
            }
            _ => {
                self.time += self.config.latency_factor * (-self.config.retrieval_threshold).exp();
                trace!(kind = ?query.kind(), "retrieval failure");
                None
            }
        }
    }

    fn fixed_activation(&self, id: ChunkId) -> Option<f64> {
        self.entries.get(id.0).and_then(|e| e.chunk.fixed_activation)
    }

    fn set_fixed_activation(&mut self, id: ChunkId, activation: Option<f64>) {
        if let Some(entry) = self.entries.get_mut(id.0) {
            entry.chunk.fixed_activation = activation;
        }
    }

    fn base_level_decay(&self) -> f64 {
        self.config.base_level_decay
    }

    fn set_base_level_decay(&mut self, decay: f64) {
        self.config.base_level_decay = decay;
    }

    fn latency_factor(&self) -> f64 {
        self.config.latency_factor
    }

    fn set_latency_factor(&mut self, factor: f64) {
        self.config.latency_factor = factor;
    }

    fn advance_time(&mut self, seconds: f64) {
        self.time += seconds;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn reset(&mut self) {
        self.time = 0.0;
        for entry in &mut self.entries {
            entry.references.clear();
            entry.references.push(0.0);
        }
    }
}
