mod agent;
mod engine;
mod random;
mod reinforcement;
mod scenario;
mod seeder;
mod strategy;

pub use agent::Agent;
pub use engine::{ActrEngine, EngineConfig, EnginePhase, EngineStats};
pub use random::{seeded_rng, RandomAgent};
pub use reinforcement::{ReinforcementRule, RetrievalTrace};
pub use scenario::{encode_scenario, start_move_query, start_move_record};
pub use seeder::{prior_activation, seed_prior_knowledge};
pub use strategy::{available_strategies, Strategy, StrategyOption};
