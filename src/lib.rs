//! # ACT-R Connect Four
//!
//! A Connect Four opponent that decides from a declarative memory of past
//! situations instead of searching the game tree. Each turn the available
//! strategies (complete or block a run of 2, 3 or 4) are encoded as a
//! scenario, the best-matching remembered decision is retrieved, and at the
//! end of a round every retrieved decision is reinforced or weakened.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, round state and line analysis
//! - [`memory`]: Chunks, the declarative memory contract and its in-process store
//! - [`ai`]: Strategy catalog, scenario encoding, seeding, reinforcement, the engine
//! - [`session`]: Game loop with the engine's thinking delay and resets
//! - [`training`]: Headless rounds against a random opponent, rolling metrics
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod memory;
pub mod session;
pub mod training;
