//! Headless training: rounds of the engine against an opponent agent, with
//! rolling metrics.

pub mod metrics;
pub mod trainer;
