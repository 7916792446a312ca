use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::Strategy;

/// Handle to a chunk stored in a declarative memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub usize);

/// Type tag of a chunk. Retrieval never crosses kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkKind {
    /// Strategies available at one decision point, plus the decision taken.
    Scenario,
    /// Opening column of a round its first player went on to win.
    StartMove,
}

/// The closed set of slot names a chunk may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Slot {
    Strategy(Strategy),
    Decision,
    FirstColumn,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Strategy(strategy) => strategy.tag(),
            Slot::Decision => "decision",
            Slot::FirstColumn => "first-column",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(Slot::Decision),
            "first-column" => Ok(Slot::FirstColumn),
            other => other
                .parse::<Strategy>()
                .map(Slot::Strategy)
                .map_err(|_| format!("unknown slot '{}'", other)),
        }
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.name().to_string()
    }
}

impl TryFrom<String> for Slot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Value held by a slot.
///
/// `Nil` is the explicit "not achievable" marker and is distinct from a slot
/// that was never set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum SlotValue {
    True,
    Nil,
    Strategy(Strategy),
    Number(f64),
    Text(String),
}

impl SlotValue {
    /// Numeric reading of the value; text is parsed leniently.
    pub fn number(&self) -> Option<f64> {
        match self {
            SlotValue::Number(n) => Some(*n),
            SlotValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            SlotValue::Strategy(strategy) => Some(*strategy),
            SlotValue::Text(text) => text.parse().ok(),
            _ => None,
        }
    }
}

/// A declarative memory record: a kind, a slot map, and an optional fixed
/// activation that overrides decay-based activation while set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    kind: ChunkKind,
    slots: BTreeMap<Slot, SlotValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_activation: Option<f64>,
}

impl Chunk {
    pub fn new(kind: ChunkKind) -> Self {
        Chunk {
            kind,
            slots: BTreeMap::new(),
            fixed_activation: None,
        }
    }

    pub fn kind(&self) -> ChunkKind {
        self.kind
    }

    pub fn set(&mut self, slot: Slot, value: SlotValue) {
        self.slots.insert(slot, value);
    }

    /// Builder-style `set`.
    pub fn with(mut self, slot: Slot, value: SlotValue) -> Self {
        self.set(slot, value);
        self
    }

    pub fn with_fixed_activation(mut self, activation: f64) -> Self {
        self.fixed_activation = Some(activation);
        self
    }

    /// `None` when the slot was never set.
    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.slots.get(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = (Slot, &SlotValue)> {
        self.slots.iter().map(|(slot, value)| (*slot, value))
    }

    pub fn decision(&self) -> Option<Strategy> {
        self.get(Slot::Decision).and_then(SlotValue::strategy)
    }

    /// Same kind and identical slot contents; activation is not compared.
    pub fn same_content(&self, other: &Chunk) -> bool {
        self.kind == other.kind && self.slots == other.slots
    }

    /// Number of the query's slots this chunk does not hold with the same value.
    pub fn mismatches(&self, query: &Chunk) -> usize {
        query
            .slots()
            .filter(|(slot, value)| self.get(*slot) != Some(*value))
            .count()
    }
}
