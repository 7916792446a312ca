//! Builds the chunks the engine stores and queries.

use super::strategy::{Strategy, StrategyOption};
use crate::memory::{Chunk, ChunkKind, Slot, SlotValue};

/// Query chunk for the current turn: every strategy slot is `True` when at
/// least one column offers it and `Nil` otherwise. Columns are not encoded.
pub fn encode_scenario(options: &[StrategyOption]) -> Chunk {
    let mut chunk = Chunk::new(ChunkKind::Scenario);
    for strategy in Strategy::ALL {
        chunk.set(Slot::Strategy(strategy), SlotValue::Nil);
    }
    for option in options {
        chunk.set(Slot::Strategy(option.strategy), SlotValue::True);
    }
    chunk
}

/// Query for a remembered opening column.
pub fn start_move_query() -> Chunk {
    Chunk::new(ChunkKind::StartMove)
}

/// Record of an opening column that went on to win.
pub fn start_move_record(column: usize) -> Chunk {
    start_move_query().with(Slot::FirstColumn, SlotValue::Number(column as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_options_encodes_all_nil() {
        let chunk = encode_scenario(&[]);
        assert_eq!(chunk.kind(), ChunkKind::Scenario);
        for strategy in Strategy::ALL {
            assert_eq!(chunk.get(Slot::Strategy(strategy)), Some(&SlotValue::Nil));
        }
        assert_eq!(chunk.get(Slot::Decision), None);
    }

    #[test]
    fn test_columns_collapse_to_one_flag() {
        let options = [
            StrategyOption {
                strategy: Strategy::Block2,
                column: 1,
            },
            StrategyOption {
                strategy: Strategy::Block2,
                column: 5,
            },
            StrategyOption {
                strategy: Strategy::Complete3,
                column: 5,
            },
        ];
        let chunk = encode_scenario(&options);

        assert_eq!(chunk.get(Slot::Strategy(Strategy::Block2)), Some(&SlotValue::True));
        assert_eq!(chunk.get(Slot::Strategy(Strategy::Complete3)), Some(&SlotValue::True));
        assert_eq!(chunk.get(Slot::Strategy(Strategy::Block4)), Some(&SlotValue::Nil));
        assert_eq!(chunk.slots().count(), 6);
    }

    #[test]
    fn test_start_move_record() {
        let chunk = start_move_record(4);
        assert_eq!(chunk.kind(), ChunkKind::StartMove);
        assert_eq!(chunk.get(Slot::FirstColumn).and_then(SlotValue::number), Some(4.0));
        assert_eq!(start_move_query().slots().count(), 0);
    }
}
