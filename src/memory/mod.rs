//! Declarative memory: chunk records, the memory contract the engine relies
//! on, an in-process store with decaying activation, and JSON snapshots.

mod chunk;
mod snapshot;
mod store;

pub use chunk::{Chunk, ChunkId, ChunkKind, Slot, SlotValue};
pub use snapshot::{MemorySnapshot, RecordSnapshot, SNAPSHOT_VERSION};
pub use store::{ChunkStore, DeclarativeMemory, MemoryConfig};
