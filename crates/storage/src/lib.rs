#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Sinks persisting labeled path-contexts, partitioned by dataset split

pub mod error;
mod factory;
mod format;
mod jsonl;
mod memory;
mod split_writer;

pub use factory::create_storage;
pub use format::{Code2SeqStorage, Code2VecStorage};
pub use jsonl::JsonlStorage;
pub use memory::{MemoryStorage, StoredRecord};

use pathminer_core::{DatasetSplit, Error, LabeledPathContexts};

/// Persists labeled path-contexts
///
/// Implementations are not required to be safe under concurrent use; callers
/// serialize access to one sink instance.
pub trait PathContextStorage: Send {
    /// Persist one unit under `split` (`None` for an unpartitioned corpus)
    fn store(
        &mut self,
        unit: &LabeledPathContexts,
        split: Option<DatasetSplit>,
    ) -> Result<(), Error>;

    /// Flush and finalize everything stored so far
    fn close(&mut self) -> Result<(), Error>;
}
