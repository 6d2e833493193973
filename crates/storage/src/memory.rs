use crate::error::StorageError;
use crate::PathContextStorage;
use pathminer_core::{DatasetSplit, Error, LabeledPathContexts};
use std::sync::{Arc, Mutex, PoisonError};

/// One stored unit and the split it was stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub split: Option<DatasetSplit>,
    pub unit: LabeledPathContexts,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<StoredRecord>,
    closed: bool,
}

/// In-process storage for dry runs and tests
///
/// Clones share the same records, so a handle kept by the caller observes
/// everything stored through the clone handed to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in store order
    pub fn records(&self) -> Vec<StoredRecord> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }
}

impl PathContextStorage for MemoryStorage {
    fn store(
        &mut self,
        unit: &LabeledPathContexts,
        split: Option<DatasetSplit>,
    ) -> Result<(), Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StorageError::BackendError(format!("Memory storage poisoned: {e}")))?;
        if state.closed {
            return Err(StorageError::Closed.into());
        }
        state.records.push(StoredRecord {
            split,
            unit: unit.clone(),
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.state
            .lock()
            .map_err(|e| StorageError::BackendError(format!("Memory storage poisoned: {e}")))?
            .closed = true;
        Ok(())
    }
}
