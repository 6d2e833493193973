use crate::error::StorageError;
use crate::split_writer::SplitWriter;
use crate::PathContextStorage;
use pathminer_core::{DatasetSplit, Error, LabeledPathContexts};
use std::path::PathBuf;

/// `<split>.jsonl` files, one JSON object per unit
///
/// Unlike the code2seq formats this keeps the common-ancestor index and the
/// resolved types of both ends of every context.
#[derive(Debug)]
pub struct JsonlStorage {
    writer: SplitWriter,
}

impl JsonlStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: SplitWriter::new(output_dir, "jsonl"),
        }
    }
}

impl PathContextStorage for JsonlStorage {
    fn store(
        &mut self,
        unit: &LabeledPathContexts,
        split: Option<DatasetSplit>,
    ) -> Result<(), Error> {
        let line = serde_json::to_string(unit)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.writer.push(split, line)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        Ok(self.writer.close()?)
    }
}
