use crate::error::StorageError;
use crate::{
    Code2SeqStorage, Code2VecStorage, JsonlStorage, MemoryStorage, PathContextStorage,
};
use pathminer_core::{config::StorageConfig, Error};
use std::path::Path;
use tracing::debug;

/// Creates the storage sink selected by configuration.
///
/// File sinks write into `output_dir` when closed.
///
/// # Errors
/// Returns an error for a storage kind no sink exists for
pub fn create_storage(
    config: &StorageConfig,
    output_dir: &Path,
) -> Result<Box<dyn PathContextStorage>, Error> {
    debug!(
        "Creating {} storage in {}",
        config.kind,
        output_dir.display()
    );
    match config.kind.as_str() {
        "code2seq" => Ok(Box::new(Code2SeqStorage::new(output_dir))),
        "code2vec" => Ok(Box::new(Code2VecStorage::new(output_dir))),
        "jsonl" => Ok(Box::new(JsonlStorage::new(output_dir))),
        "memory" => Ok(Box::new(MemoryStorage::new())),
        other => Err(StorageError::UnknownKind(other.to_string()).into()),
    }
}
