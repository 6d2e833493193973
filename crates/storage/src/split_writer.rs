//! Per-split output files, streamed while storing and sorted on close

use crate::error::StorageError;
use pathminer_core::DatasetSplit;
use std::cmp::Reverse;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BinaryHeap};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lines sorted in memory at once while closing
const LINES_PER_RUN: usize = 100_000;

/// Unsorted lines of one split, appended as they arrive
#[derive(Debug)]
struct PendingFile {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

/// Writes `<stem>.<extension>` files, one per split
///
/// Lines go to `<stem>.<extension>.tmp` as they are pushed. `close()` sorts
/// each temporary file with an external merge sort and renames the result
/// into place, so the files depend only on the set of stored records and
/// not on the order workers delivered them.
#[derive(Debug)]
pub(crate) struct SplitWriter {
    dir: PathBuf,
    extension: &'static str,
    lines_per_run: usize,
    pending: BTreeMap<Option<DatasetSplit>, PendingFile>,
    closed: bool,
}

impl SplitWriter {
    pub(crate) fn new(dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            extension,
            lines_per_run: LINES_PER_RUN,
            pending: BTreeMap::new(),
            closed: false,
        }
    }

    #[cfg(test)]
    fn with_lines_per_run(mut self, lines_per_run: usize) -> Self {
        self.lines_per_run = lines_per_run.max(1);
        self
    }

    pub(crate) fn push(
        &mut self,
        split: Option<DatasetSplit>,
        line: String,
    ) -> Result<(), StorageError> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        let file = match self.pending.entry(split) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = with_suffix(&file_path(&self.dir, self.extension, split), "tmp");
                entry.insert(open_pending(&self.dir, path)?)
            }
        };
        writeln!(file.writer, "{line}").map_err(|e| StorageError::io(&file.path, e))?;
        file.lines += 1;
        Ok(())
    }

    /// Sort every pending split into its final file; closing twice is a no-op
    pub(crate) fn close(&mut self) -> Result<(), StorageError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        for (split, mut pending) in std::mem::take(&mut self.pending) {
            pending
                .writer
                .flush()
                .map_err(|e| StorageError::io(&pending.path, e))?;
            drop(pending.writer);

            let target = file_path(&self.dir, self.extension, split);
            sort_into(&pending.path, &target, self.lines_per_run)?;
            fs::remove_file(&pending.path).map_err(|e| StorageError::io(&pending.path, e))?;
            info!("Wrote {} records to {}", pending.lines, target.display());
        }
        Ok(())
    }
}

impl Drop for SplitWriter {
    fn drop(&mut self) {
        // An aborted run keeps what was stored so far in the .tmp files
        for pending in self.pending.values_mut() {
            if let Err(e) = pending.writer.flush() {
                warn!("Failed to flush {}: {e}", pending.path.display());
            }
        }
    }
}

/// Final path of the file holding `split`
fn file_path(dir: &Path, extension: &str, split: Option<DatasetSplit>) -> PathBuf {
    dir.join(format!("{}.{}", DatasetSplit::file_stem(split), extension))
}

fn open_pending(dir: &Path, path: PathBuf) -> Result<PendingFile, StorageError> {
    fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
    let file = File::create(&path).map_err(|e| StorageError::io(&path, e))?;
    debug!("Streaming records to {}", path.display());
    Ok(PendingFile {
        path,
        writer: BufWriter::new(file),
        lines: 0,
    })
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Sort the lines of `source` into `target` holding at most `lines_per_run` in memory
fn sort_into(source: &Path, target: &Path, lines_per_run: usize) -> Result<(), StorageError> {
    let reader = BufReader::new(File::open(source).map_err(|e| StorageError::io(source, e))?);
    let mut runs = Vec::new();
    let mut chunk = Vec::with_capacity(lines_per_run.min(LINES_PER_RUN));

    for line in reader.lines() {
        chunk.push(line.map_err(|e| StorageError::io(source, e))?);
        if chunk.len() >= lines_per_run {
            let run = with_suffix(target, &format!("run{}", runs.len()));
            write_sorted(&run, &mut chunk)?;
            runs.push(run);
            chunk.clear();
        }
    }

    let staged = with_suffix(target, "sorted");
    if runs.is_empty() {
        write_sorted(&staged, &mut chunk)?;
    } else {
        if !chunk.is_empty() {
            let run = with_suffix(target, &format!("run{}", runs.len()));
            write_sorted(&run, &mut chunk)?;
            runs.push(run);
        }
        debug!("Merging {} sorted runs into {}", runs.len(), target.display());
        merge_runs(&runs, &staged)?;
        for run in &runs {
            fs::remove_file(run).map_err(|e| StorageError::io(run, e))?;
        }
    }

    fs::rename(&staged, target).map_err(|e| StorageError::io(target, e))
}

fn write_sorted(path: &Path, lines: &mut [String]) -> Result<(), StorageError> {
    lines.sort_unstable();
    let mut writer = BufWriter::new(File::create(path).map_err(|e| StorageError::io(path, e))?);
    for line in lines.iter() {
        writeln!(writer, "{line}").map_err(|e| StorageError::io(path, e))?;
    }
    writer.flush().map_err(|e| StorageError::io(path, e))
}

/// K-way merge of sorted run files
fn merge_runs(runs: &[PathBuf], target: &Path) -> Result<(), StorageError> {
    let mut readers = runs
        .iter()
        .map(|run| {
            File::open(run)
                .map(|f| BufReader::new(f).lines())
                .map_err(|e| StorageError::io(run, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut heap = BinaryHeap::new();
    for (index, reader) in readers.iter_mut().enumerate() {
        if let Some(line) = reader.next() {
            let line = line.map_err(|e| StorageError::io(&runs[index], e))?;
            heap.push(Reverse((line, index)));
        }
    }

    let mut writer =
        BufWriter::new(File::create(target).map_err(|e| StorageError::io(target, e))?);
    while let Some(Reverse((line, index))) = heap.pop() {
        writeln!(writer, "{line}").map_err(|e| StorageError::io(target, e))?;
        if let Some(next) = readers[index].next() {
            let next = next.map_err(|e| StorageError::io(&runs[index], e))?;
            heap.push(Reverse((next, index)));
        }
    }
    writer.flush().map_err(|e| StorageError::io(target, e))
}
