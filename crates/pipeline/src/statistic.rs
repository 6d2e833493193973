//! Aggregate counts of one extraction run

use pathminer_core::DatasetSplit;
use std::collections::BTreeMap;
use std::fmt;

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileOutcome {
    /// The filter chain rejected the file
    Rejected,
    /// The file passed the filters but produced no unit
    Skipped,
    /// This many units were stored
    Stored(usize),
    /// Parsing or a later stage failed
    Failed,
}

/// Per-split counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStatistic {
    files: usize,
    units: usize,
}

impl SplitStatistic {
    /// Files seen in this split, whatever their outcome
    pub fn files(&self) -> usize {
        self.files
    }

    /// Units stored for this split
    pub fn units(&self) -> usize {
        self.units
    }
}

/// Statistics for an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStatistic {
    repositories: usize,
    files_processed: usize,
    files_rejected: usize,
    files_skipped: usize,
    files_failed: usize,
    splits: BTreeMap<Option<DatasetSplit>, SplitStatistic>,
}

impl DatasetStatistic {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_repository(&mut self) {
        self.repositories += 1;
    }

    pub(crate) fn record(&mut self, split: Option<DatasetSplit>, outcome: FileOutcome) {
        self.files_processed += 1;
        let entry = self.splits.entry(split).or_default();
        entry.files += 1;
        match outcome {
            FileOutcome::Rejected => self.files_rejected += 1,
            FileOutcome::Skipped => self.files_skipped += 1,
            FileOutcome::Failed => self.files_failed += 1,
            FileOutcome::Stored(units) => entry.units += units,
        }
    }

    /// Number of repositories opened
    pub fn repositories(&self) -> usize {
        self.repositories
    }

    /// Total number of files processed, whatever their outcome
    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    /// Files rejected by the filter chain
    pub fn files_rejected(&self) -> usize {
        self.files_rejected
    }

    /// Files that passed the filters but yielded no unit
    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }

    /// Files that failed to parse or to process
    pub fn files_failed(&self) -> usize {
        self.files_failed
    }

    /// Units stored across all splits
    pub fn units_stored(&self) -> usize {
        self.splits.values().map(|s| s.units).sum()
    }

    /// Counts for `split` (`None` for an unpartitioned corpus)
    pub fn split(&self, split: Option<DatasetSplit>) -> SplitStatistic {
        self.splits.get(&split).copied().unwrap_or_default()
    }
}

impl fmt::Display for DatasetStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processed {} files from {} repositories: {} units stored, \
             {} rejected, {} skipped, {} failed",
            self.files_processed,
            self.repositories,
            self.units_stored(),
            self.files_rejected,
            self.files_skipped,
            self.files_failed
        )?;
        for (split, stat) in &self.splits {
            writeln!(
                f,
                "  {:<5} {} files, {} units",
                DatasetSplit::file_stem(*split),
                stat.files,
                stat.units
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_outcomes() {
        let mut stats = DatasetStatistic::new();
        stats.record_repository();
        stats.record(Some(DatasetSplit::Train), FileOutcome::Stored(3));
        stats.record(Some(DatasetSplit::Train), FileOutcome::Rejected);
        stats.record(Some(DatasetSplit::Test), FileOutcome::Failed);
        stats.record(Some(DatasetSplit::Test), FileOutcome::Skipped);

        assert_eq!(stats.files_processed(), 4);
        assert_eq!(stats.units_stored(), 3);
        assert_eq!(stats.files_rejected(), 1);
        assert_eq!(stats.files_failed(), 1);
        assert_eq!(stats.files_skipped(), 1);
        assert_eq!(stats.split(Some(DatasetSplit::Train)).files(), 2);
        assert_eq!(stats.split(Some(DatasetSplit::Validation)), SplitStatistic::default());
    }

    #[test]
    fn test_display_lists_splits() {
        let mut stats = DatasetStatistic::new();
        stats.record(None, FileOutcome::Stored(2));
        let text = stats.to_string();
        assert!(text.starts_with("Processed 1 files from 0 repositories: 2 units stored"));
        assert!(text.contains("data  1 files, 2 units"));
    }
}
