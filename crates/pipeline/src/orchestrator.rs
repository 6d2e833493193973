//! Corpus-wide extraction driver
//!
//! Files of one repository are processed in fixed-size batches. Every file of a
//! batch runs on its own blocking worker and the whole batch is joined before
//! the next one starts, which caps concurrency at the batch size. The storage
//! sink is the only state shared between workers and is used under one lock.

use crate::filters::FilterChain;
use crate::labels::LabelExtractor;
use crate::paths::PathMiner;
use crate::repository::{detect_layout, FsRepositoryOpener, RepositoryOpener};
use crate::statistic::{DatasetStatistic, FileOutcome};
use crate::transformations::TransformationPipeline;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use pathminer_core::error::{Error, Result};
use pathminer_core::{Config, DatasetSplit, LabeledPathContexts, Workspace};
use pathminer_languages::{capability_for, FrontEnd, LanguageCapability, TreeSitterFrontEnd};
use pathminer_storage::PathContextStorage;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Storage sink shared by all workers
pub type SharedStorage = Arc<Mutex<Box<dyn PathContextStorage>>>;

/// Runs one file through parse, transformations, filters, labeling and path retrieval
struct FileProcessor {
    capability: &'static dyn LanguageCapability,
    front_end: Arc<dyn FrontEnd>,
    transformations: TransformationPipeline,
    filters: FilterChain,
    labels: LabelExtractor,
    paths: PathMiner,
    print_trees: bool,
}

impl FileProcessor {
    fn process(
        &self,
        file: &Path,
        workspace: &Workspace,
        split: Option<DatasetSplit>,
        storage: &SharedStorage,
    ) -> Result<FileOutcome> {
        let mut tree = self.front_end.parse(file, workspace)?;
        self.transformations.apply(&mut tree, self.capability)?;

        if !self.filters.validate(&tree, self.capability) {
            debug!("Rejected {}", file.display());
            return Ok(FileOutcome::Rejected);
        }

        let units = self.labels.extract(&tree, self.capability);
        if units.is_empty() {
            debug!("No units in {}", file.display());
            return Ok(FileOutcome::Skipped);
        }

        for unit in &units {
            let record =
                LabeledPathContexts::new(unit.label(), self.paths.retrieve_paths(unit.tree()));

            let mut sink = storage
                .lock()
                .map_err(|_| Error::storage("Storage lock poisoned by a failed worker"))?;
            sink.store(&record, split)?;
            if self.print_trees {
                println!("{} ({})\n{}", unit.label(), file.display(), unit.tree().render());
            }
        }
        Ok(FileOutcome::Stored(units.len()))
    }
}

/// Advances the progress bar when the worker holding it finishes, however it finishes
struct ProgressTick(ProgressBar);

impl Drop for ProgressTick {
    fn drop(&mut self) {
        self.0.inc(1);
    }
}

/// Extraction pipeline over a whole corpus
pub struct Pipeline {
    processor: Arc<FileProcessor>,
    opener: Arc<dyn RepositoryOpener>,
    batch_size: usize,
}

impl Pipeline {
    /// Create a pipeline with the tree-sitter front-end and the filesystem opener
    ///
    /// # Errors
    /// Returns `Error::Config` for an invalid configuration, before anything is opened
    pub fn new(config: &Config) -> Result<Self> {
        let capability = capability_for(config.pipeline.language);
        Self::with_collaborators(
            config,
            Arc::new(TreeSitterFrontEnd::new(config.pipeline.language)),
            Arc::new(FsRepositoryOpener::new(capability)),
        )
    }

    /// Create a pipeline with explicit front-end and repository opener
    pub fn with_collaborators(
        config: &Config,
        front_end: Arc<dyn FrontEnd>,
        opener: Arc<dyn RepositoryOpener>,
    ) -> Result<Self> {
        config.validate()?;

        let pipeline = &config.pipeline;
        let transformations = TransformationPipeline::from_kinds(&pipeline.transformations);
        let filters = FilterChain::from_config(&pipeline.filters);
        debug!(
            "Pipeline for {}: transformations {:?}, filters {:?}, granularity {}",
            pipeline.language, transformations, filters, pipeline.granularity
        );

        Ok(Self {
            processor: Arc::new(FileProcessor {
                capability: capability_for(pipeline.language),
                front_end,
                transformations,
                filters,
                labels: LabelExtractor::new(pipeline.granularity),
                paths: PathMiner::from_config(&config.paths),
                print_trees: pipeline.print_trees,
            }),
            opener,
            batch_size: pipeline.batch_size,
        })
    }

    /// Mine every repository of `dataset` into `storage`, then close it
    ///
    /// Per-file failures are logged and counted; a storage failure aborts the
    /// run after the batch in flight has finished.
    pub async fn extract(
        &self,
        dataset: &Path,
        storage: Box<dyn PathContextStorage>,
    ) -> Result<DatasetStatistic> {
        let start_time = Instant::now();
        let parts = detect_layout(dataset)?;
        info!(
            "Mining {} repositories from {}",
            parts.len(),
            dataset.display()
        );

        let storage: SharedStorage = Arc::new(Mutex::new(storage));
        let mut stats = DatasetStatistic::new();

        for part in &parts {
            let handle = match self.opener.open(&part.root) {
                Ok(handle) => handle,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Failed to open {}: {e}", part.root.display());
                    continue;
                }
            };
            stats.record_repository();
            self.process_repository(handle.shared(), part.split, &storage, &mut stats)
                .await?;
        }

        storage
            .lock()
            .map_err(|_| Error::storage("Storage lock poisoned by a failed worker"))?
            .close()?;

        info!(
            "Extraction complete: {} files, {} units in {:.2}s",
            stats.files_processed(),
            stats.units_stored(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(stats)
    }

    async fn process_repository(
        &self,
        workspace: Arc<Workspace>,
        split: Option<DatasetSplit>,
        storage: &SharedStorage,
        stats: &mut DatasetStatistic,
    ) -> Result<()> {
        let files = workspace.files();
        info!(
            "Processing {} ({} files, split {})",
            workspace.root().display(),
            files.len(),
            DatasetSplit::file_stem(split)
        );

        let pb = create_progress_bar(files.len());
        pb.set_message(
            workspace
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        for batch in files.chunks(self.batch_size) {
            let workers = batch.iter().map(|file| {
                let processor = Arc::clone(&self.processor);
                let workspace = Arc::clone(&workspace);
                let storage = Arc::clone(storage);
                let file = file.clone();
                let tick = ProgressTick(pb.clone());
                tokio::task::spawn_blocking(move || {
                    let _tick = tick;
                    processor.process(&file, &workspace, split, &storage)
                })
            });
            let results = join_all(workers).await;

            let mut fatal = None;
            for (file, result) in batch.iter().zip(results) {
                let outcome = match result {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) if e.is_fatal() => {
                        error!("Failed to store units of {}: {e}", file.display());
                        if fatal.is_none() {
                            fatal = Some(e);
                        }
                        FileOutcome::Failed
                    }
                    Ok(Err(e @ Error::Parse { .. })) => {
                        error!("Error while parsing {}: {e}", file.display());
                        FileOutcome::Failed
                    }
                    Ok(Err(e)) => {
                        warn!("Failed to process {}: {e}", file.display());
                        FileOutcome::Failed
                    }
                    Err(e) => {
                        error!("Worker for {} panicked: {e}", file.display());
                        FileOutcome::Failed
                    }
                };
                stats.record(split, outcome);
            }

            if let Some(e) = fatal {
                pb.abandon_with_message("aborted");
                return Err(e);
            }
        }

        pb.finish_with_message("done");
        Ok(())
    }
}

/// Create a progress bar for one repository
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| error!("Failed to set progress bar style: {}", e))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}
