//! Library interface for the pathminer CLI
//!
//! Argument handling and the run itself live here so integration tests can
//! drive them without spawning the binary.

use anyhow::{Context, Result};
use clap::Parser;
use pathminer_core::{Config, GranularityLevel, Language};
use pathminer_pipeline::{DatasetStatistic, Pipeline};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pathminer")]
#[command(about = "Mine path-contexts from source code corpora")]
#[command(version)]
pub struct Cli {
    /// Corpus directory, optionally split into train/, val/ and test/
    #[arg(long, value_name = "DIR")]
    pub dataset: PathBuf,

    /// Directory the storage sink writes to
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Files processed concurrently per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Storage kind: code2seq, code2vec, jsonl or memory
    #[arg(long)]
    pub storage: Option<String>,

    /// Extraction unit granularity
    #[arg(long, value_parser = parse_granularity)]
    pub granularity: Option<GranularityLevel>,

    /// Input language of the corpus
    #[arg(long, value_parser = parse_language)]
    pub language: Option<Language>,

    /// Print the tree of every stored unit
    #[arg(long)]
    pub print_trees: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_granularity(value: &str) -> std::result::Result<GranularityLevel, String> {
    value
        .parse()
        .map_err(|_| format!("unknown granularity '{value}' (expected file or method)"))
}

fn parse_language(value: &str) -> std::result::Result<Language, String> {
    value
        .parse()
        .map_err(|_| format!("unknown language '{value}' (expected rust, python or javascript)"))
}

impl Cli {
    /// Load the layered configuration and apply command-line overrides on top
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config =
            Config::from_file(self.config.as_deref()).context("Failed to load configuration")?;

        if let Some(batch_size) = self.batch_size {
            config.pipeline.batch_size = batch_size;
        }
        if let Some(kind) = &self.storage {
            config.storage.kind = kind.clone();
        }
        if let Some(granularity) = self.granularity {
            config.pipeline.granularity = granularity;
        }
        if let Some(language) = self.language {
            config.pipeline.language = language;
        }
        if self.print_trees {
            config.pipeline.print_trees = true;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Run one extraction from `dataset` into `output`
pub async fn run(config: &Config, dataset: &Path, output: &Path) -> Result<DatasetStatistic> {
    info!(
        "Extracting {} corpus from {} into {} ({})",
        config.pipeline.language,
        dataset.display(),
        output.display(),
        config.storage.kind
    );

    let pipeline = Pipeline::new(config).context("Failed to create pipeline")?;
    let storage = pathminer_storage::create_storage(&config.storage, output)
        .context("Failed to create storage")?;

    pipeline
        .extract(dataset, storage)
        .await
        .context("Extraction failed")
}
