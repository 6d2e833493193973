//! Integration tests for the extraction pipeline
//!
//! These tests run whole corpora from temporary directories through the
//! pipeline into in-memory and file storage.

use pathminer_core::config::{FilterConfig, StorageConfig};
use pathminer_core::{Config, DatasetSplit, Error, GranularityLevel, LabeledPathContexts, Language};
use pathminer_languages::capability_for;
use pathminer_pipeline::{
    DatasetStatistic, FsRepositoryOpener, Pipeline, RepositoryHandle, RepositoryOpener, METHOD_NAME_SENTINEL,
};
use pathminer_storage::{create_storage, MemoryStorage, PathContextStorage, StoredRecord};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const COMPUTE_SUM: &str = "fn computeSum(a: i32, b: i32) -> i32 {\n    a + b\n}\n";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn rust_config(batch_size: usize) -> Config {
    let mut config = Config::default();
    config.pipeline.language = Language::Rust;
    config.pipeline.batch_size = batch_size;
    config
}

async fn run(config: &Config, dataset: &Path) -> (Vec<StoredRecord>, DatasetStatistic) {
    let storage = MemoryStorage::new();
    let pipeline = Pipeline::new(config).unwrap();
    let stats = pipeline
        .extract(dataset, Box::new(storage.clone()))
        .await
        .unwrap();
    assert!(storage.is_closed());
    (storage.records(), stats)
}

fn sorted(mut records: Vec<StoredRecord>) -> Vec<StoredRecord> {
    records.sort_by_key(|r| format!("{r:?}"));
    records
}

/// A multi-repository corpus with a few files each
fn create_corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "alpha/src/lib.rs", COMPUTE_SUM);
    write(
        root,
        "alpha/src/math.rs",
        "pub fn max_value(xs: &[i64]) -> i64 {\n    let mut best = xs[0];\n    for x in xs {\n        if *x > best { best = *x; }\n    }\n    best\n}\n\nfn isEven(n: u32) -> bool { n % 2 == 0 }\n",
    );
    write(
        root,
        "alpha/src/text.rs",
        "// greeting helpers\nfn greet(name: &str) -> String {\n    format!(\"Hello, {}!\", name)\n}\n",
    );
    write(
        root,
        "beta/main.rs",
        "struct Counter { count: usize }\n\nimpl Counter {\n    fn increment(&mut self) { self.count += 1; }\n    fn reset(&mut self) { self.count = 0; }\n}\n",
    );
    dir
}

#[tokio::test]
async fn test_split_corpus_yields_one_record_per_split() {
    let dir = TempDir::new().unwrap();
    for split in ["train", "val", "test"] {
        write(dir.path(), &format!("{split}/project/src/lib.rs"), COMPUTE_SUM);
    }

    let (records, stats) = run(&rust_config(4), dir.path()).await;

    let mut splits: Vec<_> = records.iter().map(|r| r.split).collect();
    splits.sort();
    assert_eq!(
        splits,
        vec![
            Some(DatasetSplit::Train),
            Some(DatasetSplit::Validation),
            Some(DatasetSplit::Test)
        ]
    );
    for record in &records {
        assert_eq!(record.unit.label, "compute|sum");
        assert!(!record.unit.contexts.is_empty());
    }
    assert_eq!(stats.repositories(), 3);
    assert_eq!(stats.split(Some(DatasetSplit::Validation)).units(), 1);
}

#[tokio::test]
async fn test_unpartitioned_corpus_has_no_split() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/lib.rs", COMPUTE_SUM);

    let (records, stats) = run(&rust_config(2), dir.path()).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].split, None);
    assert_eq!(stats.split(None).files(), 1);
}

#[tokio::test]
async fn test_parse_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/a_broken.rs", "fn broken( {\n");
    write(dir.path(), "src/b_good.rs", COMPUTE_SUM);

    let (records, stats) = run(&rust_config(2), dir.path()).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].unit.label, "compute|sum");
    assert_eq!(stats.files_processed(), 2);
    assert_eq!(stats.files_failed(), 1);
}

#[tokio::test]
async fn test_anonymous_units_are_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "anonymous.js", "const double = (x) => x * 2;\n");
    write(
        dir.path(),
        "named.js",
        "const triple = (x) => x * 3;\nfunction computeSum(a, b) { return a + b; }\n",
    );

    let mut config = Config::default();
    config.pipeline.language = Language::JavaScript;
    let (records, stats) = run(&config, dir.path()).await;

    let labels: Vec<_> = records.iter().map(|r| r.unit.label.as_str()).collect();
    assert_eq!(labels, vec!["compute|sum"]);
    assert_eq!(stats.files_skipped(), 1);
    assert_eq!(stats.files_failed(), 0);
}

#[tokio::test]
async fn test_batch_size_does_not_change_records() {
    let corpus = create_corpus();
    let (sequential, _) = run(&rust_config(1), corpus.path()).await;
    let (batched, stats) = run(&rust_config(3), corpus.path()).await;

    assert_eq!(stats.files_processed(), 4);
    assert_eq!(sequential.len(), 6);
    assert_eq!(sorted(sequential), sorted(batched));
}

#[tokio::test]
async fn test_masked_name_never_leaks() {
    let corpus = create_corpus();
    let (records, _) = run(&rust_config(2), corpus.path()).await;

    let raw_names = ["computeSum", "max_value", "isEven", "greet", "increment", "reset"];
    for record in &records {
        let mut sentinel_seen = false;
        for context in &record.unit.contexts {
            for token in [&context.start_token, &context.end_token] {
                assert!(!raw_names.contains(&token.as_str()), "{token} leaked");
                assert_ne!(token, &record.unit.label);
                sentinel_seen |= token == METHOD_NAME_SENTINEL;
            }
        }
        assert!(sentinel_seen, "{} has no masked name", record.unit.label);
    }
}

#[tokio::test]
async fn test_file_output_is_idempotent() {
    let corpus = create_corpus();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let storage_config = StorageConfig {
        kind: "code2seq".to_string(),
    };

    for (output, batch_size) in [(&first, 1), (&second, 4)] {
        let pipeline = Pipeline::new(&rust_config(batch_size)).unwrap();
        let storage = create_storage(&storage_config, output.path()).unwrap();
        pipeline.extract(corpus.path(), storage).await.unwrap();
    }

    let a = fs::read(first.path().join("data.c2s")).unwrap();
    let b = fs::read(second.path().join("data.c2s")).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_filters_reject_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "types.rs", "pub struct Point { x: f64, y: f64 }\n");
    write(dir.path(), "lib.rs", COMPUTE_SUM);

    let mut config = rust_config(2);
    config.pipeline.filters = vec![FilterConfig::HasDeclarations];
    let (records, stats) = run(&config, dir.path()).await;

    assert_eq!(records.len(), 1);
    assert_eq!(stats.files_rejected(), 1);
}

#[tokio::test]
async fn test_printing_trees_keeps_stored_records() {
    let corpus = create_corpus();
    let (quiet, _) = run(&rust_config(2), corpus.path()).await;

    let mut config = rust_config(2);
    config.pipeline.print_trees = true;
    let (printed, stats) = run(&config, corpus.path()).await;

    assert_eq!(stats.units_stored(), 6);
    assert_eq!(sorted(quiet), sorted(printed));
}

#[tokio::test]
async fn test_file_granularity() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "client.py",
        "class HttpClient:\n    def get(self, url):\n        return url\n",
    );

    let mut config = Config::default();
    config.pipeline.language = Language::Python;
    config.pipeline.granularity = GranularityLevel::File;
    let (records, _) = run(&config, dir.path()).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].unit.label, "http|client");
}

struct FailingStorage;

impl PathContextStorage for FailingStorage {
    fn store(
        &mut self,
        _unit: &LabeledPathContexts,
        _split: Option<DatasetSplit>,
    ) -> Result<(), Error> {
        Err(Error::storage("disk full"))
    }

    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[tokio::test]
async fn test_storage_failure_aborts_run() {
    let corpus = create_corpus();
    let pipeline = Pipeline::new(&rust_config(2)).unwrap();
    let result = pipeline
        .extract(corpus.path(), Box::new(FailingStorage))
        .await;
    assert!(matches!(result, Err(Error::Storage(_))));
}

struct CountingOpener {
    inner: FsRepositoryOpener,
    opened: Arc<AtomicUsize>,
}

impl RepositoryOpener for CountingOpener {
    fn open(&self, root: &Path) -> pathminer_core::Result<RepositoryHandle> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.inner.open(root)
    }
}

#[tokio::test]
async fn test_zero_batch_size_fails_before_opening() {
    let opened = Arc::new(AtomicUsize::new(0));
    let opener = CountingOpener {
        inner: FsRepositoryOpener::new(capability_for(Language::Rust)),
        opened: Arc::clone(&opened),
    };

    let result = Pipeline::with_collaborators(
        &rust_config(0),
        Arc::new(pathminer_languages::TreeSitterFrontEnd::new(Language::Rust)),
        Arc::new(opener),
    );
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_every_repository_is_opened_once() {
    let dir = TempDir::new().unwrap();
    for split in ["train", "val", "test"] {
        write(dir.path(), &format!("{split}/one/lib.rs"), COMPUTE_SUM);
        write(dir.path(), &format!("{split}/two/lib.rs"), COMPUTE_SUM);
    }
    let opened = Arc::new(AtomicUsize::new(0));
    let opener = CountingOpener {
        inner: FsRepositoryOpener::new(capability_for(Language::Rust)),
        opened: Arc::clone(&opened),
    };

    let pipeline = Pipeline::with_collaborators(
        &rust_config(2),
        Arc::new(pathminer_languages::TreeSitterFrontEnd::new(Language::Rust)),
        Arc::new(opener),
    )
    .unwrap();
    let stats = pipeline
        .extract(dir.path(), Box::new(MemoryStorage::new()))
        .await
        .unwrap();

    assert_eq!(opened.load(Ordering::SeqCst), 6);
    assert_eq!(stats.units_stored(), 6);
}
