//! Path-context extraction pipeline
//!
//! Parsed files flow through ordered tree transformations, a filter chain,
//! label extraction with masking and bounded path retrieval before the
//! resulting records are handed to a storage sink.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod filters;
pub mod labels;
mod orchestrator;
pub mod paths;
pub mod repository;
mod statistic;
pub mod tokens;
pub mod transformations;

// Re-export error types from core
pub use pathminer_core::error::{Error, Result};

pub use filters::{Filter, FilterChain};
pub use labels::{LabelExtractor, FILE_NAME_SENTINEL, METHOD_NAME_SENTINEL};
pub use orchestrator::{Pipeline, SharedStorage};
pub use paths::PathMiner;
pub use repository::{
    detect_layout, CorpusPart, FsRepositoryOpener, RepositoryHandle, RepositoryOpener,
};
pub use statistic::{DatasetStatistic, SplitStatistic};
pub use transformations::{StageOutcome, TransformationPipeline, TreeTransformation};
