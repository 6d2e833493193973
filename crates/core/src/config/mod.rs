//! Configuration module for pathminer
//!
//! This module provides configuration structures and loading mechanisms for the
//! extraction pipeline. Configuration can be loaded from TOML files and/or environment
//! variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use crate::model::{GranularityLevel, Language};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use defaults::*;

/// Storage kinds understood by the storage factory
pub const STORAGE_KINDS: [&str; 4] = ["code2seq", "code2vec", "jsonl", "memory"];

/// Upper bound on files processed concurrently
pub const MAX_BATCH_SIZE: usize = 1024;

/// Main configuration structure for pathminer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Path retrieval bounds
    #[serde(default)]
    pub paths: PathsConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Tree transformation stages, applied in the configured order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransformationKind {
    /// Drop comment subtrees
    ExcludeComments,
    /// Drop anonymous keyword leaves (`fn`, `def`, `return`, ...)
    ExcludeKeywords,
    /// Drop anonymous punctuation leaves (`(`, `;`, `+`, ...)
    ExcludePunctuation,
    /// Replace literal subtrees with a placeholder leaf
    HideLiterals,
    /// Normalize every leaf token into lower-case subtokens
    NormalizeTokens,
    /// Attach declared type annotations to the identifiers they describe
    ResolveTypes,
}

/// A filter over a transformed file tree; all configured filters must pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Bounds on the number of nodes in the tree
    TreeSize {
        #[serde(default)]
        min_nodes: usize,
        #[serde(default)]
        max_nodes: Option<usize>,
    },
    /// Bounds on the number of source lines spanned by the tree
    CodeLines {
        #[serde(default)]
        min_lines: usize,
        #[serde(default)]
        max_lines: Option<usize>,
    },
    /// The tree contains at least one method or function declaration
    HasDeclarations,
    /// No leaf token is longer than `max_length` characters
    MaxTokenLength { max_length: usize },
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input language of the corpus
    #[serde(default = "default_language")]
    pub language: Language,

    /// Number of files processed concurrently in one batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Extraction unit granularity
    #[serde(default)]
    pub granularity: GranularityLevel,

    /// Ordered transformation stages
    #[serde(default = "default_transformations")]
    pub transformations: Vec<TransformationKind>,

    /// Filters every file tree must pass
    #[serde(default)]
    pub filters: Vec<FilterConfig>,

    /// Print every stored unit's tree
    #[serde(default)]
    pub print_trees: bool,
}

/// Bounds for path retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Maximum number of edges from a leaf up to the common ancestor
    #[serde(default = "default_max_path_height")]
    pub max_height: usize,

    /// Maximum sibling distance between the two branches at the common ancestor
    #[serde(default = "default_max_path_width")]
    pub max_width: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage kind: "code2seq" (default), "code2vec", "jsonl", "memory"
    #[serde(default = "default_storage_kind")]
    pub kind: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            batch_size: default_batch_size(),
            granularity: GranularityLevel::default(),
            transformations: default_transformations(),
            filters: Vec::new(),
            print_trees: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            max_height: default_max_path_height(),
            max_width: default_max_path_width(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: default_storage_kind(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate batch size
        if self.pipeline.batch_size == 0 {
            return Err(Error::config(
                "pipeline.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.pipeline.batch_size > MAX_BATCH_SIZE {
            return Err(Error::config(format!(
                "pipeline.batch_size too large (max {MAX_BATCH_SIZE}, got {})",
                self.pipeline.batch_size
            )));
        }

        // Validate path bounds
        if self.paths.max_height == 0 {
            return Err(Error::config(
                "paths.max_height must be greater than 0".to_string(),
            ));
        }
        if self.paths.max_width == 0 {
            return Err(Error::config(
                "paths.max_width must be greater than 0".to_string(),
            ));
        }

        // Validate storage kind
        if !STORAGE_KINDS.contains(&self.storage.kind.as_str()) {
            return Err(Error::config(format!(
                "Invalid storage kind '{}'. Must be one of: {:?}",
                self.storage.kind, STORAGE_KINDS
            )));
        }

        // Validate filter ranges
        for filter in &self.pipeline.filters {
            match filter {
                FilterConfig::TreeSize {
                    min_nodes,
                    max_nodes: Some(max),
                } if min_nodes > max => {
                    return Err(Error::config(format!(
                        "tree_size filter has min_nodes {min_nodes} above max_nodes {max}"
                    )));
                }
                FilterConfig::CodeLines {
                    min_lines,
                    max_lines: Some(max),
                } if min_lines > max => {
                    return Err(Error::config(format!(
                        "code_lines filter has min_lines {min_lines} above max_lines {max}"
                    )));
                }
                FilterConfig::MaxTokenLength { max_length: 0 } => {
                    return Err(Error::config(
                        "max_token_length filter needs max_length greater than 0".to_string(),
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
