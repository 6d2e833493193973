//! Core types for the pathminer path-context extraction system
//!
//! This crate provides the foundational abstractions used throughout the
//! pathminer workspace, including:
//!
//! - **Syntax trees**: the arena-backed generic tree every language front-end produces
//! - **Dataset model**: splits, granularity levels, labeled units and path-contexts
//! - **Workspaces**: opened repositories and their candidate files
//! - **Configuration**: pipeline configuration loading and validation
//! - **Error handling**: Unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod model;
pub mod tree;
pub mod workspace;

// Re-export main types for convenience
pub use config::{Config, FilterConfig, PathsConfig, PipelineConfig, StorageConfig};
pub use error::{Error, Result, ResultExt};
pub use model::{
    DatasetSplit, GranularityLevel, LabeledPathContexts, LabeledTree, Language, PathContext,
};
pub use tree::{NodeId, SyntaxNode, SyntaxTree};
pub use workspace::Workspace;

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::tree::{NodeId, SyntaxNode, SyntaxTree};
}
