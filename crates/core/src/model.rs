//! Dataset model shared by the pipeline and the storage sinks

use crate::tree::SyntaxTree;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Supported input languages
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Language {
    Rust,
    Python,
    #[strum(to_string = "javascript")]
    #[serde(rename = "javascript")]
    JavaScript,
}

/// Named partition of a dataset
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetSplit {
    Train,
    #[strum(to_string = "val")]
    #[serde(rename = "val")]
    Validation,
    Test,
}

impl DatasetSplit {
    /// Name of the corpus directory holding this split
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "val",
            Self::Test => "test",
        }
    }

    /// All splits in their canonical order
    pub fn all() -> impl Iterator<Item = DatasetSplit> {
        Self::iter()
    }

    /// Output file stem for an optional split; unpartitioned corpora use `data`
    pub fn file_stem(split: Option<DatasetSplit>) -> &'static str {
        split.map(Self::folder_name).unwrap_or("data")
    }
}

/// Which subtrees of a file become extraction units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GranularityLevel {
    /// The whole file is one unit
    File,
    /// One unit per method or function
    #[default]
    Method,
}

/// An extraction unit: a label and the masked subtree it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledTree {
    label: String,
    tree: SyntaxTree,
}

impl LabeledTree {
    pub fn new(label: impl Into<String>, tree: SyntaxTree) -> Self {
        Self {
            label: label.into(),
            tree,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }
}

/// One structural path between two leaves of a unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathContext {
    /// Normalized token of the starting leaf
    pub start_token: String,
    /// Node kinds from the starting leaf up to the common ancestor and down to the end leaf
    pub path: Vec<String>,
    /// Index of the common ancestor inside `path`
    pub top: usize,
    /// Normalized token of the ending leaf
    pub end_token: String,
    /// Resolved type of the starting leaf, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_type: Option<String>,
    /// Resolved type of the ending leaf, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_type: Option<String>,
}

impl PathContext {
    /// Node kinds joined with `|`, the code2seq path encoding
    pub fn path_string(&self) -> String {
        self.path.join("|")
    }

    /// Number of edges from the start leaf up to the common ancestor
    pub fn up_length(&self) -> usize {
        self.top
    }

    /// Number of edges from the common ancestor down to the end leaf
    pub fn down_length(&self) -> usize {
        self.path.len().saturating_sub(self.top + 1)
    }
}

/// A labeled unit together with its retrieved path-contexts, ready for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPathContexts {
    pub label: String,
    pub contexts: Vec<PathContext>,
}

impl LabeledPathContexts {
    pub fn new(label: impl Into<String>, contexts: Vec<PathContext>) -> Self {
        Self {
            label: label.into(),
            contexts,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_split_names() {
        let names: Vec<_> = DatasetSplit::all().map(DatasetSplit::folder_name).collect();
        assert_eq!(names, vec!["train", "val", "test"]);
        assert_eq!(DatasetSplit::from_str("val").unwrap(), DatasetSplit::Validation);
        assert_eq!(DatasetSplit::Validation.to_string(), "val");
        assert_eq!(DatasetSplit::file_stem(None), "data");
    }

    #[test]
    fn test_language_names() {
        assert_eq!(Language::from_str("javascript").unwrap(), Language::JavaScript);
        assert_eq!(Language::Rust.to_string(), "rust");
        assert!(Language::from_str("cobol").is_err());
    }

    #[test]
    fn test_path_lengths() {
        let ctx = PathContext {
            start_token: "a".into(),
            path: vec!["identifier".into(), "binary".into(), "identifier".into()],
            top: 1,
            end_token: "b".into(),
            start_type: None,
            end_type: None,
        };
        assert_eq!(ctx.up_length(), 1);
        assert_eq!(ctx.down_length(), 1);
        assert_eq!(ctx.path_string(), "identifier|binary|identifier");
    }
}
