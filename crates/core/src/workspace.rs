//! Handle on an opened repository

use std::path::{Path, PathBuf};

/// An opened repository: its root and the candidate source files inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate files, in a stable order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Path of `file` relative to the workspace root, or `file` itself when outside it
    pub fn relative_path<'a>(&self, file: &'a Path) -> &'a Path {
        file.strip_prefix(&self.root).unwrap_or(file)
    }
}
