//! Corpus layout detection and repository opening

use ignore::WalkBuilder;
use pathminer_core::error::{Error, Result, ResultExt};
use pathminer_core::{DatasetSplit, Workspace};
use pathminer_languages::LanguageCapability;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Files larger than this are never mined
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Opens repositories as workspaces
pub trait RepositoryOpener: Send + Sync {
    /// Open `root`; the workspace is released when the handle is dropped
    fn open(&self, root: &Path) -> Result<RepositoryHandle>;
}

/// An opened repository, released on drop
#[derive(Debug)]
pub struct RepositoryHandle {
    workspace: Arc<Workspace>,
}

impl RepositoryHandle {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Arc::new(workspace),
        }
    }

    /// Shared workspace for workers
    pub fn shared(&self) -> Arc<Workspace> {
        Arc::clone(&self.workspace)
    }
}

impl Deref for RepositoryHandle {
    type Target = Workspace;

    fn deref(&self) -> &Workspace {
        &self.workspace
    }
}

impl Drop for RepositoryHandle {
    fn drop(&mut self) {
        debug!("Released repository {}", self.workspace.root().display());
    }
}

/// Opens plain directories, enumerating the source files of one language
#[derive(Clone, Copy)]
pub struct FsRepositoryOpener {
    capability: &'static dyn LanguageCapability,
}

impl std::fmt::Debug for FsRepositoryOpener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsRepositoryOpener")
            .field("language", &self.capability.language())
            .finish()
    }
}

impl FsRepositoryOpener {
    pub fn new(capability: &'static dyn LanguageCapability) -> Self {
        Self { capability }
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.capability.extensions().contains(&e.to_lowercase().as_str()))
    }

    /// Candidate source files under `root`, sorted
    pub fn find_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkBuilder::new(root)
            .standard_filters(true)
            .hidden(false)
            .parents(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error reading file entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|path| self.has_supported_extension(path) && should_include_file(path))
            .collect();
        files.sort();
        files
    }
}

impl RepositoryOpener for FsRepositoryOpener {
    fn open(&self, root: &Path) -> Result<RepositoryHandle> {
        if !root.is_dir() {
            return Err(Error::invalid_input(format!(
                "Repository {} is not a directory",
                root.display()
            )));
        }
        let files = self.find_files(root);
        info!("Opened {} with {} files", root.display(), files.len());
        Ok(RepositoryHandle::new(Workspace::new(root, files)))
    }
}

/// Check if a file should be mined
fn should_include_file(file_path: &Path) -> bool {
    // Use symlink_metadata() to check the symlink itself, not its target
    let metadata = match file_path.symlink_metadata() {
        Ok(m) => m,
        Err(_) => return false,
    };

    if metadata.is_symlink() {
        debug!("Excluding symlink: {}", file_path.display());
        return false;
    }

    if !metadata.is_file() {
        return false;
    }

    if metadata.len() > MAX_FILE_SIZE {
        debug!(
            "Excluding large file: {} (size: {} bytes)",
            file_path.display(),
            metadata.len()
        );
        return false;
    }

    true
}

/// One repository of the corpus and the split it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPart {
    pub root: PathBuf,
    pub split: Option<DatasetSplit>,
}

/// Find the repositories of a corpus
///
/// A corpus holding a directory for every split is partitioned: each direct
/// subdirectory of a split directory is one repository. Any other corpus is a
/// single unpartitioned repository.
pub fn detect_layout(dataset: &Path) -> Result<Vec<CorpusPart>> {
    if !dataset.is_dir() {
        return Err(Error::invalid_input(format!(
            "Dataset {} is not a directory",
            dataset.display()
        )));
    }

    let present: Vec<DatasetSplit> = DatasetSplit::all()
        .filter(|split| dataset.join(split.folder_name()).is_dir())
        .collect();

    if present.len() < DatasetSplit::all().count() {
        if !present.is_empty() {
            warn!(
                "Dataset {} has only some split directories ({:?}), mining it as one corpus",
                dataset.display(),
                present
                    .iter()
                    .map(|s| s.folder_name())
                    .collect::<Vec<_>>()
            );
        }
        return Ok(vec![CorpusPart {
            root: dataset.to_path_buf(),
            split: None,
        }]);
    }

    let mut parts = Vec::new();
    for split in present {
        let split_dir = dataset.join(split.folder_name());
        let mut repositories: Vec<PathBuf> = std::fs::read_dir(&split_dir)
            .context(format!("Failed to list {}", split_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        repositories.sort();
        debug!(
            "Split {} has {} repositories",
            split,
            repositories.len()
        );
        parts.extend(repositories.into_iter().map(|root| CorpusPart {
            root,
            split: Some(split),
        }));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathminer_core::Language;
    use pathminer_languages::capability_for;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_partitioned_layout() {
        let dir = tempfile::tempdir().unwrap();
        for split in ["train", "val", "test"] {
            fs::create_dir_all(dir.path().join(split).join("repo_b")).unwrap();
            fs::create_dir_all(dir.path().join(split).join("repo_a")).unwrap();
        }
        fs::write(dir.path().join("train").join("stray.rs"), "fn f() {}").unwrap();

        let parts = detect_layout(dir.path()).unwrap();
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[0].root, dir.path().join("train").join("repo_a"));
        assert_eq!(parts[0].split, Some(DatasetSplit::Train));
        assert_eq!(parts[2].split, Some(DatasetSplit::Validation));
        assert_eq!(parts[5].split, Some(DatasetSplit::Test));
    }

    #[test]
    fn test_partial_layout_is_unpartitioned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("train")).unwrap();
        let parts = detect_layout(dir.path()).unwrap();
        assert_eq!(
            parts,
            vec![CorpusPart {
                root: dir.path().to_path_buf(),
                split: None
            }]
        );
    }

    #[test]
    fn test_missing_dataset_is_rejected() {
        let result = detect_layout(Path::new("/nonexistent/corpus"));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_opener_finds_language_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/nested/b.rs"), "fn b() {}").unwrap();
        fs::write(dir.path().join("src/a.rs"), "fn a() {}").unwrap();
        fs::write(dir.path().join("src/notes.md"), "# notes").unwrap();
        fs::write(dir.path().join("script.py"), "x = 1").unwrap();

        let opener = FsRepositoryOpener::new(capability_for(Language::Rust));
        let handle = opener.open(dir.path()).unwrap();
        assert_eq!(
            handle.files(),
            &[
                dir.path().join("src/a.rs"),
                dir.path().join("src/nested/b.rs")
            ]
        );
    }

    #[test]
    fn test_opener_respects_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();
        fs::create_dir_all(dir.path().join("generated")).unwrap();
        fs::write(dir.path().join("generated/out.py"), "x = 1").unwrap();
        fs::write(dir.path().join("main.py"), "x = 1").unwrap();

        let opener = FsRepositoryOpener::new(capability_for(Language::Python));
        let files = opener.find_files(dir.path());
        assert_eq!(files, vec![dir.path().join("main.py")]);
    }
}
