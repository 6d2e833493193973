//! Default values and functions for configuration

use super::TransformationKind;
use crate::model::Language;

// Default constants
pub(crate) const DEFAULT_STORAGE_KIND: &str = "code2seq";
pub(crate) const DEFAULT_BATCH_SIZE: usize = 8;
pub(crate) const DEFAULT_MAX_PATH_HEIGHT: usize = 8;
pub(crate) const DEFAULT_MAX_PATH_WIDTH: usize = 2;

pub(crate) fn default_language() -> Language {
    Language::Rust
}

pub(crate) fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

pub(crate) fn default_transformations() -> Vec<TransformationKind> {
    vec![
        TransformationKind::ExcludeComments,
        TransformationKind::ExcludePunctuation,
        TransformationKind::HideLiterals,
    ]
}

pub(crate) fn default_max_path_height() -> usize {
    DEFAULT_MAX_PATH_HEIGHT
}

pub(crate) fn default_max_path_width() -> usize {
    DEFAULT_MAX_PATH_WIDTH
}

pub(crate) fn default_storage_kind() -> String {
    DEFAULT_STORAGE_KIND.to_string()
}
