//! Tree transformation stages
//!
//! Stages run in configured order over one file's tree and mutate it in place.
//! A stage that has nothing to work with reports [`StageOutcome::NotApplicable`]
//! and leaves the tree untouched; an `Err` is fatal for the current file only.

mod exclusion;
mod literals;
mod normalize;
mod types;

pub use exclusion::{ExcludeComments, ExcludeKeywords, ExcludePunctuation};
pub use literals::HideLiterals;
pub use normalize::NormalizeTokens;
pub use types::ResolveTypes;

use pathminer_core::config::TransformationKind;
use pathminer_core::error::Result;
use pathminer_core::SyntaxTree;
use pathminer_languages::LanguageCapability;
use tracing::{debug, trace};

/// Result of running one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Applied,
    NotApplicable,
}

/// One in-place transformation of a syntax tree
pub trait TreeTransformation: Send + Sync {
    /// Configuration name of the stage
    fn name(&self) -> &'static str;

    /// Transform `tree`, keeping it well formed
    fn apply(
        &self,
        tree: &mut SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome>;
}

/// Create the stage configured as `kind`
pub fn create_transformation(kind: TransformationKind) -> Box<dyn TreeTransformation> {
    match kind {
        TransformationKind::ExcludeComments => Box::new(ExcludeComments),
        TransformationKind::ExcludeKeywords => Box::new(ExcludeKeywords),
        TransformationKind::ExcludePunctuation => Box::new(ExcludePunctuation),
        TransformationKind::HideLiterals => Box::new(HideLiterals),
        TransformationKind::NormalizeTokens => Box::new(NormalizeTokens),
        TransformationKind::ResolveTypes => Box::new(ResolveTypes),
    }
}

/// Ordered list of stages applied to every parsed file
#[derive(Default)]
pub struct TransformationPipeline {
    stages: Vec<Box<dyn TreeTransformation>>,
}

impl std::fmt::Debug for TransformationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

impl TransformationPipeline {
    pub fn new(stages: Vec<Box<dyn TreeTransformation>>) -> Self {
        Self { stages }
    }

    pub fn from_kinds(kinds: &[TransformationKind]) -> Self {
        Self::new(kinds.iter().copied().map(create_transformation).collect())
    }

    /// Run every stage in order, each on the previous stage's output
    pub fn apply(&self, tree: &mut SyntaxTree, capability: &dyn LanguageCapability) -> Result<()> {
        for stage in &self.stages {
            match stage.apply(tree, capability)? {
                StageOutcome::Applied => trace!("Applied {}", stage.name()),
                StageOutcome::NotApplicable => {
                    debug!(
                        "{} is not applicable to {} trees",
                        stage.name(),
                        capability.language()
                    )
                }
            }
            debug_assert!(tree.is_well_formed(), "{} broke the tree", stage.name());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
