use super::{StageOutcome, TreeTransformation};
use pathminer_core::error::{Error, Result};
use pathminer_core::SyntaxTree;
use pathminer_languages::LanguageCapability;

/// Attaches declared type annotations to the identifiers they annotate
///
/// Only the declaring identifier is annotated; later uses are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveTypes;

impl TreeTransformation for ResolveTypes {
    fn name(&self) -> &'static str {
        "resolve_types"
    }

    fn apply(
        &self,
        tree: &mut SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome> {
        let Some(annotations) = capability.type_annotations(tree) else {
            return Ok(StageOutcome::NotApplicable);
        };

        for annotation in annotations {
            let type_text = tree.text(annotation.type_node);
            let identifier = tree.get_mut(annotation.identifier).ok_or_else(|| {
                Error::transformation(self.name(), "annotated identifier is not in the tree")
            })?;
            identifier.resolved_type = Some(type_text);
        }
        Ok(StageOutcome::Applied)
    }
}
