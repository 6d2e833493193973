use super::{StageOutcome, TreeTransformation};
use pathminer_core::error::Result;
use pathminer_core::SyntaxTree;
use pathminer_languages::LanguageCapability;

/// Collapses every literal subtree into a single placeholder leaf
///
/// The literal node keeps its kind, so paths still tell a string from a number.
#[derive(Debug, Clone, Copy, Default)]
pub struct HideLiterals;

impl TreeTransformation for HideLiterals {
    fn name(&self) -> &'static str {
        "hide_literals"
    }

    fn apply(
        &self,
        tree: &mut SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome> {
        for id in tree.pre_order() {
            // Nested literals vanish with their outer literal
            let Some(node) = tree.get(id) else {
                continue;
            };
            if let Some(placeholder) = capability.literal_placeholder(&node.kind) {
                tree.collapse_into_leaf(id, placeholder);
            }
        }
        Ok(StageOutcome::Applied)
    }
}
