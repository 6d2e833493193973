use super::{StageOutcome, TreeTransformation};
use pathminer_core::error::Result;
use pathminer_core::{NodeId, SyntaxNode, SyntaxTree};
use pathminer_languages::LanguageCapability;

/// Remove every node matching `matches`, then drop ancestors left without
/// children or token so that no new leaves appear
fn exclude_nodes(
    tree: &mut SyntaxTree,
    matches: impl Fn(&SyntaxNode) -> bool,
) -> StageOutcome {
    let doomed: Vec<NodeId> = tree
        .pre_order()
        .into_iter()
        .filter(|id| *id != tree.root() && tree.get(*id).is_some_and(&matches))
        .collect();

    for id in doomed {
        // Already gone with an excluded ancestor
        let Some(parent) = tree.parent(id) else {
            continue;
        };
        tree.remove(id);
        prune_empty(tree, parent);
    }
    StageOutcome::Applied
}

fn prune_empty(tree: &mut SyntaxTree, mut id: NodeId) {
    while id != tree.root() {
        let Some(node) = tree.get(id) else {
            return;
        };
        if !node.is_leaf() || node.token.is_some() {
            return;
        }
        let Some(parent) = node.parent() else {
            return;
        };
        tree.remove(id);
        id = parent;
    }
}

/// Drops comment subtrees
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeComments;

impl TreeTransformation for ExcludeComments {
    fn name(&self) -> &'static str {
        "exclude_comments"
    }

    fn apply(
        &self,
        tree: &mut SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome> {
        let kinds = capability.comment_kinds();
        Ok(exclude_nodes(tree, |node| kinds.contains(&node.kind.as_str())))
    }
}

/// Drops anonymous keyword leaves
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeKeywords;

impl TreeTransformation for ExcludeKeywords {
    fn name(&self) -> &'static str {
        "exclude_keywords"
    }

    fn apply(
        &self,
        tree: &mut SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome> {
        Ok(exclude_nodes(tree, |node| capability.is_keyword(node)))
    }
}

/// Drops anonymous punctuation and operator leaves
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludePunctuation;

impl TreeTransformation for ExcludePunctuation {
    fn name(&self) -> &'static str {
        "exclude_punctuation"
    }

    fn apply(
        &self,
        tree: &mut SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome> {
        Ok(exclude_nodes(tree, |node| capability.is_punctuation(node)))
    }
}
