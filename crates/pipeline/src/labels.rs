//! Extraction units, their labels and label masking

use crate::tokens::split_to_subtokens;
use crate::transformations::NormalizeTokens;
use pathminer_core::{GranularityLevel, LabeledTree, NodeId, SyntaxTree};
use pathminer_languages::LanguageCapability;
use tracing::debug;

/// Sentinel replacing the name of a method-level unit
pub const METHOD_NAME_SENTINEL: &str = "METHOD_NAME";

/// Sentinel replacing the name of a file-level unit
pub const FILE_NAME_SENTINEL: &str = "FILE_NAME";

/// Token given to other occurrences of the masked name inside the unit
pub const SELF_REFERENCE_TOKEN: &str = "<SELF>";

/// Turns a validated file tree into labeled, masked extraction units
#[derive(Debug, Clone, Copy)]
pub struct LabelExtractor {
    granularity: GranularityLevel,
}

impl LabelExtractor {
    pub fn new(granularity: GranularityLevel) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> GranularityLevel {
        self.granularity
    }

    /// Units of `tree`; units without a usable name are skipped
    pub fn extract(
        &self,
        tree: &SyntaxTree,
        capability: &dyn LanguageCapability,
    ) -> Vec<LabeledTree> {
        match self.granularity {
            GranularityLevel::File => {
                let Some(name) = capability.file_name_node(tree) else {
                    debug!("File has no named declaration, skipping");
                    return Vec::new();
                };
                label_unit(tree, tree.root(), name, FILE_NAME_SENTINEL)
                    .into_iter()
                    .collect()
            }
            GranularityLevel::Method => capability
                .method_nodes(tree)
                .into_iter()
                .filter_map(|method| {
                    let Some(name) = capability.name_node(tree, method) else {
                        debug!(
                            "Anonymous {} at line {}, skipping",
                            tree[method].kind, tree[method].start_line
                        );
                        return None;
                    };
                    label_unit(tree, method, name, METHOD_NAME_SENTINEL)
                })
                .collect(),
        }
    }
}

/// Build one unit rooted at `root` and labeled by the leaf `name`
fn label_unit(
    tree: &SyntaxTree,
    root: NodeId,
    name: NodeId,
    sentinel: &str,
) -> Option<LabeledTree> {
    let raw_name = tree.get(name)?.token.clone()?;
    let label = split_to_subtokens(&raw_name).join("|");
    if label.is_empty() {
        debug!("Name {raw_name:?} has no subtokens, skipping");
        return None;
    }

    let route = route_to(tree, root, name)?;
    let mut unit = tree.subtree(root)?;
    let masked = follow(&unit, &route)?;

    NormalizeTokens::normalize(&mut unit);

    // Any other leaf normalizing to the label (recursion, `self._name`, `NAME`)
    // would leak it
    let others: Vec<NodeId> = unit
        .leaves()
        .into_iter()
        .filter(|id| *id != masked && unit[*id].token.as_deref() == Some(label.as_str()))
        .collect();
    for id in others {
        unit.set_token(id, SELF_REFERENCE_TOKEN);
    }
    // Masking must come last so normalization cannot rewrite the sentinel
    unit.set_token(masked, sentinel);

    Some(LabeledTree::new(label, unit))
}

/// Child positions leading from `ancestor` down to `node`
fn route_to(tree: &SyntaxTree, ancestor: NodeId, node: NodeId) -> Option<Vec<usize>> {
    let mut route = Vec::new();
    let mut current = node;
    while current != ancestor {
        route.push(tree.child_index(current)?);
        current = tree.parent(current)?;
    }
    route.reverse();
    Some(route)
}

fn follow(tree: &SyntaxTree, route: &[usize]) -> Option<NodeId> {
    route.iter().try_fold(tree.root(), |id, index| {
        tree.children(id).get(*index).copied()
    })
}
