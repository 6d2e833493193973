//! Per-language capabilities

mod javascript;
mod python;
mod rust;

pub use javascript::JavaScriptCapability;
pub use python::PythonCapability;
pub use rust::RustCapability;

use pathminer_core::{NodeId, SyntaxTree};

/// The identifier leaf bound by a declaration pattern
///
/// Accepts a bare identifier or a `mut` pattern wrapping one; destructuring
/// patterns bind several names and are not annotated.
pub(crate) fn bound_identifier(tree: &SyntaxTree, pattern: NodeId) -> Option<NodeId> {
    let node = tree.get(pattern)?;
    match node.kind.as_str() {
        "identifier" if node.is_leaf() => Some(pattern),
        "mut_pattern" => tree
            .children(pattern)
            .iter()
            .copied()
            .find(|c| tree.get(*c).is_some_and(|n| n.kind == "identifier" && n.is_leaf())),
        _ => None,
    }
}
