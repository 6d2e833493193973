#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use pathminer_core::{Language, NodeId, SyntaxNode, SyntaxTree};
use std::path::Path;

mod capabilities;
mod frontend;

pub use capabilities::{JavaScriptCapability, PythonCapability, RustCapability};
pub use frontend::{FrontEnd, TreeSitterFrontEnd};

/// A declared type annotation: the annotated identifier leaf and its type subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub identifier: NodeId,
    pub type_node: NodeId,
}

/// How to read declarations, names and tokens of one language out of a [`SyntaxTree`]
///
/// Implementations are stateless; one is selected per run with [`capability_for`].
pub trait LanguageCapability: Send + Sync {
    /// The language this capability describes
    fn language(&self) -> Language;

    /// File extensions (lower case, without the dot) of this language
    fn extensions(&self) -> &'static [&'static str];

    /// The tree-sitter grammar used by the front-end
    fn grammar(&self) -> tree_sitter::Language;

    /// Node kinds that declare a method or function
    fn method_kinds(&self) -> &'static [&'static str];

    /// Node kinds holding comments
    fn comment_kinds(&self) -> &'static [&'static str];

    /// Placeholder token replacing a literal of `kind`, `None` for non-literals
    fn literal_placeholder(&self, kind: &str) -> Option<&'static str>;

    /// Declared type annotations found in `tree`
    ///
    /// Returns `None` when the language carries no type annotations at all.
    fn type_annotations(&self, tree: &SyntaxTree) -> Option<Vec<TypeAnnotation>>;

    /// Whether `id` declares a method or function
    fn is_method(&self, tree: &SyntaxTree, id: NodeId) -> bool {
        tree.get(id)
            .is_some_and(|node| self.method_kinds().contains(&node.kind.as_str()))
    }

    /// Every method or function declaration in `tree`, in pre-order
    fn method_nodes(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        tree.pre_order()
            .into_iter()
            .filter(|id| self.is_method(tree, *id))
            .collect()
    }

    /// The identifier leaf naming the declaration `id`, if it has one
    fn name_node(&self, tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
        let name = tree.child_by_field(id, "name")?;
        let node = tree.get(name)?;
        (node.is_leaf() && node.token.is_some()).then_some(name)
    }

    /// The declaration inside a top-level wrapper such as a decorator or an export
    fn unwrap_declaration(&self, _tree: &SyntaxTree, id: NodeId) -> NodeId {
        id
    }

    /// Name node of the file's first named top-level declaration
    fn file_name_node(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.children(tree.root())
            .iter()
            .find_map(|child| self.name_node(tree, self.unwrap_declaration(tree, *child)))
    }

    /// Whether `node` is an anonymous keyword leaf such as `fn` or `return`
    fn is_keyword(&self, node: &SyntaxNode) -> bool {
        !node.named
            && node.is_leaf()
            && node
                .token
                .as_deref()
                .is_some_and(|t| !t.is_empty() && t.chars().all(|c| c.is_alphanumeric() || c == '_'))
    }

    /// Whether `node` is an anonymous punctuation or operator leaf
    fn is_punctuation(&self, node: &SyntaxNode) -> bool {
        !node.named
            && node.is_leaf()
            && node
                .token
                .as_deref()
                .is_some_and(|t| !t.chars().any(|c| c.is_alphanumeric() || c == '_'))
    }
}

static RUST: RustCapability = RustCapability;
static PYTHON: PythonCapability = PythonCapability;
static JAVASCRIPT: JavaScriptCapability = JavaScriptCapability;

/// The capability for `language`
pub fn capability_for(language: Language) -> &'static dyn LanguageCapability {
    match language {
        Language::Rust => &RUST,
        Language::Python => &PYTHON,
        Language::JavaScript => &JAVASCRIPT,
    }
}

/// Get the language of a file from its extension
pub fn detect_language(file_path: &Path) -> Option<Language> {
    let extension = file_path.extension()?.to_str()?;
    let ext_lower = extension.to_lowercase();

    [Language::Rust, Language::Python, Language::JavaScript]
        .into_iter()
        .find(|language| {
            capability_for(*language)
                .extensions()
                .contains(&ext_lower.as_str())
        })
}
