use crate::{LanguageCapability, TypeAnnotation};
use pathminer_core::{Language, NodeId, SyntaxTree};

/// Python: `def` blocks and lambdas are the declarations; typed parameters carry types
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonCapability;

impl PythonCapability {
    /// `x: int` keeps the name as an unlabeled first child, `x: int = 0` under `name`
    fn parameter_name(tree: &SyntaxTree, param: NodeId) -> Option<NodeId> {
        let candidate = match tree.child_by_field(param, "name") {
            Some(name) => name,
            None => *tree.children(param).first()?,
        };
        let node = tree.get(candidate)?;
        (node.kind == "identifier" && node.is_leaf()).then_some(candidate)
    }
}

impl LanguageCapability for PythonCapability {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn method_kinds(&self) -> &'static [&'static str] {
        &["function_definition", "lambda"]
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn unwrap_declaration(&self, tree: &SyntaxTree, id: NodeId) -> NodeId {
        match tree.get(id) {
            Some(node) if node.kind == "decorated_definition" => {
                tree.child_by_field(id, "definition").unwrap_or(id)
            }
            _ => id,
        }
    }

    fn literal_placeholder(&self, kind: &str) -> Option<&'static str> {
        match kind {
            "string" | "concatenated_string" => Some("<STR>"),
            "integer" | "float" => Some("<NUM>"),
            _ => None,
        }
    }

    fn type_annotations(&self, tree: &SyntaxTree) -> Option<Vec<TypeAnnotation>> {
        let annotations = tree
            .pre_order()
            .into_iter()
            .filter(|id| {
                tree.get(*id).is_some_and(|n| {
                    n.kind == "typed_parameter" || n.kind == "typed_default_parameter"
                })
            })
            .filter_map(|id| {
                Some(TypeAnnotation {
                    identifier: Self::parameter_name(tree, id)?,
                    type_node: tree.child_by_field(id, "type")?,
                })
            })
            .collect();
        Some(annotations)
    }
}
