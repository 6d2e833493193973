use crate::{LanguageCapability, TypeAnnotation};
use pathminer_core::{Language, NodeId, SyntaxTree};

/// JavaScript: function declarations, expressions, methods and arrow functions
///
/// Arrow functions and unnamed function expressions never carry a `name`
/// field, so they are found as declarations but yield no unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptCapability;

impl LanguageCapability for JavaScriptCapability {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["js", "mjs", "cjs", "jsx"]
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
    }

    fn method_kinds(&self) -> &'static [&'static str] {
        &[
            "function_declaration",
            "generator_function_declaration",
            "function_expression",
            "function",
            "method_definition",
            "arrow_function",
        ]
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn unwrap_declaration(&self, tree: &SyntaxTree, id: NodeId) -> NodeId {
        match tree.get(id) {
            Some(node) if node.kind == "export_statement" => {
                tree.child_by_field(id, "declaration").unwrap_or(id)
            }
            _ => id,
        }
    }

    fn literal_placeholder(&self, kind: &str) -> Option<&'static str> {
        match kind {
            "string" | "template_string" => Some("<STR>"),
            "number" => Some("<NUM>"),
            "regex" => Some("<REGEX>"),
            _ => None,
        }
    }

    fn type_annotations(&self, _tree: &SyntaxTree) -> Option<Vec<TypeAnnotation>> {
        None
    }
}
