use crate::{LanguageCapability, TypeAnnotation};
use pathminer_core::{Language, SyntaxTree};

use super::bound_identifier;

/// Rust: `fn` items are the declarations; parameters and `let` bindings carry types
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCapability;

impl LanguageCapability for RustCapability {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_rust::LANGUAGE.into()
    }

    fn method_kinds(&self) -> &'static [&'static str] {
        &["function_item"]
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["line_comment", "block_comment"]
    }

    fn literal_placeholder(&self, kind: &str) -> Option<&'static str> {
        match kind {
            "string_literal" | "raw_string_literal" => Some("<STR>"),
            "char_literal" => Some("<CHAR>"),
            "integer_literal" | "float_literal" => Some("<NUM>"),
            _ => None,
        }
    }

    fn type_annotations(&self, tree: &SyntaxTree) -> Option<Vec<TypeAnnotation>> {
        let annotations = tree
            .pre_order()
            .into_iter()
            .filter(|id| {
                tree.get(*id)
                    .is_some_and(|n| n.kind == "parameter" || n.kind == "let_declaration")
            })
            .filter_map(|id| {
                let identifier = bound_identifier(tree, tree.child_by_field(id, "pattern")?)?;
                let type_node = tree.child_by_field(id, "type")?;
                Some(TypeAnnotation {
                    identifier,
                    type_node,
                })
            })
            .collect();
        Some(annotations)
    }
}
