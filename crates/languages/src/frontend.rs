//! Tree-sitter front-end producing generic syntax trees

use crate::{capability_for, LanguageCapability};
use pathminer_core::error::{Error, Result};
use pathminer_core::{Language, NodeId, SyntaxNode, SyntaxTree, Workspace};
use std::path::Path;
use tracing::trace;
use tree_sitter::{Node, Parser};

/// Parses one source file of an opened workspace into a [`SyntaxTree`]
pub trait FrontEnd: Send + Sync {
    /// Parse `file`; failures carry the offending path
    fn parse(&self, file: &Path, workspace: &Workspace) -> Result<SyntaxTree>;
}

/// Front-end backed by the tree-sitter grammar of one language
#[derive(Clone, Copy)]
pub struct TreeSitterFrontEnd {
    capability: &'static dyn LanguageCapability,
}

impl std::fmt::Debug for TreeSitterFrontEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSitterFrontEnd")
            .field("language", &self.capability.language())
            .finish()
    }
}

impl TreeSitterFrontEnd {
    pub fn new(language: Language) -> Self {
        Self {
            capability: capability_for(language),
        }
    }

    /// Parse in-memory source text; `file` is only used in error messages
    pub fn parse_source(&self, source: &str, file: &Path) -> Result<SyntaxTree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.capability.grammar())
            .map_err(|e| Error::parse_path(file, format!("Failed to set language: {e}")))?;

        let ts_tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::parse_path(file, "Failed to parse source code"))?;

        let root = ts_tree.root_node();
        if root.has_error() {
            let position = first_error(root)
                .map(|n| n.start_position())
                .unwrap_or_else(|| root.start_position());
            return Err(Error::parse_path(
                file,
                format!(
                    "syntax error at {}:{}",
                    position.row + 1,
                    position.column + 1
                ),
            ));
        }

        convert(root, source, file)
    }
}

impl FrontEnd for TreeSitterFrontEnd {
    fn parse(&self, file: &Path, workspace: &Workspace) -> Result<SyntaxTree> {
        let path = workspace.root().join(workspace.relative_path(file));
        let source = std::fs::read_to_string(&path)
            .map_err(|e| Error::parse_path(file, format!("Failed to read file: {e}")))?;
        trace!("Parsing {} ({} bytes)", file.display(), source.len());
        self.parse_source(&source, file)
    }
}

/// Locate the first error or missing node in pre-order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

fn convert_node(
    node: Node<'_>,
    field: Option<&str>,
    source: &str,
    file: &Path,
) -> Result<SyntaxNode> {
    let mut converted = SyntaxNode::new(node.kind(), node.is_named()).with_lines(
        node.start_position().row + 1,
        node.end_position().row + 1,
    );
    if let Some(field) = field {
        converted = converted.with_field(field);
    }
    if node.child_count() == 0 {
        let text = node
            .utf8_text(source.as_bytes())
            .map_err(|e| Error::parse_path(file, format!("Failed to convert node to text: {e}")))?;
        converted = converted.with_token(text);
    }
    Ok(converted)
}

/// Copy the concrete tree into the arena, keeping child order and field names
fn convert(root: Node<'_>, source: &str, file: &Path) -> Result<SyntaxTree> {
    let mut tree = SyntaxTree::new(convert_node(root, None, source, file)?);
    let mut pending: Vec<(Node<'_>, NodeId)> = vec![(root, tree.root())];

    while let Some((node, id)) = pending.pop() {
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            continue;
        }
        loop {
            let child = cursor.node();
            let converted = convert_node(child, cursor.field_name(), source, file)?;
            let child_id = tree
                .add_child(id, converted)
                .ok_or_else(|| Error::parse_path(file, "Converted parent vanished"))?;
            pending.push((child, child_id));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    Ok(tree)
}
