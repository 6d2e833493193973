use super::Filter;
use pathminer_core::SyntaxTree;
use pathminer_languages::LanguageCapability;

fn within(value: usize, min: usize, max: Option<usize>) -> bool {
    value >= min && max.is_none_or(|max| value <= max)
}

/// Bounds on the number of nodes
#[derive(Debug, Clone, Copy)]
pub struct TreeSizeFilter {
    min_nodes: usize,
    max_nodes: Option<usize>,
}

impl TreeSizeFilter {
    pub fn new(min_nodes: usize, max_nodes: Option<usize>) -> Self {
        Self {
            min_nodes,
            max_nodes,
        }
    }
}

impl Filter for TreeSizeFilter {
    fn name(&self) -> &'static str {
        "tree_size"
    }

    fn cost_rank(&self) -> u8 {
        1
    }

    fn validate(&self, tree: &SyntaxTree, _capability: &dyn LanguageCapability) -> bool {
        within(tree.len(), self.min_nodes, self.max_nodes)
    }
}

/// Bounds on the number of source lines spanned by the root
#[derive(Debug, Clone, Copy)]
pub struct CodeLinesFilter {
    min_lines: usize,
    max_lines: Option<usize>,
}

impl CodeLinesFilter {
    pub fn new(min_lines: usize, max_lines: Option<usize>) -> Self {
        Self {
            min_lines,
            max_lines,
        }
    }
}

impl Filter for CodeLinesFilter {
    fn name(&self) -> &'static str {
        "code_lines"
    }

    fn cost_rank(&self) -> u8 {
        0
    }

    fn validate(&self, tree: &SyntaxTree, _capability: &dyn LanguageCapability) -> bool {
        let root = &tree[tree.root()];
        let lines = root.end_line.saturating_sub(root.start_line) + 1;
        within(lines, self.min_lines, self.max_lines)
    }
}

/// No leaf token longer than `max_length` characters
#[derive(Debug, Clone, Copy)]
pub struct MaxTokenLengthFilter {
    max_length: usize,
}

impl MaxTokenLengthFilter {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Filter for MaxTokenLengthFilter {
    fn name(&self) -> &'static str {
        "max_token_length"
    }

    fn cost_rank(&self) -> u8 {
        2
    }

    fn validate(&self, tree: &SyntaxTree, _capability: &dyn LanguageCapability) -> bool {
        tree.leaves().into_iter().all(|id| {
            tree.get(id)
                .and_then(|node| node.token.as_deref())
                .is_none_or(|token| token.chars().count() <= self.max_length)
        })
    }
}

/// The tree declares at least one method or function
#[derive(Debug, Clone, Copy, Default)]
pub struct HasDeclarationsFilter;

impl Filter for HasDeclarationsFilter {
    fn name(&self) -> &'static str {
        "has_declarations"
    }

    fn cost_rank(&self) -> u8 {
        3
    }

    fn validate(&self, tree: &SyntaxTree, capability: &dyn LanguageCapability) -> bool {
        !capability.method_nodes(tree).is_empty()
    }
}
