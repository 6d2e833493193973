//! Filters deciding whether a transformed file tree is kept
//!
//! All filters must accept a tree; the chain stops at the first rejection.
//! Rejection is not an error, the file simply produces no output.

mod bounds;

pub use bounds::{CodeLinesFilter, HasDeclarationsFilter, MaxTokenLengthFilter, TreeSizeFilter};

use pathminer_core::config::FilterConfig;
use pathminer_core::SyntaxTree;
use pathminer_languages::LanguageCapability;
use tracing::debug;

/// A read-only predicate over a transformed tree
pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Relative evaluation cost; cheaper filters run first
    fn cost_rank(&self) -> u8;

    fn validate(&self, tree: &SyntaxTree, capability: &dyn LanguageCapability) -> bool;
}

/// Create the filter described by `config`
pub fn create_filter(config: &FilterConfig) -> Box<dyn Filter> {
    match config {
        FilterConfig::TreeSize {
            min_nodes,
            max_nodes,
        } => Box::new(TreeSizeFilter::new(*min_nodes, *max_nodes)),
        FilterConfig::CodeLines {
            min_lines,
            max_lines,
        } => Box::new(CodeLinesFilter::new(*min_lines, *max_lines)),
        FilterConfig::HasDeclarations => Box::new(HasDeclarationsFilter),
        FilterConfig::MaxTokenLength { max_length } => {
            Box::new(MaxTokenLengthFilter::new(*max_length))
        }
    }
}

/// Conjunction of filters evaluated cheapest first
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

impl FilterChain {
    pub fn new(mut filters: Vec<Box<dyn Filter>>) -> Self {
        filters.sort_by_key(|filter| filter.cost_rank());
        Self { filters }
    }

    pub fn from_config(configs: &[FilterConfig]) -> Self {
        Self::new(configs.iter().map(create_filter).collect())
    }

    /// Whether every filter accepts `tree`
    pub fn validate(&self, tree: &SyntaxTree, capability: &dyn LanguageCapability) -> bool {
        match self
            .filters
            .iter()
            .find(|filter| !filter.validate(tree, capability))
        {
            Some(filter) => {
                debug!("Tree rejected by {}", filter.name());
                false
            }
            None => true,
        }
    }

    /// Filter names in evaluation order
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathminer_core::Language;
    use pathminer_languages::{capability_for, TreeSitterFrontEnd};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn configs() -> Vec<FilterConfig> {
        vec![
            FilterConfig::HasDeclarations,
            FilterConfig::MaxTokenLength { max_length: 12 },
            FilterConfig::TreeSize {
                min_nodes: 1,
                max_nodes: Some(500),
            },
            FilterConfig::CodeLines {
                min_lines: 1,
                max_lines: Some(50),
            },
        ]
    }

    #[test]
    fn test_chain_runs_cheapest_first() {
        let chain = FilterChain::from_config(&configs());
        assert_eq!(
            chain.names(),
            vec![
                "code_lines",
                "tree_size",
                "max_token_length",
                "has_declarations"
            ]
        );
    }

    #[test]
    fn test_result_does_not_depend_on_order() {
        let capability = capability_for(Language::Python);
        let front = TreeSitterFrontEnd::new(Language::Python);
        let sources = [
            "def add(a, b):\n    return a + b\n",
            "x = 1\n",
            "def averyveryverylongname():\n    pass\n",
        ];

        for source in sources {
            let tree = front.parse_source(source, Path::new("m.py")).unwrap();
            let forward = FilterChain::from_config(&configs()).validate(&tree, capability);
            for rotation in 1..4 {
                let mut rotated = configs();
                rotated.rotate_left(rotation);
                // Bypass the cost sort to evaluate in the rotated order
                let chain = FilterChain {
                    filters: rotated.iter().map(create_filter).collect(),
                };
                assert_eq!(chain.validate(&tree, capability), forward, "{source}");
            }
        }
    }

    #[test]
    fn test_empty_chain_accepts() {
        let capability = capability_for(Language::Rust);
        let tree = TreeSitterFrontEnd::new(Language::Rust)
            .parse_source("", Path::new("lib.rs"))
            .unwrap();
        assert!(FilterChain::default().validate(&tree, capability));
    }
}
