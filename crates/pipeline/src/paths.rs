//! Bounded path retrieval between leaf pairs

use pathminer_core::config::PathsConfig;
use pathminer_core::{NodeId, PathContext, SyntaxTree};

/// Retrieves path-contexts bounded in height and width
///
/// A pair of leaves yields a path when both legs from the leaves up to their
/// lowest common ancestor are at most `max_height` edges long, and the
/// branches holding the two leaves sit at most `max_width` siblings apart
/// below that ancestor. Pairs are visited in pre-order, so the output order
/// is a pure function of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMiner {
    max_height: usize,
    max_width: usize,
}

impl PathMiner {
    pub fn new(max_height: usize, max_width: usize) -> Self {
        Self {
            max_height,
            max_width,
        }
    }

    pub fn from_config(config: &PathsConfig) -> Self {
        Self::new(config.max_height, config.max_width)
    }

    pub fn retrieve_paths(&self, tree: &SyntaxTree) -> Vec<PathContext> {
        let chains: Vec<Vec<NodeId>> = tree
            .leaves()
            .into_iter()
            .map(|leaf| root_chain(tree, leaf))
            .collect();

        let mut contexts = Vec::new();
        for (i, start) in chains.iter().enumerate() {
            for end in &chains[i + 1..] {
                let common = common_prefix(start, end);
                let up = start.len() - common;
                // Later leaves only meet `start` higher up
                if up > self.max_height {
                    break;
                }
                let down = end.len() - common;
                if down > self.max_height || up == 0 || down == 0 {
                    continue;
                }

                let top = start[common - 1];
                let width = sibling_distance(tree, top, start[common], end[common]);
                if width.is_none_or(|w| w > self.max_width) {
                    continue;
                }

                contexts.push(build_context(tree, start, end, common));
            }
        }
        contexts
    }
}

/// Nodes from the root down to `leaf`
fn root_chain(tree: &SyntaxTree, leaf: NodeId) -> Vec<NodeId> {
    let mut chain = vec![leaf];
    let mut current = leaf;
    while let Some(parent) = tree.parent(current) {
        chain.push(parent);
        current = parent;
    }
    chain.reverse();
    chain
}

fn common_prefix(a: &[NodeId], b: &[NodeId]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn sibling_distance(tree: &SyntaxTree, parent: NodeId, a: NodeId, b: NodeId) -> Option<usize> {
    let children = tree.children(parent);
    let ia = children.iter().position(|c| *c == a)?;
    let ib = children.iter().position(|c| *c == b)?;
    Some(ia.abs_diff(ib))
}

fn build_context(
    tree: &SyntaxTree,
    start: &[NodeId],
    end: &[NodeId],
    common: usize,
) -> PathContext {
    let kind = |id: &NodeId| tree[*id].kind.clone();

    // start leaf .. common ancestor, then down to the end leaf
    let mut path: Vec<String> = start[common - 1..].iter().rev().map(kind).collect();
    path.extend(end[common..].iter().map(kind));

    let start_leaf = &tree[start[start.len() - 1]];
    let end_leaf = &tree[end[end.len() - 1]];
    PathContext {
        start_token: start_leaf.token.clone().unwrap_or_default(),
        path,
        top: start.len() - common,
        end_token: end_leaf.token.clone().unwrap_or_default(),
        start_type: start_leaf.resolved_type.clone(),
        end_type: end_leaf.resolved_type.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathminer_core::SyntaxNode;
    use pretty_assertions::assert_eq;

    /// (root (call f (args a b c)) d)
    fn sample() -> SyntaxTree {
        let mut tree = SyntaxTree::new(SyntaxNode::new("root", true));
        let root = tree.root();
        let call = tree.add_child(root, SyntaxNode::new("call", true)).unwrap();
        tree.add_child(call, SyntaxNode::new("identifier", true).with_token("f"));
        let args = tree.add_child(call, SyntaxNode::new("args", true)).unwrap();
        for t in ["a", "b", "c"] {
            tree.add_child(args, SyntaxNode::new("identifier", true).with_token(t));
        }
        tree.add_child(root, SyntaxNode::new("identifier", true).with_token("d"));
        tree
    }

    fn pairs(contexts: &[PathContext]) -> Vec<(String, String)> {
        contexts
            .iter()
            .map(|c| (c.start_token.clone(), c.end_token.clone()))
            .collect()
    }

    #[test]
    fn test_path_shape() {
        let tree = sample();
        let contexts = PathMiner::new(8, 8).retrieve_paths(&tree);
        let f_to_a = contexts
            .iter()
            .find(|c| c.start_token == "f" && c.end_token == "a")
            .unwrap();
        assert_eq!(f_to_a.path, vec!["identifier", "call", "args", "identifier"]);
        assert_eq!(f_to_a.top, 1);
        assert_eq!(f_to_a.up_length(), 1);
        assert_eq!(f_to_a.down_length(), 2);
        // Every pair of the five leaves
        assert_eq!(contexts.len(), 10);
    }

    #[test]
    fn test_width_bound() {
        let tree = sample();
        let contexts = PathMiner::new(8, 1).retrieve_paths(&tree);
        let found = pairs(&contexts);
        assert!(found.contains(&("a".to_string(), "b".to_string())));
        assert!(!found.contains(&("a".to_string(), "c".to_string())));
    }

    #[test]
    fn test_height_bound() {
        let tree = sample();
        let contexts = PathMiner::new(1, 8).retrieve_paths(&tree);
        assert_eq!(
            pairs(&contexts),
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
        for context in &contexts {
            assert!(context.up_length() <= 1 && context.down_length() <= 1);
        }
    }

    #[test]
    fn test_single_leaf_has_no_paths() {
        let tree = SyntaxTree::new(SyntaxNode::new("identifier", true).with_token("x"));
        assert!(PathMiner::new(8, 2).retrieve_paths(&tree).is_empty());
    }

    #[test]
    fn test_output_is_deterministic() {
        let tree = sample();
        let miner = PathMiner::new(3, 2);
        assert_eq!(miner.retrieve_paths(&tree), miner.retrieve_paths(&tree.clone()));
    }
}
