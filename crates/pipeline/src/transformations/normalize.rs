use super::{StageOutcome, TreeTransformation};
use crate::tokens::normalize_token;
use pathminer_core::error::Result;
use pathminer_core::SyntaxTree;
use pathminer_languages::LanguageCapability;

/// Rewrites every leaf token into its canonical subtoken form
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeTokens;

impl NormalizeTokens {
    pub(crate) fn normalize(tree: &mut SyntaxTree) {
        for id in tree.leaves() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            let Some(token) = node.token.as_deref() else {
                continue;
            };
            let normalized = normalize_token(&node.kind, token);
            tree.set_token(id, normalized);
        }
    }
}

impl TreeTransformation for NormalizeTokens {
    fn name(&self) -> &'static str {
        "normalize_tokens"
    }

    fn apply(
        &self,
        tree: &mut SyntaxTree,
        _capability: &dyn LanguageCapability,
    ) -> Result<StageOutcome> {
        Self::normalize(tree);
        Ok(StageOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformations::test_support::{leaf_tokens, parse};
    use pathminer_core::Language;
    use pathminer_languages::capability_for;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokens_are_normalized() {
        let capability = capability_for(Language::JavaScript);
        let mut tree = parse(Language::JavaScript, "maxValue = 10;\n");
        NormalizeTokens.apply(&mut tree, capability).unwrap();
        assert_eq!(
            leaf_tokens(&tree),
            vec!["max|value", "<SYM>", "<NUMBER>", "<SYM>"]
        );
    }
}
