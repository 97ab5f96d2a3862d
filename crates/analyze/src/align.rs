//! Token-to-leaf alignment for parse trees.
//!
//! The parser reports the tree and the token stream separately; tree
//! leaves carry only their symbol. Alignment walks the tree in document
//! order and attaches the token each leaf consumed, so renderers can
//! show the word and its translation at the terminal.

use glosa_interchange::{ParseTreeNode, Token};
use serde::Serialize;

/// A parse-tree node annotated with the token its leaf consumed.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedNode {
    pub symbol: String,
    pub children: Vec<AnnotatedNode>,
    pub is_leaf: bool,
    /// The consumed word. None for interior nodes, and for leaves past
    /// the end of a short token stream.
    pub matched_word: Option<String>,
    /// The consumed word's translation; an empty upstream translation
    /// is carried as None.
    pub matched_translation: Option<String>,
}

/// Annotate `tree` with `tokens`, consuming tokens left to right.
///
/// Leaves take tokens in pre-order document position through one shared
/// cursor: the token at the cursor is assigned, then the cursor moves,
/// at every leaf visited. A token stream shorter than the leaf count
/// leaves the remaining leaves unannotated; surplus tokens are ignored.
/// The output tree is isomorphic to the input. Never fails.
pub fn align_tokens(tree: &ParseTreeNode, tokens: &[Token]) -> AnnotatedNode {
    let mut cursor = 0;
    annotate(tree, tokens, &mut cursor)
}

fn annotate(node: &ParseTreeNode, tokens: &[Token], cursor: &mut usize) -> AnnotatedNode {
    let is_leaf = node.word;
    let mut matched_word = None;
    let mut matched_translation = None;

    if is_leaf {
        if let Some(token) = tokens.get(*cursor) {
            matched_word = Some(token.word.clone());
            if !token.translation.is_empty() {
                matched_translation = Some(token.translation.clone());
            }
        }
        *cursor += 1;
    }

    let children = node
        .children
        .iter()
        .map(|child| annotate(child, tokens, cursor))
        .collect();

    AnnotatedNode {
        symbol: node.symbol.clone(),
        children,
        is_leaf,
        matched_word,
        matched_translation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(symbol: &str) -> ParseTreeNode {
        ParseTreeNode {
            symbol: symbol.to_string(),
            children: vec![],
            word: true,
        }
    }

    fn branch(symbol: &str, children: Vec<ParseTreeNode>) -> ParseTreeNode {
        ParseTreeNode {
            symbol: symbol.to_string(),
            children,
            word: false,
        }
    }

    fn tok(word: &str, tag: &str, translation: &str) -> Token {
        Token {
            word: word.to_string(),
            tag: tag.to_string(),
            translation: translation.to_string(),
        }
    }

    fn make_tree() -> ParseTreeNode {
        branch(
            "SENTENCE",
            vec![
                branch("NP", vec![leaf("el"), leaf("gato")]),
                branch("VP", vec![leaf("come")]),
            ],
        )
    }

    #[test]
    fn test_leaves_take_tokens_in_document_order() {
        let tokens = vec![
            tok("el", "DET", "the"),
            tok("gato", "N", "cat"),
            tok("come", "V", "eats"),
        ];
        let annotated = align_tokens(&make_tree(), &tokens);

        let np = &annotated.children[0];
        assert_eq!(np.children[0].matched_word.as_deref(), Some("el"));
        assert_eq!(np.children[0].matched_translation.as_deref(), Some("the"));
        assert_eq!(np.children[1].matched_word.as_deref(), Some("gato"));
        let vp = &annotated.children[1];
        assert_eq!(vp.children[0].matched_word.as_deref(), Some("come"));
        assert_eq!(vp.children[0].matched_translation.as_deref(), Some("eats"));
    }

    #[test]
    fn test_interior_nodes_are_unannotated() {
        let tokens = vec![
            tok("el", "DET", "the"),
            tok("gato", "N", "cat"),
            tok("come", "V", "eats"),
        ];
        let annotated = align_tokens(&make_tree(), &tokens);

        assert!(!annotated.is_leaf);
        assert!(annotated.matched_word.is_none());
        assert!(annotated.children[0].matched_word.is_none());
        assert!(annotated.children[0].children[0].is_leaf);
    }

    #[test]
    fn test_short_token_stream_degrades_without_panic() {
        let tokens = vec![tok("el", "DET", "the"), tok("gato", "N", "cat")];
        let annotated = align_tokens(&make_tree(), &tokens);

        let vp_leaf = &annotated.children[1].children[0];
        assert!(vp_leaf.is_leaf);
        assert!(vp_leaf.matched_word.is_none());
        assert!(vp_leaf.matched_translation.is_none());
    }

    #[test]
    fn test_empty_translation_carried_as_none() {
        let tokens = vec![
            tok("el", "DET", ""),
            tok("gato", "N", "cat"),
            tok("come", "V", "eats"),
        ];
        let annotated = align_tokens(&make_tree(), &tokens);
        let det_leaf = &annotated.children[0].children[0];
        assert_eq!(det_leaf.matched_word.as_deref(), Some("el"));
        assert!(det_leaf.matched_translation.is_none());
    }

    #[test]
    fn test_output_tree_is_isomorphic() {
        let annotated = align_tokens(&make_tree(), &[]);

        assert_eq!(annotated.symbol, "SENTENCE");
        assert_eq!(annotated.children.len(), 2);
        assert_eq!(annotated.children[0].symbol, "NP");
        assert_eq!(annotated.children[0].children.len(), 2);
        assert_eq!(annotated.children[1].symbol, "VP");
        assert_eq!(annotated.children[1].children.len(), 1);
    }

    #[test]
    fn test_surplus_tokens_are_ignored() {
        let tokens = vec![
            tok("el", "DET", "the"),
            tok("gato", "N", "cat"),
            tok("come", "V", "eats"),
            tok("pan", "N", "bread"),
        ];
        let annotated = align_tokens(&make_tree(), &tokens);
        let vp_leaf = &annotated.children[1].children[0];
        assert_eq!(vp_leaf.matched_word.as_deref(), Some("come"));
    }
}
