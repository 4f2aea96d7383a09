//! Thin wrapper over `rowan::GreenNodeBuilder` speaking `CsSyntaxKind`

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use super::{CsSyntaxKind, CsSyntaxNode, CstToken};

/// Incremental green tree builder used by the parser and by the model's
/// syntax emission for attribute values
#[derive(Default)]
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&mut self, kind: CsSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    /// Remember the current position so a node can be opened there later,
    /// once enough tokens have been seen to know its kind
    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: CsSyntaxKind) {
        self.inner.start_node_at(checkpoint, kind.into());
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: CsSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    /// Copy a lexed token into the tree
    pub fn add_token(&mut self, token: &CstToken) {
        self.inner.token(token.kind.into(), &token.text);
    }

    /// Finish building and return the green node
    pub fn finish_green(self) -> GreenNode {
        self.inner.finish()
    }

    /// Finish building and return the red root
    pub fn finish(self) -> CsSyntaxNode {
        CsSyntaxNode::new_root(self.finish_green())
    }
}

/// Build a flat CST (root node with every token as a direct child)
///
/// Useful for inspecting a token stream with the CST tooling when the
/// structure does not matter.
pub fn build_cst_from_tokens(tokens: &[CstToken]) -> CsSyntaxNode {
    let mut builder = CstBuilder::new();
    builder.start_node(CsSyntaxKind::CompilationUnit);
    for token in tokens {
        if token.kind != CsSyntaxKind::Eof {
            builder.add_token(token);
        }
    }
    builder.finish_node();
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::lex_with_trivia;

    #[test]
    fn test_flat_cst_is_lossless() {
        let source = "using System;\n// done\n";
        let (tokens, _) = lex_with_trivia(source);
        let cst = build_cst_from_tokens(&tokens);

        assert_eq!(cst.kind(), CsSyntaxKind::CompilationUnit);
        assert_eq!(cst.text().to_string(), source);
    }

    #[test]
    fn test_nested_nodes() {
        let mut builder = CstBuilder::new();
        builder.start_node(CsSyntaxKind::LiteralExpr);
        builder.token(CsSyntaxKind::IntegerLiteral, "42");
        builder.finish_node();

        let node = builder.finish();
        assert_eq!(node.kind(), CsSyntaxKind::LiteralExpr);
        assert_eq!(node.text().to_string(), "42");
    }
}
