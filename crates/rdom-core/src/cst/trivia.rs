//! Trivia access for member lists
//!
//! The parser leaves comments and line breaks in two places the model cares
//! about: in front of a member (inside the member node) and in front of a
//! container's closing brace or the end of file (directly in the container).
//! This module pulls both runs out as plain `TriviaToken`s.

use rowan::NodeOrToken;

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};

/// Represents a single trivia token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaToken {
    /// The kind of trivia
    pub kind: CsSyntaxKind,
    /// The text content
    pub text: String,
    /// Position in the original source
    pub range: rowan::TextRange,
}

impl TriviaToken {
    pub fn new(kind: CsSyntaxKind, text: impl Into<String>, range: rowan::TextRange) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// Create from a syntax token
    pub fn from_token(token: &CsSyntaxToken) -> Self {
        Self {
            kind: token.kind(),
            text: token.text().to_string(),
            range: token.text_range(),
        }
    }

    /// A synthetic token with an empty range, for building trivia by hand
    pub fn synthetic(kind: CsSyntaxKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, rowan::TextRange::default())
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == CsSyntaxKind::Whitespace
    }

    pub fn is_newline(&self) -> bool {
        self.kind == CsSyntaxKind::Newline
    }

    /// Comment body without its delimiters, trimmed
    ///
    /// `// x` and `/* x */` both yield `x`.
    pub fn comment_content(&self) -> Option<String> {
        match self.kind {
            CsSyntaxKind::CommentLine => {
                let content = self.text.trim();
                let content = content.strip_prefix("//").unwrap_or(content);
                Some(content.trim().to_string())
            }
            CsSyntaxKind::CommentBlock => {
                let content = self.text.trim();
                let content = content.strip_prefix("/*").unwrap_or(content);
                let content = content.strip_suffix("*/").unwrap_or(content);
                Some(content.trim().to_string())
            }
            _ => None,
        }
    }
}

/// Trivia in front of a member's first real token
pub fn leading_trivia(member: &CsSyntaxNode) -> Vec<TriviaToken> {
    let mut trivia = Vec::new();
    for element in member.children_with_tokens() {
        match element {
            NodeOrToken::Token(token) if token.kind().is_trivia() => {
                trivia.push(TriviaToken::from_token(&token));
            }
            _ => break,
        }
    }
    trivia
}

/// Trivia left directly in a container before its closing brace
///
/// For braced containers the run right after `{` (through its line break)
/// is skipped, as is anything before the `{`. The compilation unit has no
/// braces, so every direct trivia token counts.
pub fn closing_trivia(container: &CsSyntaxNode) -> Vec<TriviaToken> {
    let has_brace = container
        .children_with_tokens()
        .any(|e| e.kind() == CsSyntaxKind::LBrace);

    let mut trivia = Vec::new();
    let mut inside = !has_brace;
    let mut after_open_brace = false;

    for element in container.children_with_tokens() {
        let NodeOrToken::Token(token) = element else {
            after_open_brace = false;
            continue;
        };
        match token.kind() {
            CsSyntaxKind::LBrace if !inside => {
                inside = true;
                after_open_brace = true;
            }
            CsSyntaxKind::RBrace if has_brace => break,
            kind if kind.is_trivia() && inside => {
                if after_open_brace {
                    if kind == CsSyntaxKind::Newline {
                        after_open_brace = false;
                    }
                    continue;
                }
                trivia.push(TriviaToken::from_token(&token));
            }
            _ => after_open_brace = false,
        }
    }

    trivia
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;

    fn texts(trivia: &[TriviaToken]) -> Vec<&str> {
        trivia.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_comment_content() {
        let range = rowan::TextRange::default();
        let line = TriviaToken::new(CsSyntaxKind::CommentLine, "//  hello ", range);
        assert_eq!(line.comment_content().as_deref(), Some("hello"));

        let block = TriviaToken::new(CsSyntaxKind::CommentBlock, "/* note */", range);
        assert_eq!(block.comment_content().as_deref(), Some("note"));

        let empty = TriviaToken::new(CsSyntaxKind::CommentLine, "//", range);
        assert_eq!(empty.comment_content().as_deref(), Some(""));

        let ws = TriviaToken::new(CsSyntaxKind::Whitespace, " ", range);
        assert_eq!(ws.comment_content(), None);
    }

    #[test]
    fn test_leading_trivia() {
        let (cst, _, _) = parse_source("using A;\n\n// about B\nusing B;\n");
        let second = cst.children().nth(1).expect("second using");
        assert_eq!(texts(&leading_trivia(&second)), vec!["\n", "// about B", "\n"]);
    }

    #[test]
    fn test_closing_trivia_skips_open_brace_line() {
        let (cst, _, _) = parse_source("class C\n{ // open\n    int x;\n\n    // tail\n}\n");
        let type_decl = cst.first_child().expect("type decl");
        assert_eq!(
            texts(&closing_trivia(&type_decl)),
            vec!["\n", "    ", "// tail", "\n"]
        );
    }

    #[test]
    fn test_closing_trivia_of_empty_body() {
        let (cst, _, _) = parse_source("class C\n{\n\n}\n");
        let type_decl = cst.first_child().expect("type decl");
        assert_eq!(texts(&closing_trivia(&type_decl)), vec!["\n"]);
    }

    #[test]
    fn test_compilation_unit_tail() {
        let (cst, _, _) = parse_source("using A;\n\n// end\n");
        assert_eq!(texts(&closing_trivia(&cst)), vec!["\n", "// end", "\n"]);
    }
}
