//! Comment and blank-line list members
//!
//! Leading trivia of a member becomes an ordered run of [`CommentWhite`]
//! members. Comments are assumed to stand on their own line: a line break
//! directly after a comment belongs to that comment and does not produce a
//! blank line. Trivia that breaks this convention (a comment followed by
//! code on the same line, a block comment followed by spaces) is classified
//! by the same rule rather than special-cased.

use crate::cst::{CsSyntaxKind, TriviaToken};

/// A comment with its delimiters stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    /// `/* */` rather than `//`
    pub is_block: bool,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_block: false,
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_block: true,
        }
    }

    /// Source form of the comment, delimiters included
    pub fn source(&self) -> String {
        match (self.is_block, self.text.is_empty()) {
            (false, true) => "//".to_string(),
            (false, false) => format!("// {}", self.text),
            (true, true) => "/**/".to_string(),
            (true, false) => format!("/* {} */", self.text),
        }
    }
}

/// A run of blank lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalWhitespace {
    pub count: usize,
}

impl VerticalWhitespace {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

/// One comment-or-whitespace list member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentWhite {
    Comment(Comment),
    VerticalWhitespace(VerticalWhitespace),
}

impl CommentWhite {
    /// Trivia tokens that re-create this member on its own line(s)
    pub fn build_trivia(&self, indent: &str, newline: &str) -> Vec<TriviaToken> {
        match self {
            CommentWhite::Comment(comment) => {
                let kind = if comment.is_block {
                    CsSyntaxKind::CommentBlock
                } else {
                    CsSyntaxKind::CommentLine
                };
                let mut trivia = Vec::with_capacity(3);
                if !indent.is_empty() {
                    trivia.push(TriviaToken::synthetic(CsSyntaxKind::Whitespace, indent));
                }
                trivia.push(TriviaToken::synthetic(kind, comment.source()));
                trivia.push(TriviaToken::synthetic(CsSyntaxKind::Newline, newline));
                trivia
            }
            CommentWhite::VerticalWhitespace(white) => (0..white.count)
                .map(|_| TriviaToken::synthetic(CsSyntaxKind::Newline, newline))
                .collect(),
        }
    }
}

/// Turn a trivia run into comment and blank-line members, in source order
///
/// Whitespace is ignored. Each line break that does not directly follow a
/// comment yields one blank line.
pub fn build_comment_white(trivia: &[TriviaToken]) -> Vec<CommentWhite> {
    let mut members = Vec::new();
    let mut last_was_comment = false;

    for token in trivia {
        if last_was_comment && token.is_newline() {
            last_was_comment = false;
            continue;
        }
        last_was_comment = false;

        match token.kind {
            CsSyntaxKind::Newline => {
                members.push(CommentWhite::VerticalWhitespace(VerticalWhitespace::new(1)));
            }
            CsSyntaxKind::CommentLine | CsSyntaxKind::CommentBlock => {
                let text = token.comment_content().unwrap_or_default();
                members.push(CommentWhite::Comment(Comment {
                    text,
                    is_block: token.kind == CsSyntaxKind::CommentBlock,
                }));
                last_was_comment = true;
            }
            _ => {}
        }
    }

    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> TriviaToken {
        TriviaToken::synthetic(CsSyntaxKind::CommentLine, text)
    }

    fn newline() -> TriviaToken {
        TriviaToken::synthetic(CsSyntaxKind::Newline, "\n")
    }

    fn space(text: &str) -> TriviaToken {
        TriviaToken::synthetic(CsSyntaxKind::Whitespace, text)
    }

    #[test]
    fn test_newline_after_comment_is_absorbed() {
        let members = build_comment_white(&[comment("// x"), newline(), newline()]);
        assert_eq!(
            members,
            vec![
                CommentWhite::Comment(Comment::line("x")),
                CommentWhite::VerticalWhitespace(VerticalWhitespace::new(1)),
            ]
        );
    }

    #[test]
    fn test_each_standalone_newline_is_one_blank_line() {
        let members = build_comment_white(&[newline(), space("    "), newline()]);
        assert_eq!(members.len(), 2);
        assert!(
            members
                .iter()
                .all(|m| *m == CommentWhite::VerticalWhitespace(VerticalWhitespace::new(1)))
        );
    }

    #[test]
    fn test_whitespace_breaks_absorption() {
        let trivia = [
            TriviaToken::synthetic(CsSyntaxKind::CommentBlock, "/* b */"),
            space(" "),
            newline(),
        ];
        let members = build_comment_white(&trivia);
        assert_eq!(
            members,
            vec![
                CommentWhite::Comment(Comment::block("b")),
                CommentWhite::VerticalWhitespace(VerticalWhitespace::new(1)),
            ]
        );
    }

    #[test]
    fn test_delimiters_are_stripped() {
        let trivia = [
            space("    "),
            comment("//   padded  "),
            newline(),
            TriviaToken::synthetic(CsSyntaxKind::CommentBlock, "/*\n  multi\n  line\n*/"),
            newline(),
            comment("//"),
        ];
        let members = build_comment_white(&trivia);
        assert_eq!(
            members,
            vec![
                CommentWhite::Comment(Comment::line("padded")),
                CommentWhite::Comment(Comment::block("multi\n  line")),
                CommentWhite::Comment(Comment::line("")),
            ]
        );
    }

    #[test]
    fn test_build_trivia() {
        let texts = |member: CommentWhite| -> Vec<String> {
            member
                .build_trivia("    ", "\n")
                .into_iter()
                .map(|t| t.text)
                .collect()
        };

        assert_eq!(
            texts(CommentWhite::Comment(Comment::line("note"))),
            vec!["    ", "// note", "\n"]
        );
        assert_eq!(
            texts(CommentWhite::Comment(Comment::block(""))),
            vec!["    ", "/**/", "\n"]
        );
        assert_eq!(
            texts(CommentWhite::VerticalWhitespace(VerticalWhitespace::new(2))),
            vec!["\n", "\n"]
        );
    }

    #[test]
    fn test_rebuilt_trivia_gives_back_the_members() {
        let original = vec![
            CommentWhite::VerticalWhitespace(VerticalWhitespace::new(1)),
            CommentWhite::Comment(Comment::line("first")),
            CommentWhite::Comment(Comment::block("second")),
        ];
        let trivia: Vec<TriviaToken> = original
            .iter()
            .flat_map(|m| m.build_trivia("  ", "\r\n"))
            .collect();
        assert_eq!(build_comment_white(&trivia), original);
    }
}
