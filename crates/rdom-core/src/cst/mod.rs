//! Concrete Syntax Tree (CST) for the C#-style declaration language
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST is the input the model is built from and the output its syntax
//! emission produces, so every byte of the source is kept:
//!
//! - **Green Tree**: immutable, position-independent storage of tokens and
//!   trivia. Cheap to clone and share.
//! - **Red Tree**: on-demand view with parent pointers used for traversal.
//!
//! ## Trivia Handling
//!
//! Comments and line breaks stay attached to the member they precede (see
//! [`parser`] for the exact rule), which is what lets the model turn them
//! into comment and blank-line members.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rdom_core::cst::{parse_source, CsSyntaxKind};
//!
//! let (cst, _lexer_errors, _parse_errors) = parse_source("// note\nclass C\n{\n}\n");
//! assert_eq!(cst.text().to_string(), "// note\nclass C\n{\n}\n");
//!
//! for token in cst.descendants_with_tokens().filter_map(|e| e.into_token()) {
//!     if token.kind() == CsSyntaxKind::CommentLine {
//!         println!("Found comment: {}", token.text());
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
pub mod parser;
mod syntax_kind;

pub mod ast;
pub mod trivia;

pub use builder::{CstBuilder, build_cst_from_tokens};
pub use language::CsLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{ParseError, parse_attribute_argument, parse_source};
pub use syntax_kind::CsSyntaxKind;
pub use trivia::TriviaToken;

/// Red tree node
pub type CsSyntaxNode = rowan::SyntaxNode<CsLanguage>;
/// Red tree token
pub type CsSyntaxToken = rowan::SyntaxToken<CsLanguage>;
/// Node or token
pub type CsSyntaxElement = rowan::SyntaxElement<CsLanguage>;

#[cfg(test)]
mod tests;
