//! Mutable document model over the CST
//!
//! A [`Dom`] is built from a parsed tree by [`DomBuilder`], edited through
//! its member lists, and turned back into syntax by [`SyntaxEmitter`].
//!
//! - [`literal`]: constant values of annotation arguments
//! - [`attribute`]: annotations and their naming styles
//! - [`comment_white`]: comments and blank-line runs as members
//! - [`block`]: `#region`/`#endregion` pairing
//! - [`tree`]: the arena, member lists and cloning
//!
//! ## Example
//!
//! ```rust,ignore
//! use rdom_core::cst::parse_source;
//! use rdom_core::dom::{DomBuilder, SyntaxEmitter};
//! use rdom_core::semantic::SymbolTable;
//!
//! let (cst, _, _) = parse_source("class C\n{\n    int x;\n}\n");
//! let symbols = SymbolTable::collect(&cst);
//! let (dom, skipped) = DomBuilder::new(&symbols).build(&cst)?;
//! assert!(skipped.is_empty());
//! let text = SyntaxEmitter::default().to_source(&dom, dom.root())?;
//! ```

pub mod attribute;
pub mod block;
pub mod comment_white;
pub mod emit;
pub mod factory;
pub mod literal;
pub mod round_trip;
pub mod tree;

pub use attribute::{Attribute, AttributeList, AttributeValue, NamingStyle, attribute_lists};
pub use block::{
    BlockContents, BlockEnd, BlockMatch, BlockStart, GroupEntry, GroupId, GroupIndex, Pairing,
    block_contents, block_end, block_start, match_block_end, match_block_start,
    semantically_valid,
};
pub use comment_white::{Comment, CommentWhite, VerticalWhitespace, build_comment_white};
pub use emit::SyntaxEmitter;
pub use factory::DomBuilder;
pub use literal::{
    LiteralKind, LiteralValue, TypeReference, build_literal_expr, extract_expression,
    extract_literal, literal_source, parse_literal_token,
};
pub use round_trip::{RoundTripReport, RoundTripValidator};
pub use tree::{
    Descendants, Dom, DomNode, Field, MemberList, Method, Namespace, NodeData, NodeId, Statement,
    TypeDecl, TypeKind, UsingDirective,
};
