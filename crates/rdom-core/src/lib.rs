//! rdom Core
//!
//! A mutable document model layered over a lossless syntax tree for a
//! C#-style declaration language. This crate parses source into a CST,
//! builds an editable model from it (types, members, annotations with their
//! literal values, comments, blank lines and `#region` blocks), and emits
//! syntax back from the model.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod dom;
pub mod error;
pub mod result;
pub mod semantic;

// Configuration system
pub use config::{
    ConfigLoader, EmitConfiguration, IndentStyle, ModelConfiguration, NewlineStyle, RdomConfig,
};
pub use cst::{CsSyntaxKind, CsSyntaxNode, parse_source};
pub use dom::{
    Attribute, AttributeList, AttributeValue, BlockContents, BlockMatch, Comment, CommentWhite,
    Dom, DomBuilder, GroupId, GroupIndex, LiteralKind, LiteralValue, NamingStyle, NodeData,
    NodeId, Pairing, RoundTripReport, RoundTripValidator, SyntaxEmitter, TypeReference,
    VerticalWhitespace,
};
pub use error::{DomError, ErrorKind};
pub use result::{Result, ResultExt};
pub use semantic::{NoSemantics, SymbolTable, TypeResolver};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with_default("rdom_core=info");
}

/// Initialize tracing, using `default_filter` when `RUST_LOG` is not set
pub fn init_tracing_with_default(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
