//! Error types for model construction, tree editing and re-emission

use std::path::PathBuf;
use thiserror::Error;

use crate::dom::{GroupId, LiteralKind, NodeId};

/// Main error type for rdom operations
///
/// Every variant is raised where the inconsistency is detected and handed to
/// the immediate caller. Nothing in the crate retries: the inputs are already
/// parsed, in-memory trees, so a failure always points at a defect in the
/// input tree or in the sequence of edits that produced it.
#[derive(Debug, Error)]
pub enum DomError {
    /// An annotation argument is neither a literal nor a `typeof` expression
    #[error("Unsupported literal shape: {shape} in `{text}`")]
    UnsupportedLiteralShape { shape: String, text: String },

    /// A stored value has no literal syntax that can express it
    #[error("No literal constructor for {kind} value `{value}`")]
    NoLiteralConstructorForType { kind: LiteralKind, value: String },

    /// No partner boundary found in either search phase
    #[error("Unmatched block boundary {node} (group {group})")]
    UnmatchedBlockBoundary { node: NodeId, group: GroupId },

    /// A clone copied one side of a region without its partner
    #[error("Block boundary {node} was cloned without its partner (original group {original})")]
    PartialClonePairingUnresolved { node: NodeId, original: GroupId },

    /// A member operation targeted a node that cannot hold members
    #[error("Node {node} is not a member container")]
    NotAContainer { node: NodeId },

    /// A region operation targeted a node that is not a block boundary
    #[error("Node {node} is not a {expected}")]
    NotABlockBoundary { node: NodeId, expected: &'static str },

    /// A member list was replaced instead of edited member by member
    #[error("Member list of {node} can only change through member operations")]
    MemberListEdit { node: NodeId },

    /// A move would make a node its own ancestor
    #[error("Cannot move {node} under {target}: target is inside the moved subtree")]
    InvalidMove { node: NodeId, target: NodeId },

    /// A handle that does not belong to this tree
    #[error("Unknown node {node}")]
    UnknownNode { node: NodeId },

    /// Syntax errors reported while lexing or building the CST
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rewriting a file from a model that skipped part of it
    #[error("Refusing to overwrite '{path}': {problems} problems while modelling it")]
    LossyRewrite { path: PathBuf, problems: usize },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Literal,
    Region,
    Tree,
    Parse,
    Config,
    Io,
}

impl DomError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomError::UnsupportedLiteralShape { .. } => ErrorKind::Literal,
            DomError::NoLiteralConstructorForType { .. } => ErrorKind::Literal,
            DomError::UnmatchedBlockBoundary { .. } => ErrorKind::Region,
            DomError::PartialClonePairingUnresolved { .. } => ErrorKind::Region,
            DomError::NotABlockBoundary { .. } => ErrorKind::Region,
            DomError::NotAContainer { .. } => ErrorKind::Tree,
            DomError::MemberListEdit { .. } => ErrorKind::Tree,
            DomError::InvalidMove { .. } => ErrorKind::Tree,
            DomError::UnknownNode { .. } => ErrorKind::Tree,
            DomError::ParseError { .. } => ErrorKind::Parse,
            DomError::ConfigError { .. } => ErrorKind::Config,
            DomError::LossyRewrite { .. } => ErrorKind::Io,
            DomError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Whether a lenient caller may skip the offending construct and keep
    /// processing the rest of the tree
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Literal | ErrorKind::Parse)
    }

    /// Create an unsupported literal shape error
    pub fn unsupported_literal_shape(shape: impl Into<String>, text: impl Into<String>) -> Self {
        Self::UnsupportedLiteralShape {
            shape: shape.into(),
            text: text.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for DomError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = DomError::unsupported_literal_shape("OtherExpr", "Foo");
        assert_eq!(err.kind(), ErrorKind::Literal);
        assert!(err.is_recoverable());

        let err = DomError::UnmatchedBlockBoundary {
            node: NodeId::from_raw(3),
            group: GroupId::new(),
        };
        assert_eq!(err.kind(), ErrorKind::Region);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = DomError::NotAContainer {
            node: NodeId::from_raw(7),
        };
        assert_eq!(err.to_string(), "Node #7 is not a member container");

        let err = DomError::unsupported_literal_shape("OtherExpr", "AnotherClass.Foo4");
        assert_eq!(
            err.to_string(),
            "Unsupported literal shape: OtherExpr in `AnotherClass.Foo4`"
        );

        let err = DomError::LossyRewrite {
            path: PathBuf::from("Widget.cs"),
            problems: 2,
        };
        assert_eq!(
            err.to_string(),
            "Refusing to overwrite 'Widget.cs': 2 problems while modelling it"
        );
        assert!(!err.is_recoverable());
    }
}
