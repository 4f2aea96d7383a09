//! Rowan language implementation for the C#-style declaration language
//!
//! This module implements the `rowan::Language` trait, which connects our
//! `CsSyntaxKind` enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::CsSyntaxKind;

/// Language marker type
///
/// A zero-sized type that implements `rowan::Language` so the typed
/// `SyntaxNode`/`SyntaxToken` aliases carry our kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CsLanguage;

impl Language for CsLanguage {
    type Kind = CsSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => CsSyntaxKind::Whitespace,
            1 => CsSyntaxKind::CommentLine,
            2 => CsSyntaxKind::CommentBlock,
            3 => CsSyntaxKind::Newline,

            // Directives
            5 => CsSyntaxKind::RegionDirective,
            6 => CsSyntaxKind::EndRegionDirective,

            // Keywords (10-99)
            10 => CsSyntaxKind::UsingKw,
            11 => CsSyntaxKind::NamespaceKw,
            12 => CsSyntaxKind::ClassKw,
            13 => CsSyntaxKind::StructKw,
            14 => CsSyntaxKind::InterfaceKw,
            15 => CsSyntaxKind::TypeofKw,
            16 => CsSyntaxKind::TrueKw,
            17 => CsSyntaxKind::FalseKw,
            18 => CsSyntaxKind::NullKw,
            19 => CsSyntaxKind::VoidKw,
            20 => CsSyntaxKind::ModifierKw,
            21 => CsSyntaxKind::PredefinedTypeKw,

            // Punctuation (100-149)
            100 => CsSyntaxKind::LBrace,
            101 => CsSyntaxKind::RBrace,
            102 => CsSyntaxKind::LParen,
            103 => CsSyntaxKind::RParen,
            104 => CsSyntaxKind::LBracket,
            105 => CsSyntaxKind::RBracket,
            106 => CsSyntaxKind::Semicolon,
            107 => CsSyntaxKind::Comma,
            108 => CsSyntaxKind::Dot,
            109 => CsSyntaxKind::Colon,
            110 => CsSyntaxKind::Equals,
            111 => CsSyntaxKind::Lt,
            112 => CsSyntaxKind::Gt,
            113 => CsSyntaxKind::Operator,

            // Literals & identifiers (150-199)
            150 => CsSyntaxKind::Ident,
            151 => CsSyntaxKind::IntegerLiteral,
            152 => CsSyntaxKind::RealLiteral,
            153 => CsSyntaxKind::StringLiteral,
            154 => CsSyntaxKind::CharLiteral,

            // Structure nodes (200-399)
            200 => CsSyntaxKind::CompilationUnit,
            201 => CsSyntaxKind::UsingDirective,
            202 => CsSyntaxKind::NamespaceDecl,
            203 => CsSyntaxKind::QualifiedName,
            204 => CsSyntaxKind::TypeDecl,
            205 => CsSyntaxKind::FieldDecl,
            206 => CsSyntaxKind::MethodDecl,
            207 => CsSyntaxKind::ParameterList,
            208 => CsSyntaxKind::Block,
            209 => CsSyntaxKind::Statement,
            210 => CsSyntaxKind::AttributeList,
            211 => CsSyntaxKind::Attribute,
            212 => CsSyntaxKind::AttributeArgumentList,
            213 => CsSyntaxKind::AttributeArgument,
            214 => CsSyntaxKind::NameEquals,
            215 => CsSyntaxKind::NameColon,
            216 => CsSyntaxKind::LiteralExpr,
            217 => CsSyntaxKind::TypeOfExpr,
            218 => CsSyntaxKind::PredefinedType,
            219 => CsSyntaxKind::IdentifierName,
            220 => CsSyntaxKind::OtherExpr,
            221 => CsSyntaxKind::RegionStart,
            222 => CsSyntaxKind::RegionEnd,
            223 => CsSyntaxKind::TypeName,
            224 => CsSyntaxKind::Initializer,
            225 => CsSyntaxKind::BaseList,

            // Special tokens (400+)
            400 => CsSyntaxKind::Error,
            401 => CsSyntaxKind::Eof,

            _ => {
                tracing::warn!("Unknown syntax kind: {}", raw.0);
                CsSyntaxKind::Unknown
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}
