//! Syntax kinds for the C#-style declaration language
//!
//! Tokens and nodes share one enum. The discriminants are stable and grouped
//! by range so `CsLanguage::kind_from_raw` can map them back without a table.

/// All token and node kinds known to the CST
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum CsSyntaxKind {
    // Trivia (0-9)
    Whitespace = 0,
    CommentLine = 1,
    CommentBlock = 2,
    Newline = 3,

    // Directives (5-9), each one a whole source line without its line break
    RegionDirective = 5,
    EndRegionDirective = 6,

    // Keywords (10-99)
    UsingKw = 10,
    NamespaceKw = 11,
    ClassKw = 12,
    StructKw = 13,
    InterfaceKw = 14,
    TypeofKw = 15,
    TrueKw = 16,
    FalseKw = 17,
    NullKw = 18,
    VoidKw = 19,
    /// public, private, static, readonly, ...
    ModifierKw = 20,
    /// string, int, bool, ...
    PredefinedTypeKw = 21,

    // Punctuation (100-149)
    LBrace = 100,
    RBrace = 101,
    LParen = 102,
    RParen = 103,
    LBracket = 104,
    RBracket = 105,
    Semicolon = 106,
    Comma = 107,
    Dot = 108,
    Colon = 109,
    Equals = 110,
    Lt = 111,
    Gt = 112,
    /// Any other operator character, kept verbatim
    Operator = 113,

    // Literals & identifiers (150-199)
    Ident = 150,
    IntegerLiteral = 151,
    RealLiteral = 152,
    StringLiteral = 153,
    CharLiteral = 154,

    // Structure nodes (200-399)
    CompilationUnit = 200,
    UsingDirective = 201,
    NamespaceDecl = 202,
    QualifiedName = 203,
    TypeDecl = 204,
    FieldDecl = 205,
    MethodDecl = 206,
    ParameterList = 207,
    Block = 208,
    Statement = 209,
    AttributeList = 210,
    Attribute = 211,
    AttributeArgumentList = 212,
    AttributeArgument = 213,
    NameEquals = 214,
    NameColon = 215,
    LiteralExpr = 216,
    TypeOfExpr = 217,
    PredefinedType = 218,
    IdentifierName = 219,
    OtherExpr = 220,
    RegionStart = 221,
    RegionEnd = 222,
    TypeName = 223,
    Initializer = 224,
    BaseList = 225,

    // Special (400+)
    Error = 400,
    Eof = 401,
    Unknown = 402,
}

impl CsSyntaxKind {
    /// Whitespace, line breaks and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            CsSyntaxKind::Whitespace
                | CsSyntaxKind::CommentLine
                | CsSyntaxKind::CommentBlock
                | CsSyntaxKind::Newline
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, CsSyntaxKind::CommentLine | CsSyntaxKind::CommentBlock)
    }

    /// Tokens that form a literal expression on their own
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            CsSyntaxKind::IntegerLiteral
                | CsSyntaxKind::RealLiteral
                | CsSyntaxKind::StringLiteral
                | CsSyntaxKind::CharLiteral
                | CsSyntaxKind::TrueKw
                | CsSyntaxKind::FalseKw
                | CsSyntaxKind::NullKw
        )
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 100
    }

    /// Map an identifier-shaped word to its keyword kind
    pub fn from_keyword(word: &str) -> Option<CsSyntaxKind> {
        let kind = match word {
            "using" => CsSyntaxKind::UsingKw,
            "namespace" => CsSyntaxKind::NamespaceKw,
            "class" => CsSyntaxKind::ClassKw,
            "struct" => CsSyntaxKind::StructKw,
            "interface" => CsSyntaxKind::InterfaceKw,
            "typeof" => CsSyntaxKind::TypeofKw,
            "true" => CsSyntaxKind::TrueKw,
            "false" => CsSyntaxKind::FalseKw,
            "null" => CsSyntaxKind::NullKw,
            "void" => CsSyntaxKind::VoidKw,
            "public" | "private" | "protected" | "internal" | "static" | "readonly"
            | "const" | "abstract" | "sealed" | "virtual" | "override" | "partial"
            | "async" | "extern" | "new" | "unsafe" | "volatile" => CsSyntaxKind::ModifierKw,
            "string" | "int" | "bool" | "char" | "object" | "double" | "float" | "long"
            | "decimal" | "byte" | "sbyte" | "short" | "ushort" | "uint" | "ulong" => {
                CsSyntaxKind::PredefinedTypeKw
            }
            _ => return None,
        };
        Some(kind)
    }
}

impl From<CsSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: CsSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
