//! Typed AST layer over CST
//!
//! Thin wrappers that give names to the parts of a CST node. Each wrapper
//! implements `AstNode` so it can be cast from a raw node.
//!
//! # Example
//!
//! ```ignore
//! use rdom_core::cst::{parse_source, ast::{AstNode, TypeDecl}};
//!
//! let (cst, _, _) = parse_source("public class Foo : Bar\n{\n}\n");
//! let decl = TypeDecl::cast(cst.first_child().unwrap()).unwrap();
//!
//! assert_eq!(decl.name().unwrap(), "Foo");
//! assert_eq!(decl.base_list().unwrap(), "Bar");
//! ```

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: CsSyntaxKind) -> bool;
    fn cast(node: CsSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &CsSyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: CsSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: CsSyntaxKind) -> bool {
                kind == CsSyntaxKind::$kind
            }

            fn cast(node: CsSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &CsSyntaxNode {
                &self.syntax
            }
        }
    };
}

/// Helper function to find first child of a specific kind
fn child_of_kind(parent: &CsSyntaxNode, kind: CsSyntaxKind) -> Option<CsSyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Helper function to find first token of a specific kind
fn token_of_kind(parent: &CsSyntaxNode, kind: CsSyntaxKind) -> Option<CsSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Text of a node from its first to its last non-trivia token
pub fn significant_text(node: &CsSyntaxNode) -> String {
    let tokens: Vec<CsSyntaxToken> = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .collect();
    let first = tokens.iter().position(|t| !t.kind().is_trivia());
    let last = tokens.iter().rposition(|t| !t.kind().is_trivia());

    match (first, last) {
        (Some(first), Some(last)) => tokens[first..=last].iter().map(|t| t.text()).collect(),
        _ => String::new(),
    }
}

/// Modifier keywords written directly on a declaration
fn modifiers(node: &CsSyntaxNode) -> Vec<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == CsSyntaxKind::ModifierKw)
        .map(|t| t.text().to_string())
        .collect()
}

/// Attributes from every attribute list in front of a declaration
fn attributes(node: &CsSyntaxNode) -> Vec<Attribute> {
    node.children()
        .filter(|n| n.kind() == CsSyntaxKind::AttributeList)
        .flat_map(|list| list.children().filter_map(Attribute::cast))
        .collect()
}

fn qualified_name(node: &CsSyntaxNode) -> Option<String> {
    child_of_kind(node, CsSyntaxKind::QualifiedName).map(|n| significant_text(&n))
}

// ============================================================================
// Member lists
// ============================================================================

/// Any node that occupies a slot in a member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Using(UsingDirective),
    Namespace(NamespaceDecl),
    Type(TypeDecl),
    Field(FieldDecl),
    Method(MethodDecl),
    Block(Block),
    Statement(Statement),
    RegionStart(RegionStart),
    RegionEnd(RegionEnd),
    /// A span the parser could not make sense of
    Error(CsSyntaxNode),
}

impl Member {
    pub fn cast(node: CsSyntaxNode) -> Option<Self> {
        let member = match node.kind() {
            CsSyntaxKind::UsingDirective => Member::Using(UsingDirective { syntax: node }),
            CsSyntaxKind::NamespaceDecl => Member::Namespace(NamespaceDecl { syntax: node }),
            CsSyntaxKind::TypeDecl => Member::Type(TypeDecl { syntax: node }),
            CsSyntaxKind::FieldDecl => Member::Field(FieldDecl { syntax: node }),
            CsSyntaxKind::MethodDecl => Member::Method(MethodDecl { syntax: node }),
            CsSyntaxKind::Block => Member::Block(Block { syntax: node }),
            CsSyntaxKind::Statement => Member::Statement(Statement { syntax: node }),
            CsSyntaxKind::RegionStart => Member::RegionStart(RegionStart { syntax: node }),
            CsSyntaxKind::RegionEnd => Member::RegionEnd(RegionEnd { syntax: node }),
            CsSyntaxKind::Error => Member::Error(node),
            _ => return None,
        };
        Some(member)
    }

    pub fn syntax(&self) -> &CsSyntaxNode {
        match self {
            Member::Using(n) => n.syntax(),
            Member::Namespace(n) => n.syntax(),
            Member::Type(n) => n.syntax(),
            Member::Field(n) => n.syntax(),
            Member::Method(n) => n.syntax(),
            Member::Block(n) => n.syntax(),
            Member::Statement(n) => n.syntax(),
            Member::RegionStart(n) => n.syntax(),
            Member::RegionEnd(n) => n.syntax(),
            Member::Error(n) => n,
        }
    }
}

/// Members of a container node, in source order
pub fn members(container: &CsSyntaxNode) -> impl Iterator<Item = Member> + use<> {
    container.children().filter_map(Member::cast)
}

ast_node!(
    /// Root of a parsed file
    CompilationUnit,
    CompilationUnit
);

ast_node!(UsingDirective, UsingDirective);

impl UsingDirective {
    pub fn name(&self) -> Option<String> {
        qualified_name(&self.syntax)
    }
}

ast_node!(NamespaceDecl, NamespaceDecl);

impl NamespaceDecl {
    pub fn name(&self) -> Option<String> {
        qualified_name(&self.syntax)
    }
}

ast_node!(
    /// `class`, `struct` or `interface` declaration
    TypeDecl,
    TypeDecl
);

impl TypeDecl {
    /// The declaring keyword
    pub fn keyword(&self) -> Option<CsSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    CsSyntaxKind::ClassKw | CsSyntaxKind::StructKw | CsSyntaxKind::InterfaceKw
                )
            })
    }

    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, CsSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn modifiers(&self) -> Vec<String> {
        modifiers(&self.syntax)
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        attributes(&self.syntax)
    }

    /// Base types as written after the colon
    pub fn base_list(&self) -> Option<String> {
        let list = child_of_kind(&self.syntax, CsSyntaxKind::BaseList)?;
        let text = significant_text(&list);
        Some(text.trim_start_matches(':').trim().to_string())
    }
}

ast_node!(FieldDecl, FieldDecl);

impl FieldDecl {
    pub fn modifiers(&self) -> Vec<String> {
        modifiers(&self.syntax)
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        attributes(&self.syntax)
    }

    pub fn type_name(&self) -> Option<String> {
        child_of_kind(&self.syntax, CsSyntaxKind::TypeName).map(|n| significant_text(&n))
    }

    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, CsSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    /// Initializer expression without the `=`
    pub fn initializer(&self) -> Option<String> {
        let init = child_of_kind(&self.syntax, CsSyntaxKind::Initializer)?;
        let text = significant_text(&init);
        Some(text.trim_start_matches('=').trim().to_string())
    }
}

ast_node!(MethodDecl, MethodDecl);

impl MethodDecl {
    pub fn modifiers(&self) -> Vec<String> {
        modifiers(&self.syntax)
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        attributes(&self.syntax)
    }

    /// Return type, or `None` for a constructor
    pub fn return_type(&self) -> Option<String> {
        self.name_token()?;
        child_of_kind(&self.syntax, CsSyntaxKind::TypeName).map(|n| significant_text(&n))
    }

    pub fn name(&self) -> Option<String> {
        match self.name_token() {
            Some(token) => Some(token.text().to_string()),
            // Constructors only carry the type name
            None => child_of_kind(&self.syntax, CsSyntaxKind::TypeName)
                .map(|n| significant_text(&n)),
        }
    }

    fn name_token(&self) -> Option<CsSyntaxToken> {
        token_of_kind(&self.syntax, CsSyntaxKind::Ident)
    }

    /// Parameter list including its parentheses
    pub fn parameters(&self) -> String {
        child_of_kind(&self.syntax, CsSyntaxKind::ParameterList)
            .map(|n| significant_text(&n))
            .unwrap_or_else(|| "()".to_string())
    }

    pub fn body(&self) -> Option<Block> {
        child_of_kind(&self.syntax, CsSyntaxKind::Block).and_then(Block::cast)
    }
}

ast_node!(
    /// `{ ... }` holding statements
    Block,
    Block
);

ast_node!(
    /// Opaque statement
    Statement,
    Statement
);

impl Statement {
    pub fn text(&self) -> String {
        significant_text(&self.syntax)
    }
}

/// Text following a region directive keyword
fn directive_text(node: &CsSyntaxNode, kind: CsSyntaxKind, keyword: &str) -> String {
    token_of_kind(node, kind)
        .map(|t| {
            t.text()
                .trim_start_matches('#')
                .trim_start_matches(keyword)
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

ast_node!(RegionStart, RegionStart);

impl RegionStart {
    pub fn text(&self) -> String {
        directive_text(&self.syntax, CsSyntaxKind::RegionDirective, "region")
    }
}

ast_node!(RegionEnd, RegionEnd);

impl RegionEnd {
    pub fn text(&self) -> String {
        directive_text(&self.syntax, CsSyntaxKind::EndRegionDirective, "endregion")
    }
}

// ============================================================================
// Attributes
// ============================================================================

ast_node!(Attribute, Attribute);

impl Attribute {
    pub fn name(&self) -> Option<String> {
        qualified_name(&self.syntax)
    }

    pub fn arguments(&self) -> Vec<AttributeArgument> {
        child_of_kind(&self.syntax, CsSyntaxKind::AttributeArgumentList)
            .map(|list| list.children().filter_map(AttributeArgument::cast).collect())
            .unwrap_or_default()
    }
}

ast_node!(AttributeArgument, AttributeArgument);

/// Argument value expression, by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentExpr {
    Literal(LiteralExpr),
    TypeOf(TypeOfExpr),
    Other(CsSyntaxNode),
}

impl AttributeArgument {
    /// Name written as `Name = value`
    pub fn name_equals(&self) -> Option<String> {
        child_of_kind(&self.syntax, CsSyntaxKind::NameEquals)
            .and_then(|n| token_of_kind(&n, CsSyntaxKind::Ident))
            .map(|t| t.text().to_string())
    }

    /// Name written as `Name: value`
    pub fn name_colon(&self) -> Option<String> {
        child_of_kind(&self.syntax, CsSyntaxKind::NameColon)
            .and_then(|n| token_of_kind(&n, CsSyntaxKind::Ident))
            .map(|t| t.text().to_string())
    }

    pub fn expression(&self) -> Option<ArgumentExpr> {
        self.syntax.children().find_map(|n| match n.kind() {
            CsSyntaxKind::LiteralExpr => Some(ArgumentExpr::Literal(LiteralExpr { syntax: n })),
            CsSyntaxKind::TypeOfExpr => Some(ArgumentExpr::TypeOf(TypeOfExpr { syntax: n })),
            CsSyntaxKind::OtherExpr => Some(ArgumentExpr::Other(n)),
            _ => None,
        })
    }
}

ast_node!(LiteralExpr, LiteralExpr);

impl LiteralExpr {
    /// The literal token itself
    pub fn token(&self) -> Option<CsSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal())
    }

    /// Whether a leading `-` negates the literal
    pub fn is_negated(&self) -> bool {
        token_of_kind(&self.syntax, CsSyntaxKind::Operator).is_some_and(|t| t.text() == "-")
    }
}

ast_node!(TypeOfExpr, TypeOfExpr);

impl TypeOfExpr {
    /// The operand node (`PredefinedType`, `IdentifierName`, `QualifiedName`
    /// or a general `TypeName`)
    pub fn operand(&self) -> Option<CsSyntaxNode> {
        self.syntax.children().find(|n| {
            matches!(
                n.kind(),
                CsSyntaxKind::PredefinedType
                    | CsSyntaxKind::IdentifierName
                    | CsSyntaxKind::QualifiedName
                    | CsSyntaxKind::TypeName
            )
        })
    }

    pub fn type_name(&self) -> Option<String> {
        self.operand().map(|n| significant_text(&n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{parse_attribute_argument, parse_source};

    #[test]
    fn test_type_decl_accessors() {
        let (cst, _, _) = parse_source(
            "[Serializable]\npublic sealed class Foo : Bar, IBaz\n{\n}\n",
        );
        let decl = TypeDecl::cast(cst.first_child().expect("decl")).expect("type decl");
        assert_eq!(decl.keyword().map(|t| t.text().to_string()).as_deref(), Some("class"));
        assert_eq!(decl.name().as_deref(), Some("Foo"));
        assert_eq!(decl.modifiers(), vec!["public", "sealed"]);
        assert_eq!(decl.base_list().as_deref(), Some("Bar, IBaz"));
        assert_eq!(decl.attributes().len(), 1);
    }

    #[test]
    fn test_field_and_method_accessors() {
        let (cst, _, _) = parse_source(
            "class C\n{\n    static List<int> items = new List<int>();\n    public C(int seed)\n    {\n    }\n}\n",
        );
        let members: Vec<_> = members(&cst.first_child().expect("decl")).collect();

        let Member::Field(field) = &members[0] else {
            panic!("expected field, got {:?}", members[0]);
        };
        assert_eq!(field.type_name().as_deref(), Some("List<int>"));
        assert_eq!(field.name().as_deref(), Some("items"));
        assert_eq!(field.initializer().as_deref(), Some("new List<int>()"));

        let Member::Method(ctor) = &members[1] else {
            panic!("expected constructor, got {:?}", members[1]);
        };
        assert_eq!(ctor.name().as_deref(), Some("C"));
        assert_eq!(ctor.return_type(), None);
        assert_eq!(ctor.parameters(), "(int seed)");
        assert!(ctor.body().is_some());
    }

    #[test]
    fn test_statement_text_excludes_trivia() {
        let (cst, _, _) = parse_source("class C\n{\n    void M()\n    {\n        // note\n        Run(1);   \n    }\n}\n");
        let statement = cst
            .descendants()
            .find_map(Statement::cast)
            .expect("statement");
        assert_eq!(statement.text(), "Run(1);");
    }

    #[test]
    fn test_region_text() {
        let (cst, _, _) = parse_source("#region Public API\n#endregion\n");
        let start = cst.descendants().find_map(RegionStart::cast).expect("start");
        let end = cst.descendants().find_map(RegionEnd::cast).expect("end");
        assert_eq!(start.text(), "Public API");
        assert_eq!(end.text(), "");
    }

    #[test]
    fn test_argument_accessors() {
        let (node, _) = parse_attribute_argument("Bar: typeof(string)");
        let arg = AttributeArgument::cast(node).expect("argument");
        assert_eq!(arg.name_colon().as_deref(), Some("Bar"));
        assert_eq!(arg.name_equals(), None);
        let Some(ArgumentExpr::TypeOf(type_of)) = arg.expression() else {
            panic!("expected typeof");
        };
        assert_eq!(type_of.type_name().as_deref(), Some("string"));

        let (node, _) = parse_attribute_argument("-42");
        let arg = AttributeArgument::cast(node).expect("argument");
        let Some(ArgumentExpr::Literal(literal)) = arg.expression() else {
            panic!("expected literal");
        };
        assert!(literal.is_negated());
        assert_eq!(literal.token().map(|t| t.text().to_string()).as_deref(), Some("42"));
    }
}
