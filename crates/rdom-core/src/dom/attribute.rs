//! Annotation (attribute) values
//!
//! An [`AttributeValue`] is one argument of an attribute: its effective name,
//! the way that name was written, and the extracted [`LiteralValue`].
//! Positional arguments have no name of their own and borrow the name of the
//! attribute they belong to.

use rowan::GreenNode;

use super::literal::{LiteralValue, extract_literal, write_literal_expr};
use crate::cst::ast::{self, AstNode};
use crate::cst::{CsSyntaxKind, CsSyntaxNode, CstBuilder};
use crate::error::DomError;
use crate::result::Result;
use crate::semantic::TypeResolver;

/// How an argument names the value it sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingStyle {
    /// `[Foo(1)]`
    #[default]
    Positional,
    /// `[Foo(Bar = 1)]`
    NameEquals,
    /// `[Foo(Bar: 1)]`
    NameColon,
}

/// One attribute argument
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValue {
    pub name: String,
    pub style: NamingStyle,
    pub value: LiteralValue,
}

impl AttributeValue {
    pub fn new(name: impl Into<String>, style: NamingStyle, value: LiteralValue) -> Self {
        Self {
            name: name.into(),
            style,
            value,
        }
    }

    /// Build from an argument node
    ///
    /// `owner_name` is the name of the attribute the argument belongs to; a
    /// positional argument takes it as its own name.
    pub fn from_syntax(
        arg: &ast::AttributeArgument,
        owner_name: &str,
        resolver: &dyn TypeResolver,
    ) -> Result<Self> {
        let (name, style) = if let Some(name) = arg.name_colon() {
            (name, NamingStyle::NameColon)
        } else if let Some(name) = arg.name_equals() {
            (name, NamingStyle::NameEquals)
        } else {
            (owner_name.to_string(), NamingStyle::Positional)
        };

        let value = extract_literal(arg, resolver)?;
        Ok(Self { name, style, value })
    }

    /// Same name and same value; the naming style is presentation only
    pub fn same_intent(&self, other: &AttributeValue) -> bool {
        self.name == other.name
            && self.value.kind() == other.value.kind()
            && self.value.same_intent(&other.value)
    }

    /// Re-emit as an `AttributeArgument` node in the stored naming style
    pub fn build_syntax(&self) -> Result<GreenNode> {
        let mut builder = CstBuilder::new();
        self.write_syntax(&mut builder)?;
        Ok(builder.finish_green())
    }

    pub(crate) fn write_syntax(&self, builder: &mut CstBuilder) -> Result<()> {
        builder.start_node(CsSyntaxKind::AttributeArgument);
        match self.style {
            NamingStyle::Positional => {}
            NamingStyle::NameEquals => {
                builder.start_node(CsSyntaxKind::NameEquals);
                builder.token(CsSyntaxKind::Ident, &self.name);
                builder.token(CsSyntaxKind::Whitespace, " ");
                builder.token(CsSyntaxKind::Equals, "=");
                builder.finish_node();
                builder.token(CsSyntaxKind::Whitespace, " ");
            }
            NamingStyle::NameColon => {
                builder.start_node(CsSyntaxKind::NameColon);
                builder.token(CsSyntaxKind::Ident, &self.name);
                builder.token(CsSyntaxKind::Colon, ":");
                builder.finish_node();
                builder.token(CsSyntaxKind::Whitespace, " ");
            }
        }
        write_literal_expr(builder, &self.value)?;
        builder.finish_node();
        Ok(())
    }
}

/// One attribute: `Name` or `Name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<AttributeValue>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: AttributeValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn from_syntax(attr: &ast::Attribute, resolver: &dyn TypeResolver) -> Result<Self> {
        let name = attr.name().ok_or_else(|| {
            DomError::unsupported_literal_shape("Attribute", ast::significant_text(attr.syntax()))
        })?;
        let values = attr
            .arguments()
            .iter()
            .map(|arg| AttributeValue::from_syntax(arg, &name, resolver))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, values })
    }

    pub fn same_intent(&self, other: &Attribute) -> bool {
        self.name == other.name
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.same_intent(b))
    }

    /// Look up an argument by its effective name
    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.values.iter().find(|v| v.name == name)
    }

    pub(crate) fn write_syntax(&self, builder: &mut CstBuilder) -> Result<()> {
        builder.start_node(CsSyntaxKind::Attribute);
        write_qualified_name(builder, &self.name);
        if !self.values.is_empty() {
            builder.start_node(CsSyntaxKind::AttributeArgumentList);
            builder.token(CsSyntaxKind::LParen, "(");
            for (idx, value) in self.values.iter().enumerate() {
                if idx > 0 {
                    builder.token(CsSyntaxKind::Comma, ",");
                    builder.token(CsSyntaxKind::Whitespace, " ");
                }
                value.write_syntax(builder)?;
            }
            builder.token(CsSyntaxKind::RParen, ")");
            builder.finish_node();
        }
        builder.finish_node();
        Ok(())
    }
}

/// Attributes written inside one pair of brackets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeList {
    pub attributes: Vec<Attribute>,
}

impl AttributeList {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn from_syntax(list: &CsSyntaxNode, resolver: &dyn TypeResolver) -> Result<Self> {
        let attributes = list
            .children()
            .filter_map(ast::Attribute::cast)
            .map(|attr| Attribute::from_syntax(&attr, resolver))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { attributes })
    }

    pub fn same_intent(&self, other: &AttributeList) -> bool {
        self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .zip(&other.attributes)
                .all(|(a, b)| a.same_intent(b))
    }

    /// Re-emit as `[A, B(x)]`
    pub fn build_syntax(&self) -> Result<GreenNode> {
        let mut builder = CstBuilder::new();
        self.write_syntax(&mut builder)?;
        Ok(builder.finish_green())
    }

    pub(crate) fn write_syntax(&self, builder: &mut CstBuilder) -> Result<()> {
        builder.start_node(CsSyntaxKind::AttributeList);
        builder.token(CsSyntaxKind::LBracket, "[");
        for (idx, attr) in self.attributes.iter().enumerate() {
            if idx > 0 {
                builder.token(CsSyntaxKind::Comma, ",");
                builder.token(CsSyntaxKind::Whitespace, " ");
            }
            attr.write_syntax(builder)?;
        }
        builder.token(CsSyntaxKind::RBracket, "]");
        builder.finish_node();
        Ok(())
    }
}

/// `A.B.C` as a `QualifiedName` node
pub(crate) fn write_qualified_name(builder: &mut CstBuilder, name: &str) {
    builder.start_node(CsSyntaxKind::QualifiedName);
    for (idx, part) in name.split('.').enumerate() {
        if idx > 0 {
            builder.token(CsSyntaxKind::Dot, ".");
        }
        builder.token(CsSyntaxKind::Ident, part);
    }
    builder.finish_node();
}

/// All attribute lists of a declaration, in source order
///
/// Fails on the first argument the literal extractor cannot model.
pub fn attribute_lists(
    decl: &CsSyntaxNode,
    resolver: &dyn TypeResolver,
) -> Result<Vec<AttributeList>> {
    decl.children()
        .filter(|n| n.kind() == CsSyntaxKind::AttributeList)
        .map(|list| AttributeList::from_syntax(&list, resolver))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{parse_attribute_argument, parse_source};
    use crate::dom::literal::TypeReference;
    use crate::semantic::SymbolTable;

    fn argument(source: &str) -> ast::AttributeArgument {
        let (node, errors) = parse_attribute_argument(source);
        assert!(errors.is_empty(), "{errors:?}");
        ast::AttributeArgument::cast(node).expect("argument")
    }

    fn emitted(value: &AttributeValue) -> String {
        CsSyntaxNode::new_root(value.build_syntax().unwrap())
            .text()
            .to_string()
    }

    #[test]
    fn test_naming_styles() {
        let table = SymbolTable::with_predefined();

        let positional = AttributeValue::from_syntax(&argument("42"), "Foo", &table).unwrap();
        assert_eq!(positional.name, "Foo");
        assert_eq!(positional.style, NamingStyle::Positional);

        let equals = AttributeValue::from_syntax(&argument("Size = 42"), "Foo", &table).unwrap();
        assert_eq!(equals.name, "Size");
        assert_eq!(equals.style, NamingStyle::NameEquals);

        let colon = AttributeValue::from_syntax(&argument("Size: 42"), "Foo", &table).unwrap();
        assert_eq!(colon.name, "Size");
        assert_eq!(colon.style, NamingStyle::NameColon);
    }

    #[test]
    fn test_name_colon_type_of() {
        let table = SymbolTable::with_predefined();
        let value =
            AttributeValue::from_syntax(&argument("Bar: typeof(string)"), "Foo", &table).unwrap();

        assert_eq!(value.name, "Bar");
        assert_eq!(value.style, NamingStyle::NameColon);
        assert_eq!(value.value.as_type().map(|t| t.name.as_str()), Some("string"));
        assert_eq!(emitted(&value), "Bar: typeof(string)");
    }

    #[test]
    fn test_emission_keeps_style() {
        let cases = [
            ("\"x\"", "\"x\""),
            ("Name = \"x\"", "Name = \"x\""),
            ("Name: 'c'", "Name: 'c'"),
            ("Flag = false", "Flag = false"),
        ];
        let table = SymbolTable::with_predefined();
        for (source, expected) in cases {
            let value = AttributeValue::from_syntax(&argument(source), "Attr", &table).unwrap();
            assert_eq!(emitted(&value), expected);
        }
    }

    #[test]
    fn test_same_intent_ignores_style() {
        let positional = AttributeValue::new("Foo", NamingStyle::Positional, LiteralValue::Int(1));
        let equals = AttributeValue::new("Foo", NamingStyle::NameEquals, LiteralValue::Int(1));
        assert!(positional.same_intent(&equals));

        let other_value = AttributeValue::new("Foo", NamingStyle::NameEquals, LiteralValue::Int(2));
        assert!(!positional.same_intent(&other_value));

        // Same number, different literal kind
        let long = AttributeValue::new("Foo", NamingStyle::Positional, LiteralValue::Long(1));
        assert!(!positional.same_intent(&long));
    }

    #[test]
    fn test_type_values_compare_by_symbol() {
        let table = SymbolTable::with_predefined();
        let keyword = AttributeValue::new(
            "T",
            NamingStyle::Positional,
            LiteralValue::Type(TypeReference::resolve("string", &table)),
        );
        let runtime = AttributeValue::new(
            "T",
            NamingStyle::NameColon,
            LiteralValue::Type(TypeReference::resolve("System.String", &table)),
        );
        assert!(keyword.same_intent(&runtime));
    }

    #[test]
    fn test_unsupported_argument_fails() {
        let table = SymbolTable::with_predefined();
        let err = AttributeValue::from_syntax(&argument("X = Other.Value"), "Foo", &table)
            .unwrap_err();
        assert!(matches!(err, DomError::UnsupportedLiteralShape { .. }));
    }

    #[test]
    fn test_attribute_lists_from_declaration() {
        let (cst, _, _) = parse_source(
            "[Serializable, Table(\"t\", Schema = \"s\")]\n[Obsolete]\nclass C\n{\n}\n",
        );
        let decl = cst.first_child().expect("decl");
        let lists = attribute_lists(&decl, &SymbolTable::with_predefined()).unwrap();

        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].attributes.len(), 2);
        let table = &lists[0].attributes[1];
        assert_eq!(table.name, "Table");
        assert_eq!(table.values[0].name, "Table");
        assert_eq!(
            table.value("Schema").map(|v| &v.value),
            Some(&LiteralValue::String("s".to_string()))
        );

        let text = CsSyntaxNode::new_root(lists[0].build_syntax().unwrap())
            .text()
            .to_string();
        assert_eq!(text, "[Serializable, Table(\"t\", Schema = \"s\")]");
    }
}
