//! Model construction from a CST
//!
//! [`DomBuilder`] walks the CST in document order and mirrors every member
//! list into the [`Dom`]. Leading trivia of each member, and the trivia in
//! front of each closing brace, become comment and blank-line members.
//!
//! `#region`/`#endregion` are paired lexically with a stack that spans the
//! whole file, so a region opened in one container and closed in another
//! still shares one group id (and is later reported as not semantically
//! valid by the matcher).

use super::attribute::{Attribute, AttributeList};
use super::block::{BlockEnd, BlockStart, GroupId};
use super::comment_white::build_comment_white;
use super::tree::{
    Dom, Field, MemberList, Method, Namespace, NodeData, NodeId, Statement, TypeDecl, TypeKind,
    UsingDirective,
};
use crate::config::ModelConfiguration;
use crate::cst::ast::{self, AstNode, Member, significant_text};
use crate::cst::trivia::{closing_trivia, leading_trivia};
use crate::cst::{CsSyntaxKind, CsSyntaxNode, TriviaToken};
use crate::error::DomError;
use crate::result::{Result, ResultExt};
use crate::semantic::TypeResolver;

/// Builds a [`Dom`] from a parsed compilation unit
pub struct DomBuilder<'a> {
    resolver: &'a dyn TypeResolver,
    strict: bool,
}

impl<'a> DomBuilder<'a> {
    /// Lenient builder resolving `typeof` operands through `resolver`
    pub fn new(resolver: &'a dyn TypeResolver) -> Self {
        Self {
            resolver,
            strict: false,
        }
    }

    pub fn with_config(resolver: &'a dyn TypeResolver, config: &ModelConfiguration) -> Self {
        Self::new(resolver).strict(config.is_strict())
    }

    /// In strict mode the first construct that cannot be modelled aborts the
    /// build; otherwise it is skipped and reported
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the model for `root` and collect what had to be skipped
    pub fn build(&self, root: &CsSyntaxNode) -> Result<(Dom, Vec<DomError>)> {
        let mut state = BuildState {
            builder: self,
            dom: Dom::new(),
            errors: Vec::new(),
            open_regions: Vec::new(),
        };

        let dom_root = state.dom.root();
        state.build_members(root, dom_root)?;

        for group in &state.open_regions {
            tracing::warn!("Region {} is never closed", group);
        }
        tracing::debug!(
            "Built model with {} nodes, {} skipped constructs",
            state.dom.len(),
            state.errors.len()
        );
        Ok((state.dom, state.errors))
    }
}

struct BuildState<'b, 'a> {
    builder: &'b DomBuilder<'a>,
    dom: Dom,
    errors: Vec<DomError>,
    open_regions: Vec<GroupId>,
}

impl BuildState<'_, '_> {
    fn build_members(&mut self, cst: &CsSyntaxNode, container: NodeId) -> Result<()> {
        for member in ast::members(cst) {
            self.add_comment_white(container, &leading_trivia(member.syntax()))?;
            self.build_member(&member, container)?;
        }
        self.add_comment_white(container, &closing_trivia(cst))
    }

    fn add_comment_white(&mut self, container: NodeId, trivia: &[TriviaToken]) -> Result<()> {
        for member in build_comment_white(trivia) {
            self.dom.append_member(container, member.into())?;
        }
        Ok(())
    }

    /// `None` for a construct that was skipped and reported
    fn recover<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        if self.builder.strict {
            return result.map(Some);
        }
        result.recoverable(&mut self.errors)
    }

    fn unmodelled(&mut self, node: &CsSyntaxNode, what: &str) -> Result<()> {
        let err = DomError::parse_error(format!(
            "Cannot model {what} `{}`",
            significant_text(node)
        ));
        self.recover::<()>(Err(err)).map(|_| ())
    }

    fn build_member(&mut self, member: &Member, container: NodeId) -> Result<()> {
        match member {
            Member::Using(using) => {
                let Some(name) = using.name() else {
                    return self.unmodelled(using.syntax(), "using directive");
                };
                self.dom
                    .append_member(container, NodeData::UsingDirective(UsingDirective { name }))?;
            }
            Member::Namespace(ns) => {
                let Some(name) = ns.name() else {
                    return self.unmodelled(ns.syntax(), "namespace");
                };
                let id = self.dom.append_member(
                    container,
                    NodeData::Namespace(Namespace {
                        name,
                        members: MemberList::new(),
                    }),
                )?;
                self.build_members(ns.syntax(), id)?;
            }
            Member::Type(decl) => self.build_type(decl, container)?,
            Member::Field(field) => self.build_field(field, container)?,
            Member::Method(method) => self.build_method(method, container)?,
            Member::Block(block) => {
                let id = self
                    .dom
                    .append_member(container, NodeData::Block(MemberList::new()))?;
                self.build_members(block.syntax(), id)?;
            }
            Member::Statement(statement) => {
                self.dom.append_member(
                    container,
                    NodeData::Statement(Statement::new(statement.text())),
                )?;
            }
            Member::RegionStart(start) => {
                let group = GroupId::new();
                self.open_regions.push(group);
                self.dom.append_member(
                    container,
                    NodeData::BlockStart(BlockStart::new(group, start.text())),
                )?;
            }
            Member::RegionEnd(end) => {
                let group = match self.open_regions.pop() {
                    Some(group) => group,
                    None => {
                        tracing::warn!("#endregion without a matching #region");
                        GroupId::new()
                    }
                };
                let mut boundary = BlockEnd::new(group);
                boundary.text = end.text();
                self.dom
                    .append_member(container, NodeData::BlockEnd(boundary))?;
            }
            Member::Error(node) => self.unmodelled(node, "syntax")?,
        }
        Ok(())
    }

    fn build_type(&mut self, decl: &ast::TypeDecl, container: NodeId) -> Result<()> {
        let kind = decl
            .keyword()
            .and_then(|k| TypeKind::from_keyword(k.text()));
        let (Some(kind), Some(name)) = (kind, decl.name()) else {
            return self.unmodelled(decl.syntax(), "type declaration");
        };

        let mut data = TypeDecl::new(kind, name);
        data.modifiers = decl.modifiers();
        data.attributes = self.attributes(decl.syntax())?;
        data.base_list = decl.base_list();

        let id = self.dom.append_member(container, NodeData::Type(data))?;
        self.build_members(decl.syntax(), id)
    }

    fn build_field(&mut self, field: &ast::FieldDecl, container: NodeId) -> Result<()> {
        let (Some(type_name), Some(name)) = (field.type_name(), field.name()) else {
            return self.unmodelled(field.syntax(), "field");
        };
        // An unsupported declarator is kept in an error node inside the field
        if field
            .syntax()
            .children()
            .any(|n| n.kind() == CsSyntaxKind::Error)
        {
            return self.unmodelled(field.syntax(), "field");
        }

        let mut data = Field::new(type_name, name);
        data.modifiers = field.modifiers();
        data.attributes = self.attributes(field.syntax())?;
        data.initializer = field.initializer();

        self.dom.append_member(container, NodeData::Field(data))?;
        Ok(())
    }

    fn build_method(&mut self, method: &ast::MethodDecl, container: NodeId) -> Result<()> {
        let Some(name) = method.name() else {
            return self.unmodelled(method.syntax(), "method");
        };

        let body = method.body();
        let data = Method {
            modifiers: method.modifiers(),
            attributes: self.attributes(method.syntax())?,
            return_type: method.return_type(),
            name,
            parameters: method.parameters(),
            body: body.as_ref().map(|_| MemberList::new()),
        };

        let id = self.dom.append_member(container, NodeData::Method(data))?;
        if let Some(body) = body {
            self.build_members(body.syntax(), id)?;
        }
        Ok(())
    }

    /// Attribute lists of a declaration; attributes whose arguments cannot
    /// be modelled are dropped in lenient mode
    fn attributes(&mut self, decl: &CsSyntaxNode) -> Result<Vec<AttributeList>> {
        let mut lists = Vec::new();
        for list in decl
            .children()
            .filter(|n| n.kind() == CsSyntaxKind::AttributeList)
        {
            let mut attributes = Vec::new();
            for attr in list.children().filter_map(ast::Attribute::cast) {
                let attribute = Attribute::from_syntax(&attr, self.builder.resolver);
                if let Some(attribute) = self.recover(attribute)? {
                    attributes.push(attribute);
                }
            }
            if !attributes.is_empty() {
                lists.push(AttributeList::new(attributes));
            }
        }
        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;
    use crate::dom::block::{BlockContents, block_contents, semantically_valid};
    use crate::dom::comment_white::{Comment, VerticalWhitespace};
    use crate::dom::literal::LiteralValue;
    use crate::semantic::{NoSemantics, SymbolTable};

    fn build(source: &str) -> (Dom, Vec<DomError>) {
        let (cst, _, _) = parse_source(source);
        let table = SymbolTable::collect(&cst);
        DomBuilder::new(&table).build(&cst).expect("lenient build")
    }

    fn kinds(dom: &Dom, container: NodeId) -> Vec<&'static str> {
        dom.members(container)
            .unwrap()
            .iter()
            .map(|&id| dom.data(id).unwrap().kind_name())
            .collect()
    }

    #[test]
    fn test_members_and_comments() {
        let (dom, errors) = build(
            "using System;\n\n// Entry point\nclass Program\n{\n    int count;\n\n    /* helper */\n    void Run()\n    {\n        count++;\n    }\n}\n",
        );
        assert!(errors.is_empty(), "{errors:?}");

        let root = dom.root();
        assert_eq!(
            kinds(&dom, root),
            vec!["UsingDirective", "VerticalWhitespace", "Comment", "Type"]
        );
        let members = dom.members(root).unwrap();
        assert_eq!(
            dom.data(members[2]).unwrap(),
            &NodeData::Comment(Comment::line("Entry point"))
        );

        let ty = members[3];
        assert_eq!(
            kinds(&dom, ty),
            vec!["Field", "VerticalWhitespace", "Comment", "Method"]
        );
        let method = dom.members(ty).unwrap()[3];
        assert_eq!(kinds(&dom, method), vec!["Statement"]);
    }

    #[test]
    fn test_closing_trivia_becomes_members() {
        let (dom, _) = build("class C\n{\n    int x;\n\n    // trailing\n}\n\n");
        let root = dom.root();
        let ty = dom.members(root).unwrap()[0];
        assert_eq!(
            kinds(&dom, ty),
            vec!["Field", "VerticalWhitespace", "Comment"]
        );
        assert_eq!(
            dom.data(dom.members(root).unwrap()[1]).unwrap(),
            &NodeData::VerticalWhitespace(VerticalWhitespace::new(1))
        );
    }

    #[test]
    fn test_regions_are_paired() {
        let (dom, _) = build(
            "class C\n{\n    #region Fields\n    int a;\n    int b;\n    #endregion\n}\n",
        );
        let ty = dom.members(dom.root()).unwrap()[0];
        let members = dom.members(ty).unwrap().to_vec();
        assert_eq!(
            kinds(&dom, ty),
            vec!["BlockStart", "Field", "Field", "BlockEnd"]
        );
        assert!(semantically_valid(&dom, members[0]).unwrap());
        assert_eq!(
            block_contents(&dom, members[0]).unwrap(),
            BlockContents::Members(vec![members[1], members[2]])
        );
    }

    #[test]
    fn test_region_crossing_containers() {
        let (dom, _) = build("#region Outer\nclass C\n{\n    #endregion\n}\n");
        let start = dom.members(dom.root()).unwrap()[0];
        assert!(!semantically_valid(&dom, start).unwrap());
    }

    #[test]
    fn test_orphan_endregion_gets_its_own_group() {
        let (dom, errors) = build("#endregion\n#region Open\n");
        assert!(errors.is_empty());
        let members = dom.members(dom.root()).unwrap();
        let end = dom.data(members[0]).unwrap().pairing();
        let start = dom.data(members[1]).unwrap().pairing();
        assert!(end.is_some_and(|p| p.is_resolved()));
        assert_ne!(end, start);
    }

    #[test]
    fn test_attributes_are_modelled() {
        let (dom, _) = build("[Table(\"t\", Schema = \"s\")]\nclass C\n{\n}\n");
        let ty = dom.members(dom.root()).unwrap()[0];
        let NodeData::Type(decl) = dom.data(ty).unwrap() else {
            panic!("expected type");
        };
        let table = &decl.attributes[0].attributes[0];
        assert_eq!(table.values.len(), 2);
        assert_eq!(table.values[0].value, LiteralValue::String("t".to_string()));
    }

    #[test]
    fn test_lenient_and_strict_attribute_failures() {
        let source = "[Good(1), Bad(Other.Value)]\nclass C\n{\n}\n";
        let (cst, _, _) = parse_source(source);

        let (dom, errors) = DomBuilder::new(&NoSemantics).build(&cst).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], DomError::UnsupportedLiteralShape { .. }));
        let ty = dom.members(dom.root()).unwrap()[0];
        let NodeData::Type(decl) = dom.data(ty).unwrap() else {
            panic!("expected type");
        };
        assert_eq!(decl.attributes[0].attributes.len(), 1);
        assert_eq!(decl.attributes[0].attributes[0].name, "Good");

        let strict = DomBuilder::new(&NoSemantics).strict(true).build(&cst);
        assert!(matches!(
            strict,
            Err(DomError::UnsupportedLiteralShape { .. })
        ));
    }

    #[test]
    fn test_error_nodes_are_skipped() {
        let (dom, errors) = build("class C\n{\n}\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], DomError::ParseError { .. }));
        assert_eq!(kinds(&dom, dom.root()), vec!["Type"]);
    }
}
