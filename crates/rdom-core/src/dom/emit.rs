//! Syntax re-emission
//!
//! [`SyntaxEmitter`] turns a model subtree back into a green tree in
//! canonical layout: one member per line, indentation by nesting depth,
//! braces on their own lines, single spaces between tokens. Comments and
//! blank lines come from the comment/whitespace members, so text written in
//! that layout comes back byte for byte.
//!
//! Opaque pieces the model keeps as text (statements, initializers,
//! parameter lists, type names, base lists) are re-lexed and emitted
//! verbatim.

use rowan::GreenNode;

use super::attribute::{AttributeList, write_qualified_name};
use super::block::Pairing;
use super::comment_white::CommentWhite;
use super::tree::{Dom, NodeData, NodeId, TypeKind};
use crate::config::EmitConfiguration;
use crate::cst::{CsSyntaxKind, CsSyntaxNode, CstBuilder, lex_with_trivia};
use crate::error::DomError;
use crate::result::Result;

/// Emits green trees from a [`Dom`]
#[derive(Debug, Clone)]
pub struct SyntaxEmitter {
    indent_unit: String,
    newline: String,
    emit_comments: bool,
    emit_blank_lines: bool,
}

impl Default for SyntaxEmitter {
    fn default() -> Self {
        Self::new(&EmitConfiguration::default())
    }
}

impl SyntaxEmitter {
    pub fn new(config: &EmitConfiguration) -> Self {
        Self {
            indent_unit: config.indent_unit(),
            newline: config.newline_str().to_string(),
            emit_comments: config.emit_comments(),
            emit_blank_lines: config.emit_blank_lines(),
        }
    }

    /// Green tree for the subtree at `id`
    ///
    /// Fails with `PartialClonePairingUnresolved` if any region boundary in
    /// the subtree is still waiting for its partner.
    pub fn emit(&self, dom: &Dom, id: NodeId) -> Result<GreenNode> {
        for node in dom.unresolved_boundaries(id)? {
            if let Some(Pairing::Unresolved { original }) = dom.data(node)?.pairing() {
                return Err(DomError::PartialClonePairingUnresolved { node, original });
            }
        }

        let mut builder = CstBuilder::new();
        match dom.data(id)? {
            NodeData::CompilationUnit(_) => {
                builder.start_node(CsSyntaxKind::CompilationUnit);
                self.write_members(&mut builder, dom, id, 0)?;
                builder.finish_node();
            }
            _ => self.write_member(&mut builder, dom, id, 0)?,
        }
        tracing::debug!("Emitted syntax for {}", id);
        Ok(builder.finish_green())
    }

    /// Source text for the subtree at `id`
    pub fn to_source(&self, dom: &Dom, id: NodeId) -> Result<String> {
        let green = self.emit(dom, id)?;
        Ok(CsSyntaxNode::new_root(green).text().to_string())
    }

    fn indent(&self, depth: usize) -> String {
        self.indent_unit.repeat(depth)
    }

    fn write_indent(&self, builder: &mut CstBuilder, depth: usize) {
        if depth > 0 && !self.indent_unit.is_empty() {
            builder.token(CsSyntaxKind::Whitespace, &self.indent(depth));
        }
    }

    fn write_newline(&self, builder: &mut CstBuilder) {
        builder.token(CsSyntaxKind::Newline, &self.newline);
    }

    fn write_space(builder: &mut CstBuilder) {
        builder.token(CsSyntaxKind::Whitespace, " ");
    }

    fn write_members(
        &self,
        builder: &mut CstBuilder,
        dom: &Dom,
        container: NodeId,
        depth: usize,
    ) -> Result<()> {
        for &member in dom.members(container)? {
            self.write_member(builder, dom, member, depth)?;
        }
        Ok(())
    }

    /// `{`, members one level deeper, `}`; the line break after `}` is left
    /// to the caller
    fn write_body(
        &self,
        builder: &mut CstBuilder,
        dom: &Dom,
        container: NodeId,
        depth: usize,
    ) -> Result<()> {
        self.write_indent(builder, depth);
        builder.token(CsSyntaxKind::LBrace, "{");
        self.write_newline(builder);
        self.write_members(builder, dom, container, depth + 1)?;
        self.write_indent(builder, depth);
        builder.token(CsSyntaxKind::RBrace, "}");
        Ok(())
    }

    fn write_attributes(
        &self,
        builder: &mut CstBuilder,
        lists: &[AttributeList],
        depth: usize,
    ) -> Result<()> {
        for list in lists {
            self.write_indent(builder, depth);
            list.write_syntax(builder)?;
            self.write_newline(builder);
        }
        Ok(())
    }

    /// Comment and blank-line members go in as trivia of the container
    fn write_comment_white(&self, builder: &mut CstBuilder, member: &CommentWhite, depth: usize) {
        for trivia in member.build_trivia(&self.indent(depth), &self.newline) {
            builder.token(trivia.kind, &trivia.text);
        }
    }

    fn write_modifiers(builder: &mut CstBuilder, modifiers: &[String]) {
        for modifier in modifiers {
            builder.token(CsSyntaxKind::ModifierKw, modifier);
            Self::write_space(builder);
        }
    }

    fn write_member(
        &self,
        builder: &mut CstBuilder,
        dom: &Dom,
        id: NodeId,
        depth: usize,
    ) -> Result<()> {
        let data = dom.data(id)?;
        if let Some(member) = data.as_comment_white() {
            let keep = match member {
                CommentWhite::Comment(_) => self.emit_comments,
                CommentWhite::VerticalWhitespace(_) => self.emit_blank_lines,
            };
            if keep {
                self.write_comment_white(builder, &member, depth);
            }
            return Ok(());
        }

        match data {
            NodeData::Comment(_) | NodeData::VerticalWhitespace(_) => {}
            NodeData::CompilationUnit(_) => {
                // A detached unit nested under another node; emit its members
                self.write_members(builder, dom, id, depth)?;
            }
            NodeData::UsingDirective(using) => {
                builder.start_node(CsSyntaxKind::UsingDirective);
                self.write_indent(builder, depth);
                builder.token(CsSyntaxKind::UsingKw, "using");
                Self::write_space(builder);
                write_qualified_name(builder, &using.name);
                builder.token(CsSyntaxKind::Semicolon, ";");
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::Namespace(ns) => {
                builder.start_node(CsSyntaxKind::NamespaceDecl);
                self.write_indent(builder, depth);
                builder.token(CsSyntaxKind::NamespaceKw, "namespace");
                Self::write_space(builder);
                write_qualified_name(builder, &ns.name);
                self.write_newline(builder);
                self.write_body(builder, dom, id, depth)?;
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::Type(decl) => {
                builder.start_node(CsSyntaxKind::TypeDecl);
                self.write_attributes(builder, &decl.attributes, depth)?;
                self.write_indent(builder, depth);
                Self::write_modifiers(builder, &decl.modifiers);
                let keyword = match decl.kind {
                    TypeKind::Class => CsSyntaxKind::ClassKw,
                    TypeKind::Struct => CsSyntaxKind::StructKw,
                    TypeKind::Interface => CsSyntaxKind::InterfaceKw,
                };
                builder.token(keyword, decl.kind.keyword());
                Self::write_space(builder);
                builder.token(CsSyntaxKind::Ident, &decl.name);
                if let Some(bases) = &decl.base_list {
                    Self::write_space(builder);
                    builder.start_node(CsSyntaxKind::BaseList);
                    builder.token(CsSyntaxKind::Colon, ":");
                    Self::write_space(builder);
                    write_raw(builder, bases);
                    builder.finish_node();
                }
                self.write_newline(builder);
                self.write_body(builder, dom, id, depth)?;
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::Field(field) => {
                builder.start_node(CsSyntaxKind::FieldDecl);
                self.write_attributes(builder, &field.attributes, depth)?;
                self.write_indent(builder, depth);
                Self::write_modifiers(builder, &field.modifiers);
                write_type_name(builder, &field.type_name);
                Self::write_space(builder);
                builder.token(CsSyntaxKind::Ident, &field.name);
                if let Some(init) = &field.initializer {
                    Self::write_space(builder);
                    builder.start_node(CsSyntaxKind::Initializer);
                    builder.token(CsSyntaxKind::Equals, "=");
                    Self::write_space(builder);
                    write_raw(builder, init);
                    builder.finish_node();
                }
                builder.token(CsSyntaxKind::Semicolon, ";");
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::Method(method) => {
                builder.start_node(CsSyntaxKind::MethodDecl);
                self.write_attributes(builder, &method.attributes, depth)?;
                self.write_indent(builder, depth);
                Self::write_modifiers(builder, &method.modifiers);
                match &method.return_type {
                    Some(return_type) => {
                        write_type_name(builder, return_type);
                        Self::write_space(builder);
                        builder.token(CsSyntaxKind::Ident, &method.name);
                    }
                    None => write_type_name(builder, &method.name),
                }
                builder.start_node(CsSyntaxKind::ParameterList);
                write_raw(builder, &method.parameters);
                builder.finish_node();
                if method.body.is_some() {
                    self.write_newline(builder);
                    builder.start_node(CsSyntaxKind::Block);
                    self.write_body(builder, dom, id, depth)?;
                    builder.finish_node();
                } else {
                    builder.token(CsSyntaxKind::Semicolon, ";");
                }
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::Block(_) => {
                builder.start_node(CsSyntaxKind::Block);
                self.write_body(builder, dom, id, depth)?;
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::Statement(statement) => {
                builder.start_node(CsSyntaxKind::Statement);
                self.write_indent(builder, depth);
                write_raw(builder, &statement.text);
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::BlockStart(start) => {
                builder.start_node(CsSyntaxKind::RegionStart);
                self.write_indent(builder, depth);
                builder.token(
                    CsSyntaxKind::RegionDirective,
                    &directive("#region", &start.text),
                );
                self.write_newline(builder);
                builder.finish_node();
            }
            NodeData::BlockEnd(end) => {
                builder.start_node(CsSyntaxKind::RegionEnd);
                self.write_indent(builder, depth);
                builder.token(
                    CsSyntaxKind::EndRegionDirective,
                    &directive("#endregion", &end.text),
                );
                self.write_newline(builder);
                builder.finish_node();
            }
        }
        Ok(())
    }
}

fn directive(keyword: &str, text: &str) -> String {
    if text.is_empty() {
        keyword.to_string()
    } else {
        format!("{keyword} {text}")
    }
}

fn write_type_name(builder: &mut CstBuilder, name: &str) {
    builder.start_node(CsSyntaxKind::TypeName);
    write_raw(builder, name);
    builder.finish_node();
}

/// Re-lex `text` and add its tokens unchanged
fn write_raw(builder: &mut CstBuilder, text: &str) {
    let (tokens, _) = lex_with_trivia(text);
    for token in tokens.iter().filter(|t| t.kind != CsSyntaxKind::Eof) {
        builder.add_token(token);
    }
}
