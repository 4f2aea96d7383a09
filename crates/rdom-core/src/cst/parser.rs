//! Hierarchical parser for the declaration language
//!
//! Builds a lossless CST from the token stream. Member lists (compilation
//! unit, namespace and type bodies, statement blocks) follow one trivia rule:
//!
//! - leading trivia (everything since the previous member) belongs to the
//!   member node
//! - trailing trivia (same-line whitespace and comments plus the first line
//!   break) also belongs to the member node
//! - trivia right after an opening `{` up to its line break belongs to the
//!   container, as does any trivia left before the closing `}` or end of file
//!
//! Statements inside method bodies are kept opaque: the parser only finds
//! where they end.

use super::lexer::{CstSpan, LexerError};
use super::{CstBuilder, CstToken, CsSyntaxKind, CsSyntaxNode};

/// A structural error found while building the CST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: CstSpan,
}

impl ParseError {
    fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Parse source text into a CST
///
/// # Example
///
/// ```rust,ignore
/// use rdom_core::cst::parse_source;
///
/// let source = "class C\n{\n    int x;\n}\n";
/// let (cst, lexer_errors, parse_errors) = parse_source(source);
/// assert!(lexer_errors.is_empty() && parse_errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_source(source: &str) -> (CsSyntaxNode, Vec<LexerError>, Vec<ParseError>) {
    let (tokens, lexer_errors) = super::lex_with_trivia(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_compilation_unit();
    let (cst, parse_errors) = parser.finish();
    (cst, lexer_errors, parse_errors)
}

/// Parse a single attribute argument such as `Bar: typeof(string)`
///
/// The returned root is the `AttributeArgument` node itself; surrounding
/// trivia is dropped. Tokens left over after the argument are reported as an
/// error.
pub fn parse_attribute_argument(source: &str) -> (CsSyntaxNode, Vec<ParseError>) {
    let (tokens, lexer_errors) = super::lex_with_trivia(source);
    let mut parser = Parser::new(&tokens);
    parser.errors.extend(
        lexer_errors
            .into_iter()
            .map(|err| ParseError::new(err.message, err.span)),
    );

    parser.skip_trivia();
    parser.parse_attribute_argument();
    parser.skip_trivia();
    if !parser.at_end() {
        let span = parser.current_span();
        parser
            .errors
            .push(ParseError::new("Unexpected tokens after attribute argument", span));
    }
    parser.finish()
}

/// Which members a list may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListContext {
    /// Compilation unit or namespace body
    Namespace,
    /// Class, struct or interface body
    Type,
    /// Method body or nested block
    Statements,
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (CsSyntaxNode, Vec<ParseError>) {
        (self.builder.finish(), self.errors)
    }

    fn parse_compilation_unit(&mut self) {
        self.builder.start_node(CsSyntaxKind::CompilationUnit);
        self.parse_member_list(ListContext::Namespace, false);
        self.builder.finish_node(); // COMPILATION_UNIT
    }

    /// Parse members until the closing brace (or end of input)
    fn parse_member_list(&mut self, context: ListContext, in_braces: bool) {
        loop {
            match self.peek_significant().1 {
                CsSyntaxKind::Eof => {
                    self.consume_trivia_and_newlines();
                    break;
                }
                CsSyntaxKind::RBrace if in_braces => {
                    self.consume_trivia_and_newlines();
                    break;
                }
                CsSyntaxKind::RBrace => {
                    // Stray closing brace at the top level
                    self.builder.start_node(CsSyntaxKind::Error);
                    self.consume_trivia_and_newlines();
                    let span = self.current_span();
                    self.add_current_token();
                    self.advance();
                    self.consume_trailing_trivia();
                    self.builder.finish_node();
                    self.errors.push(ParseError::new("Unexpected '}'", span));
                }
                _ => {
                    let before = self.pos;
                    self.parse_member(context);
                    if self.pos == before {
                        // Prevent infinite loop
                        self.error_and_recover("Expected a member");
                    }
                }
            }
        }
    }

    /// Parse one member including its leading and trailing trivia
    fn parse_member(&mut self, context: ListContext) {
        let checkpoint = self.builder.checkpoint();
        self.consume_trivia_and_newlines();

        let kind = match self.current_kind() {
            CsSyntaxKind::RegionDirective => Some(CsSyntaxKind::RegionStart),
            CsSyntaxKind::EndRegionDirective => Some(CsSyntaxKind::RegionEnd),
            _ => None,
        };
        if let Some(kind) = kind {
            self.builder.start_node_at(checkpoint, kind);
            self.add_current_token();
            self.advance();
            self.consume_trailing_trivia();
            self.builder.finish_node();
            return;
        }

        if context == ListContext::Statements {
            if self.at(CsSyntaxKind::LBrace) {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::Block);
                self.parse_braced_members(ListContext::Statements);
            } else {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::Statement);
                self.parse_statement_body();
            }
            self.consume_trailing_trivia();
            self.builder.finish_node();
            return;
        }

        match self.current_kind() {
            CsSyntaxKind::UsingKw if context == ListContext::Namespace => {
                self.builder
                    .start_node_at(checkpoint, CsSyntaxKind::UsingDirective);
                self.add_current_token();
                self.advance();
                self.consume_trivia();
                self.parse_qualified_name();
                self.consume_trivia();
                self.expect(CsSyntaxKind::Semicolon);
                self.consume_trailing_trivia();
                self.builder.finish_node(); // USING_DIRECTIVE
                return;
            }
            CsSyntaxKind::NamespaceKw if context == ListContext::Namespace => {
                self.builder
                    .start_node_at(checkpoint, CsSyntaxKind::NamespaceDecl);
                self.add_current_token();
                self.advance();
                self.consume_trivia();
                self.parse_qualified_name();
                self.consume_trivia_and_newlines();
                if self.at(CsSyntaxKind::LBrace) {
                    self.parse_braced_members(ListContext::Namespace);
                } else {
                    self.error_here("Expected '{' after namespace name");
                }
                self.consume_trailing_trivia();
                self.builder.finish_node(); // NAMESPACE_DECL
                return;
            }
            _ => {}
        }

        // Attributes and modifiers come before the keyword that tells us what
        // is being declared
        while self.at(CsSyntaxKind::LBracket) {
            self.parse_attribute_list();
            self.consume_trivia_and_newlines();
        }
        while self.at(CsSyntaxKind::ModifierKw) {
            self.add_current_token();
            self.advance();
            self.consume_trivia_and_newlines();
        }

        match self.current_kind() {
            CsSyntaxKind::ClassKw | CsSyntaxKind::StructKw | CsSyntaxKind::InterfaceKw => {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::TypeDecl);
                self.parse_type_declaration_rest();
            }
            CsSyntaxKind::PredefinedTypeKw | CsSyntaxKind::VoidKw | CsSyntaxKind::Ident
                if context == ListContext::Type =>
            {
                self.parse_type_name();
                self.consume_trivia();
                if self.at(CsSyntaxKind::LParen) {
                    // Constructor: the type name is the member name
                    self.builder.start_node_at(checkpoint, CsSyntaxKind::MethodDecl);
                    self.parse_method_rest();
                } else {
                    self.expect(CsSyntaxKind::Ident);
                    self.consume_trivia();
                    if self.at(CsSyntaxKind::LParen) {
                        self.builder.start_node_at(checkpoint, CsSyntaxKind::MethodDecl);
                        self.parse_method_rest();
                    } else {
                        self.builder.start_node_at(checkpoint, CsSyntaxKind::FieldDecl);
                        self.parse_field_rest();
                    }
                }
            }
            _ => {
                self.builder.start_node_at(checkpoint, CsSyntaxKind::Error);
                let span = self.current_span();
                let found = self.current_kind();
                self.skip_declaration();
                self.errors.push(ParseError::new(
                    format!("Unexpected {found:?} in member list"),
                    span,
                ));
            }
        }

        self.consume_trailing_trivia();
        self.builder.finish_node();
    }

    /// `class Name : Base { members }`, positioned at the keyword
    fn parse_type_declaration_rest(&mut self) {
        self.add_current_token();
        self.advance();
        self.consume_trivia();
        self.expect(CsSyntaxKind::Ident);

        if self.peek_significant().1 == CsSyntaxKind::Colon {
            self.consume_trivia_and_newlines();
            self.builder.start_node(CsSyntaxKind::BaseList);
            self.add_current_token();
            self.advance();
            while !self.at_end() {
                let next = self.peek_significant().1;
                if next == CsSyntaxKind::LBrace || next == CsSyntaxKind::Eof {
                    break;
                }
                self.add_current_token();
                self.advance();
            }
            self.builder.finish_node(); // BASE_LIST
        }

        self.consume_trivia_and_newlines();
        if self.at(CsSyntaxKind::LBrace) {
            self.parse_braced_members(ListContext::Type);
        } else {
            self.error_here("Expected '{' to open type body");
        }
    }

    /// Parameter list and either `;` or a body block
    fn parse_method_rest(&mut self) {
        self.builder.start_node(CsSyntaxKind::ParameterList);
        self.consume_balanced(CsSyntaxKind::LParen, CsSyntaxKind::RParen);
        self.builder.finish_node(); // PARAMETER_LIST

        match self.peek_significant().1 {
            CsSyntaxKind::Semicolon => {
                self.consume_trivia();
                self.add_current_token();
                self.advance();
            }
            CsSyntaxKind::LBrace => {
                self.consume_trivia_and_newlines();
                self.builder.start_node(CsSyntaxKind::Block);
                self.parse_braced_members(ListContext::Statements);
                self.builder.finish_node(); // BLOCK
            }
            _ => self.error_here("Expected method body or ';'"),
        }
    }

    /// Optional initializer and the terminating `;`
    fn parse_field_rest(&mut self) {
        if self.at(CsSyntaxKind::Equals) {
            self.builder.start_node(CsSyntaxKind::Initializer);
            let mut depth = 0usize;
            while !self.at_end() {
                match self.current_kind() {
                    CsSyntaxKind::Semicolon if depth == 0 => break,
                    CsSyntaxKind::RBrace if depth == 0 => break,
                    CsSyntaxKind::LParen | CsSyntaxKind::LBracket | CsSyntaxKind::LBrace => {
                        depth += 1
                    }
                    CsSyntaxKind::RParen | CsSyntaxKind::RBracket | CsSyntaxKind::RBrace => {
                        depth = depth.saturating_sub(1)
                    }
                    _ => {}
                }
                self.add_current_token();
                self.advance();
            }
            self.builder.finish_node(); // INITIALIZER
        }

        if !self.at(CsSyntaxKind::Semicolon) {
            self.builder.start_node(CsSyntaxKind::Error);
            let span = self.current_span();
            while !self.at_end()
                && !self.at(CsSyntaxKind::Semicolon)
                && !self.at(CsSyntaxKind::RBrace)
            {
                self.add_current_token();
                self.advance();
            }
            self.builder.finish_node();
            self.errors
                .push(ParseError::new("Unsupported field declarator", span));
        }
        self.expect(CsSyntaxKind::Semicolon);
    }

    /// `{`, members, `}`
    fn parse_braced_members(&mut self, context: ListContext) {
        self.add_current_token();
        self.advance();
        self.consume_trailing_trivia();
        self.parse_member_list(context, true);
        self.expect(CsSyntaxKind::RBrace);
    }

    /// Opaque statement: up to `;` at depth zero, or up to the `}` closing a
    /// braced body unless a continuation (`else`, `catch`, ...) follows
    fn parse_statement_body(&mut self) {
        let starts_with_do = self.current().is_some_and(|t| t.text == "do");
        let mut depth = 0usize;

        loop {
            match self.current_kind() {
                CsSyntaxKind::Eof => {
                    self.error_here("Unterminated statement");
                    break;
                }
                CsSyntaxKind::RegionDirective | CsSyntaxKind::EndRegionDirective
                    if depth == 0 =>
                {
                    self.error_here("Expected ';' before directive");
                    break;
                }
                CsSyntaxKind::Semicolon => {
                    self.add_current_token();
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                CsSyntaxKind::LParen | CsSyntaxKind::LBracket | CsSyntaxKind::LBrace => {
                    depth += 1;
                    self.add_current_token();
                    self.advance();
                }
                CsSyntaxKind::RParen | CsSyntaxKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    self.add_current_token();
                    self.advance();
                }
                CsSyntaxKind::RBrace => {
                    if depth == 0 {
                        self.error_here("Expected ';'");
                        break;
                    }
                    depth -= 1;
                    self.add_current_token();
                    self.advance();
                    if depth == 0 && !self.statement_continues(starts_with_do) {
                        break;
                    }
                }
                _ => {
                    self.add_current_token();
                    self.advance();
                }
            }
        }
    }

    /// Whether the statement goes on after a closing brace
    fn statement_continues(&self, starts_with_do: bool) -> bool {
        let (idx, kind) = self.peek_significant();
        match kind {
            CsSyntaxKind::Semicolon
            | CsSyntaxKind::RParen
            | CsSyntaxKind::Comma
            | CsSyntaxKind::Dot
            | CsSyntaxKind::Operator => true,
            CsSyntaxKind::Ident => {
                let word = self.tokens[idx].text.as_str();
                matches!(word, "else" | "catch" | "finally") || (starts_with_do && word == "while")
            }
            _ => false,
        }
    }

    /// Parse `[Attr, Attr(args)]`
    fn parse_attribute_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::AttributeList);
        self.add_current_token(); // [
        self.advance();
        self.consume_trivia_and_newlines();

        while !self.at_end() && !self.at(CsSyntaxKind::RBracket) {
            let before = self.pos;
            self.parse_attribute();
            self.consume_trivia_and_newlines();
            if self.at(CsSyntaxKind::Comma) {
                self.add_current_token();
                self.advance();
                self.consume_trivia_and_newlines();
            } else if self.pos == before || !self.at(CsSyntaxKind::RBracket) {
                self.error_and_recover("Expected ',' or ']' in attribute list");
                break;
            }
        }

        self.expect(CsSyntaxKind::RBracket);
        self.builder.finish_node(); // ATTRIBUTE_LIST
    }

    fn parse_attribute(&mut self) {
        self.builder.start_node(CsSyntaxKind::Attribute);
        self.parse_qualified_name();

        if self.peek_significant().1 == CsSyntaxKind::LParen {
            self.consume_trivia();
            self.builder.start_node(CsSyntaxKind::AttributeArgumentList);
            self.add_current_token(); // (
            self.advance();
            self.consume_trivia_and_newlines();

            while !self.at_end() && !self.at(CsSyntaxKind::RParen) {
                let before = self.pos;
                self.parse_attribute_argument();
                self.consume_trivia_and_newlines();
                if self.at(CsSyntaxKind::Comma) {
                    self.add_current_token();
                    self.advance();
                    self.consume_trivia_and_newlines();
                } else if self.pos == before || !self.at(CsSyntaxKind::RParen) {
                    self.error_and_recover("Expected ',' or ')' in argument list");
                    break;
                }
            }

            self.expect(CsSyntaxKind::RParen);
            self.builder.finish_node(); // ATTRIBUTE_ARGUMENT_LIST
        }

        self.builder.finish_node(); // ATTRIBUTE
    }

    /// `[Name =|Name :] expression`
    fn parse_attribute_argument(&mut self) {
        self.builder.start_node(CsSyntaxKind::AttributeArgument);

        if self.at(CsSyntaxKind::Ident) {
            let naming = match self.peek_significant_from(self.pos + 1).1 {
                CsSyntaxKind::Equals => Some(CsSyntaxKind::NameEquals),
                CsSyntaxKind::Colon => Some(CsSyntaxKind::NameColon),
                _ => None,
            };
            if let Some(naming) = naming {
                self.builder.start_node(naming);
                self.add_current_token();
                self.advance();
                self.consume_trivia();
                self.add_current_token(); // = or :
                self.advance();
                self.builder.finish_node();
                self.consume_trivia_and_newlines();
            }
        }

        self.parse_argument_expression();
        self.builder.finish_node(); // ATTRIBUTE_ARGUMENT
    }

    /// Classify the argument expression by its extent, then wrap it
    fn parse_argument_expression(&mut self) {
        let Some(last) = self.argument_extent_end() else {
            self.error_here("Expected expression");
            return;
        };

        let significant: Vec<&CstToken> = self.tokens[self.pos..=last]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();

        let is_literal = match significant.as_slice() {
            [single] => single.kind.is_literal(),
            [sign, number] => {
                sign.kind == CsSyntaxKind::Operator
                    && (sign.text == "-" || sign.text == "+")
                    && matches!(
                        number.kind,
                        CsSyntaxKind::IntegerLiteral | CsSyntaxKind::RealLiteral
                    )
            }
            _ => false,
        };
        let is_typeof = self.at(CsSyntaxKind::TypeofKw)
            && self.typeof_close(last) == Some(last);

        if is_literal {
            self.builder.start_node(CsSyntaxKind::LiteralExpr);
            self.consume_through(last);
            self.builder.finish_node();
        } else if is_typeof {
            self.builder.start_node(CsSyntaxKind::TypeOfExpr);
            self.add_current_token(); // typeof
            self.advance();
            self.consume_trivia_and_newlines();
            self.add_current_token(); // (
            self.advance();
            self.consume_trivia_and_newlines();
            self.parse_type_operand(last);
            self.consume_trivia_and_newlines();
            self.expect(CsSyntaxKind::RParen);
            self.builder.finish_node();
        } else {
            self.builder.start_node(CsSyntaxKind::OtherExpr);
            self.consume_through(last);
            self.builder.finish_node();
        }
    }

    /// Index of the last significant token of the current argument
    fn argument_extent_end(&self) -> Option<usize> {
        let mut depth = 0usize;
        let mut last = None;
        let mut idx = self.pos;

        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            match kind {
                CsSyntaxKind::Eof => break,
                CsSyntaxKind::Comma | CsSyntaxKind::RParen | CsSyntaxKind::RBracket
                    if depth == 0 =>
                {
                    break;
                }
                CsSyntaxKind::LParen | CsSyntaxKind::LBracket | CsSyntaxKind::LBrace => {
                    depth += 1
                }
                CsSyntaxKind::RParen | CsSyntaxKind::RBracket | CsSyntaxKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            if !kind.is_trivia() {
                last = Some(idx);
            }
            idx += 1;
        }

        last
    }

    /// Index of the `)` matching the `(` after `typeof`
    fn typeof_close(&self, limit: usize) -> Option<usize> {
        let mut depth = 0usize;
        for idx in self.pos + 1..=limit {
            match self.tokens[idx].kind {
                CsSyntaxKind::LParen => depth += 1,
                CsSyntaxKind::RParen => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                kind if kind.is_trivia() => {}
                _ if depth == 0 => return None,
                _ => {}
            }
        }
        None
    }

    /// Type operand inside `typeof(...)`; `close` is the index of its `)`
    fn parse_type_operand(&mut self, close: usize) {
        let end = (self.pos..close)
            .rev()
            .find(|&idx| !self.tokens[idx].kind.is_trivia());
        let Some(end) = end else {
            self.error_here("Expected type");
            return;
        };

        let operand = &self.tokens[self.pos..=end];
        let kind = match operand {
            [single] if single.kind == CsSyntaxKind::PredefinedTypeKw => {
                CsSyntaxKind::PredefinedType
            }
            [single] if single.kind == CsSyntaxKind::Ident => CsSyntaxKind::IdentifierName,
            tokens
                if tokens.iter().enumerate().all(|(i, t)| {
                    if i % 2 == 0 {
                        t.kind == CsSyntaxKind::Ident
                    } else {
                        t.kind == CsSyntaxKind::Dot
                    }
                }) && tokens.len() % 2 == 1 =>
            {
                CsSyntaxKind::QualifiedName
            }
            _ => CsSyntaxKind::TypeName,
        };

        self.builder.start_node(kind);
        self.consume_through(end);
        self.builder.finish_node();
    }

    /// `Ident(.Ident)*`
    fn parse_qualified_name(&mut self) {
        self.builder.start_node(CsSyntaxKind::QualifiedName);
        self.expect(CsSyntaxKind::Ident);
        while self.at(CsSyntaxKind::Dot) && self.nth_kind(1) == CsSyntaxKind::Ident {
            self.add_current_token();
            self.advance();
            self.add_current_token();
            self.advance();
        }
        self.builder.finish_node(); // QUALIFIED_NAME
    }

    /// Field type or method return type, with generic arguments, array
    /// ranks and nullable markers kept as written
    fn parse_type_name(&mut self) {
        self.builder.start_node(CsSyntaxKind::TypeName);
        match self.current_kind() {
            CsSyntaxKind::PredefinedTypeKw | CsSyntaxKind::VoidKw => {
                self.add_current_token();
                self.advance();
            }
            _ => self.parse_qualified_name(),
        }

        loop {
            match self.current_kind() {
                CsSyntaxKind::Lt => self.consume_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt),
                CsSyntaxKind::LBracket if self.nth_kind(1) == CsSyntaxKind::RBracket => {
                    self.consume_balanced(CsSyntaxKind::LBracket, CsSyntaxKind::RBracket)
                }
                CsSyntaxKind::Operator if self.current().is_some_and(|t| t.text == "?") => {
                    self.add_current_token();
                    self.advance();
                }
                _ => break,
            }
        }
        self.builder.finish_node(); // TYPE_NAME
    }

    /// Consume an `open ... close` group, nesting included
    fn consume_balanced(&mut self, open: CsSyntaxKind, close: CsSyntaxKind) {
        let mut depth = 0usize;
        while !self.at_end() {
            let kind = self.current_kind();
            self.add_current_token();
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
        self.error_here(format!("Unclosed {open:?}"));
    }

    /// Skip an unrecognized declaration: through `;` or a balanced `{ }`
    fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                CsSyntaxKind::RBrace if depth == 0 => return,
                CsSyntaxKind::Semicolon if depth == 0 => {
                    self.add_current_token();
                    self.advance();
                    return;
                }
                CsSyntaxKind::LBrace => depth += 1,
                CsSyntaxKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.add_current_token();
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.add_current_token();
            self.advance();
        }
    }

    // Helper methods

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.at(CsSyntaxKind::Eof)
    }

    fn current(&self) -> Option<&CstToken> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> CsSyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(CsSyntaxKind::Eof)
    }

    fn current_span(&self) -> CstSpan {
        self.current()
            .map(|t| t.span.clone())
            .unwrap_or_else(|| self.tokens.last().map(|t| t.span.clone()).unwrap_or(0..0))
    }

    fn nth_kind(&self, n: usize) -> CsSyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(CsSyntaxKind::Eof)
    }

    fn at(&self, kind: CsSyntaxKind) -> bool {
        self.current_kind() == kind
    }

    /// Whitespace or a comment, not a line break
    fn at_inline_trivia(&self) -> bool {
        matches!(
            self.current_kind(),
            CsSyntaxKind::Whitespace | CsSyntaxKind::CommentLine | CsSyntaxKind::CommentBlock
        )
    }

    /// First non-trivia token at or after the cursor
    fn peek_significant(&self) -> (usize, CsSyntaxKind) {
        self.peek_significant_from(self.pos)
    }

    fn peek_significant_from(&self, start: usize) -> (usize, CsSyntaxKind) {
        self.tokens[start.min(self.tokens.len())..]
            .iter()
            .position(|t| !t.kind.is_trivia())
            .map(|offset| (start + offset, self.tokens[start + offset].kind))
            .unwrap_or((self.tokens.len(), CsSyntaxKind::Eof))
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn add_current_token(&mut self) {
        if self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            if token.kind != CsSyntaxKind::Eof {
                self.builder.add_token(token);
            }
        }
    }

    /// Add tokens up to and including `last`
    fn consume_through(&mut self, last: usize) {
        while self.pos <= last && !self.at_end() {
            self.add_current_token();
            self.advance();
        }
    }

    fn expect(&mut self, kind: CsSyntaxKind) {
        if self.at(kind) {
            self.add_current_token();
            self.advance();
        } else {
            self.error_here(format!("Expected {kind:?}, found {:?}", self.current_kind()));
            // Create error token
            self.builder.token(CsSyntaxKind::Error, "");
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
    }

    /// Record an error and wrap the current token in an error node
    fn error_and_recover(&mut self, message: &str) {
        self.error_here(message);
        if !self.at_end() {
            self.builder.start_node(CsSyntaxKind::Error);
            self.add_current_token();
            self.advance();
            self.builder.finish_node();
        }
    }

    /// Step over trivia without adding it to the tree
    fn skip_trivia(&mut self) {
        while self.current_kind().is_trivia() {
            self.advance();
        }
    }

    fn consume_trivia(&mut self) {
        while self.at_inline_trivia() {
            self.add_current_token();
            self.advance();
        }
    }

    fn consume_trivia_and_newlines(&mut self) {
        while self.current_kind().is_trivia() {
            self.add_current_token();
            self.advance();
        }
    }

    /// Same-line trivia plus the line break that ends the line
    fn consume_trailing_trivia(&mut self) {
        self.consume_trivia();
        if self.at(CsSyntaxKind::Newline) {
            self.add_current_token();
            self.advance();
        }
    }
}
