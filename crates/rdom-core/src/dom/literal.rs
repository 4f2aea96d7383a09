//! Literal and type-reference values of annotation arguments
//!
//! Extraction turns a `LiteralExpr` or `TypeOfExpr` into a [`LiteralValue`];
//! [`build_literal_expr`] is its inverse and produces a green node of the
//! same shape. Both directions dispatch with a closed `match` on the value's
//! kind, so every kind that can be extracted can also be emitted.

use std::fmt;

use rowan::{GreenNode, TextRange};

use crate::cst::ast::{
    ArgumentExpr, AstNode, AttributeArgument, LiteralExpr, TypeOfExpr, significant_text,
};
use crate::cst::{CsSyntaxKind, CstBuilder};
use crate::error::DomError;
use crate::result::Result;
use crate::semantic::{SymbolId, TypeResolver};

/// Lightweight, non-owning reference to a type
///
/// Carries the name as written plus whatever the resolver knew about it.
/// An unresolved reference (`symbol == None`) is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub qualified_name: Option<String>,
    pub declarations: Vec<TextRange>,
}

impl TypeReference {
    /// Reference by name only
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: None,
            qualified_name: None,
            declarations: Vec::new(),
        }
    }

    /// Reference resolved through `resolver` when it knows the name
    pub fn resolve(name: impl Into<String>, resolver: &dyn TypeResolver) -> Self {
        let name = name.into();
        match resolver.resolve_type(&name) {
            Some(resolved) => Self {
                name,
                symbol: Some(resolved.symbol),
                qualified_name: Some(resolved.qualified_name),
                declarations: resolved.declarations,
            },
            None => Self::unresolved(name),
        }
    }

    /// Same type: by resolved identity when both sides have one, else by name
    pub fn same_intent(&self, other: &TypeReference) -> bool {
        match (self.symbol, other.symbol) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Tag of a [`LiteralValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Boolean,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    String,
    Char,
    Null,
    Type,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::Boolean => "bool",
            LiteralKind::Int => "int",
            LiteralKind::UInt => "uint",
            LiteralKind::Long => "long",
            LiteralKind::ULong => "ulong",
            LiteralKind::Float => "float",
            LiteralKind::Double => "double",
            LiteralKind::Decimal => "decimal",
            LiteralKind::String => "string",
            LiteralKind::Char => "char",
            LiteralKind::Null => "null",
            LiteralKind::Type => "type",
        };
        f.write_str(name)
    }
}

/// A tagged literal value
///
/// `Decimal` keeps its digits as text (optional leading `-`, optional
/// fraction, no exponent) since no primitive holds a 128-bit decimal
/// exactly. `Char` is a single UTF-16 unit.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Boolean(bool),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Decimal(String),
    String(String),
    Char(char),
    Null,
    Type(TypeReference),
}

impl LiteralValue {
    pub fn kind(&self) -> LiteralKind {
        match self {
            LiteralValue::Boolean(_) => LiteralKind::Boolean,
            LiteralValue::Int(_) => LiteralKind::Int,
            LiteralValue::UInt(_) => LiteralKind::UInt,
            LiteralValue::Long(_) => LiteralKind::Long,
            LiteralValue::ULong(_) => LiteralKind::ULong,
            LiteralValue::Float(_) => LiteralKind::Float,
            LiteralValue::Double(_) => LiteralKind::Double,
            LiteralValue::Decimal(_) => LiteralKind::Decimal,
            LiteralValue::String(_) => LiteralKind::String,
            LiteralValue::Char(_) => LiteralKind::Char,
            LiteralValue::Null => LiteralKind::Null,
            LiteralValue::Type(_) => LiteralKind::Type,
        }
    }

    pub fn as_type(&self) -> Option<&TypeReference> {
        match self {
            LiteralValue::Type(reference) => Some(reference),
            _ => None,
        }
    }

    /// Value equality, with type references compared by resolved identity
    pub fn same_intent(&self, other: &LiteralValue) -> bool {
        match (self, other) {
            (LiteralValue::Type(a), LiteralValue::Type(b)) => a.same_intent(b),
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a.to_bits() == b.to_bits() || a == b,
            (LiteralValue::Double(a), LiteralValue::Double(b)) => {
                a.to_bits() == b.to_bits() || a == b
            }
            (LiteralValue::Decimal(a), LiteralValue::Decimal(b)) => {
                normalize_decimal(a) == normalize_decimal(b)
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Boolean(v) => write!(f, "{v}"),
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::UInt(v) => write!(f, "{v}"),
            LiteralValue::Long(v) => write!(f, "{v}"),
            LiteralValue::ULong(v) => write!(f, "{v}"),
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::Double(v) => write!(f, "{v}"),
            LiteralValue::Decimal(v) => f.write_str(v),
            LiteralValue::String(v) => write!(f, "{v:?}"),
            LiteralValue::Char(v) => write!(f, "{v:?}"),
            LiteralValue::Null => f.write_str("null"),
            LiteralValue::Type(t) => write!(f, "typeof({t})"),
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract the value of an annotation argument
pub fn extract_literal(arg: &AttributeArgument, resolver: &dyn TypeResolver) -> Result<LiteralValue> {
    match arg.expression() {
        Some(expr) => extract_expression(&expr, resolver),
        None => Err(DomError::unsupported_literal_shape(
            "MissingExpr",
            significant_text(arg.syntax()),
        )),
    }
}

/// Extract the value of an argument expression
///
/// Anything other than a literal or a `typeof` fails with
/// `UnsupportedLiteralShape`.
pub fn extract_expression(expr: &ArgumentExpr, resolver: &dyn TypeResolver) -> Result<LiteralValue> {
    match expr {
        ArgumentExpr::Literal(literal) => extract_literal_expr(literal),
        ArgumentExpr::TypeOf(type_of) => extract_type_of(type_of, resolver),
        ArgumentExpr::Other(node) => Err(DomError::unsupported_literal_shape(
            "OtherExpr",
            significant_text(node),
        )),
    }
}

fn extract_literal_expr(literal: &LiteralExpr) -> Result<LiteralValue> {
    let node = literal.syntax();
    let token = literal
        .token()
        .ok_or_else(|| DomError::unsupported_literal_shape("LiteralExpr", significant_text(node)))?;
    parse_literal_token(token.kind(), token.text(), literal.is_negated())
}

fn extract_type_of(type_of: &TypeOfExpr, resolver: &dyn TypeResolver) -> Result<LiteralValue> {
    let name = type_of.type_name().ok_or_else(|| {
        DomError::unsupported_literal_shape(
            "TypeOfExpr",
            significant_text(type_of.syntax()),
        )
    })?;
    tracing::trace!("Resolving typeof operand `{}`", name);
    Ok(LiteralValue::Type(TypeReference::resolve(name, resolver)))
}

/// Classify one literal token and decode its value
pub fn parse_literal_token(kind: CsSyntaxKind, text: &str, negated: bool) -> Result<LiteralValue> {
    let shape_error = || DomError::unsupported_literal_shape(format!("{kind:?}"), text);

    let value = match kind {
        CsSyntaxKind::TrueKw => LiteralValue::Boolean(true),
        CsSyntaxKind::FalseKw => LiteralValue::Boolean(false),
        CsSyntaxKind::NullKw => LiteralValue::Null,
        CsSyntaxKind::IntegerLiteral => parse_integer(text, negated).ok_or_else(shape_error)?,
        CsSyntaxKind::RealLiteral => parse_real(text, negated).ok_or_else(shape_error)?,
        CsSyntaxKind::StringLiteral => {
            LiteralValue::String(unescape_string(text).ok_or_else(shape_error)?)
        }
        CsSyntaxKind::CharLiteral => {
            let body = text
                .strip_prefix('\'')
                .and_then(|t| t.strip_suffix('\''))
                .ok_or_else(shape_error)?;
            let decoded = unescape(body).ok_or_else(shape_error)?;
            let mut chars = decoded.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if is_utf16_unit(c) => LiteralValue::Char(c),
                _ => return Err(shape_error()),
            }
        }
        _ => return Err(shape_error()),
    };

    if negated && !matches!(kind, CsSyntaxKind::IntegerLiteral | CsSyntaxKind::RealLiteral) {
        return Err(shape_error());
    }
    Ok(value)
}

/// Integer literal with C# typing: unsuffixed values take the first of
/// int, uint, long, ulong that holds them
fn parse_integer(text: &str, negated: bool) -> Option<LiteralValue> {
    let lower = text.to_ascii_lowercase();
    let digits_end = lower.trim_end_matches(['u', 'l']).len();
    let (digits, suffix) = lower.split_at(digits_end);
    let digits = digits.replace('_', "");

    let magnitude = match digits.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u128>().ok()?,
    };
    let value: i128 = if negated {
        -(i128::try_from(magnitude).ok()?)
    } else {
        i128::try_from(magnitude).ok()?
    };

    let has_u = suffix.contains('u');
    let has_l = suffix.contains('l');
    let candidates: &[LiteralKind] = match (has_u, has_l) {
        (false, false) => &[LiteralKind::Int, LiteralKind::UInt, LiteralKind::Long, LiteralKind::ULong],
        (true, false) => &[LiteralKind::UInt, LiteralKind::ULong],
        (false, true) => &[LiteralKind::Long, LiteralKind::ULong],
        (true, true) => &[LiteralKind::ULong],
    };

    candidates.iter().find_map(|kind| match kind {
        LiteralKind::Int => i32::try_from(value).ok().map(LiteralValue::Int),
        LiteralKind::UInt => u32::try_from(value).ok().map(LiteralValue::UInt),
        LiteralKind::Long => i64::try_from(value).ok().map(LiteralValue::Long),
        LiteralKind::ULong => u64::try_from(value).ok().map(LiteralValue::ULong),
        _ => None,
    })
}

/// Real literal: `f` is float, `m` is decimal, `d` or nothing is double
fn parse_real(text: &str, negated: bool) -> Option<LiteralValue> {
    let cleaned = text.replace('_', "");
    let (body, suffix) = match cleaned.chars().last() {
        Some(c @ ('f' | 'F' | 'd' | 'D' | 'm' | 'M')) => {
            (&cleaned[..cleaned.len() - 1], c.to_ascii_lowercase())
        }
        _ => (cleaned.as_str(), 'd'),
    };

    match suffix {
        'f' => {
            let value: f32 = body.parse().ok()?;
            Some(LiteralValue::Float(if negated { -value } else { value }))
        }
        'm' => {
            let digits = expand_decimal(body)?;
            let sign = if negated { "-" } else { "" };
            Some(LiteralValue::Decimal(format!("{sign}{digits}")))
        }
        _ => {
            let value: f64 = body.parse().ok()?;
            Some(LiteralValue::Double(if negated { -value } else { value }))
        }
    }
}

/// Plain decimal digits with an optional fraction and sign
fn is_decimal_text(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

/// Decimal literal body without its exponent: `1.5e2` is `150`, `.5` is
/// `0.5`; fraction digits as written are kept
fn expand_decimal(body: &str) -> Option<String> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], body[at + 1..].parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (whole.is_empty() && fraction.is_empty())
        || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
    {
        return None;
    }
    // Far outside the range of a 28-digit decimal
    if exponent.unsigned_abs() > 64 {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let point = whole.len() as i64 + i64::from(exponent);
    let (int_part, frac_part) = if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs() as usize);
        (String::new(), format!("{zeros}{digits}"))
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        (format!("{digits}{zeros}"), String::new())
    } else {
        let (int_part, frac_part) = digits.split_at(point as usize);
        (int_part.to_string(), frac_part.to_string())
    };

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    if frac_part.is_empty() {
        Some(int_part.to_string())
    } else {
        Some(format!("{int_part}.{frac_part}"))
    }
}

/// Decimal text compared by value: no trailing fraction zeros, no `-0`
fn normalize_decimal(text: &str) -> String {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let fraction = fraction.trim_end_matches('0');

    let magnitude = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };
    if negative && magnitude != "0" {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// C# `char` holds one UTF-16 code unit
fn is_utf16_unit(c: char) -> bool {
    (c as u32) <= 0xFFFF
}

fn unescape_string(text: &str) -> Option<String> {
    if let Some(verbatim) = text.strip_prefix("@\"") {
        let body = verbatim.strip_suffix('"')?;
        return Some(body.replace("\"\"", "\""));
    }
    let body = text.strip_prefix('"')?.strip_suffix('"')?;
    unescape(body)
}

/// Decode C# escape sequences
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' => hex_char(&mut chars, 4, 4)?,
            'U' => hex_char(&mut chars, 8, 8)?,
            'x' => hex_char(&mut chars, 1, 4)?,
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

fn hex_char(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, min: usize, max: usize) -> Option<char> {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    if digits.len() < min {
        return None;
    }
    char::from_u32(u32::from_str_radix(&digits, 16).ok()?)
}

// ============================================================================
// Emission
// ============================================================================

/// Build the expression node for a value: `LiteralExpr` for plain values,
/// `TypeOfExpr` for type references
pub fn build_literal_expr(value: &LiteralValue) -> Result<GreenNode> {
    let mut builder = CstBuilder::new();
    write_literal_expr(&mut builder, value)?;
    Ok(builder.finish_green())
}

/// Source text of the expression for a value
pub fn literal_source(value: &LiteralValue) -> Result<String> {
    let node = crate::cst::CsSyntaxNode::new_root(build_literal_expr(value)?);
    Ok(node.text().to_string())
}

/// Append the expression node for `value` to an open builder
pub(crate) fn write_literal_expr(builder: &mut CstBuilder, value: &LiteralValue) -> Result<()> {
    if let LiteralValue::Type(reference) = value {
        write_type_of(builder, reference);
        return Ok(());
    }

    let (negative, kind, text) = literal_token(value)?;
    builder.start_node(CsSyntaxKind::LiteralExpr);
    if negative {
        builder.token(CsSyntaxKind::Operator, "-");
    }
    builder.token(kind, &text);
    builder.finish_node();
    Ok(())
}

/// The token for a non-type value: (leading minus, kind, text)
fn literal_token(value: &LiteralValue) -> Result<(bool, CsSyntaxKind, String)> {
    let no_constructor = || DomError::NoLiteralConstructorForType {
        kind: value.kind(),
        value: value.to_string(),
    };

    let token = match value {
        LiteralValue::Boolean(true) => (false, CsSyntaxKind::TrueKw, "true".to_string()),
        LiteralValue::Boolean(false) => (false, CsSyntaxKind::FalseKw, "false".to_string()),
        LiteralValue::Null => (false, CsSyntaxKind::NullKw, "null".to_string()),
        LiteralValue::Int(v) => (*v < 0, CsSyntaxKind::IntegerLiteral, v.unsigned_abs().to_string()),
        LiteralValue::UInt(v) => (false, CsSyntaxKind::IntegerLiteral, format!("{v}U")),
        LiteralValue::Long(v) => (*v < 0, CsSyntaxKind::IntegerLiteral, format!("{}L", v.unsigned_abs())),
        LiteralValue::ULong(v) => (false, CsSyntaxKind::IntegerLiteral, format!("{v}UL")),
        LiteralValue::Float(v) => {
            if !v.is_finite() {
                return Err(no_constructor());
            }
            let mut text = v.abs().to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            (v.is_sign_negative(), CsSyntaxKind::RealLiteral, format!("{text}F"))
        }
        LiteralValue::Double(v) => {
            if !v.is_finite() {
                return Err(no_constructor());
            }
            let mut text = v.abs().to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            (v.is_sign_negative(), CsSyntaxKind::RealLiteral, text)
        }
        LiteralValue::Decimal(v) => {
            if !is_decimal_text(v) {
                return Err(no_constructor());
            }
            match v.strip_prefix('-') {
                Some(digits) => (true, CsSyntaxKind::RealLiteral, format!("{digits}M")),
                None => (false, CsSyntaxKind::RealLiteral, format!("{v}M")),
            }
        }
        LiteralValue::String(v) => (false, CsSyntaxKind::StringLiteral, quote(v, '"')),
        LiteralValue::Char(v) => {
            if !is_utf16_unit(*v) {
                return Err(no_constructor());
            }
            (false, CsSyntaxKind::CharLiteral, quote(&v.to_string(), '\''))
        }
        LiteralValue::Type(_) => return Err(no_constructor()),
    };
    Ok(token)
}

fn write_type_of(builder: &mut CstBuilder, reference: &TypeReference) {
    builder.start_node(CsSyntaxKind::TypeOfExpr);
    builder.token(CsSyntaxKind::TypeofKw, "typeof");
    builder.token(CsSyntaxKind::LParen, "(");

    let name = reference.name.as_str();
    if CsSyntaxKind::from_keyword(name) == Some(CsSyntaxKind::PredefinedTypeKw) {
        builder.start_node(CsSyntaxKind::PredefinedType);
        builder.token(CsSyntaxKind::PredefinedTypeKw, name);
        builder.finish_node();
    } else if name.contains('.') {
        builder.start_node(CsSyntaxKind::QualifiedName);
        for (idx, part) in name.split('.').enumerate() {
            if idx > 0 {
                builder.token(CsSyntaxKind::Dot, ".");
            }
            builder.token(CsSyntaxKind::Ident, part);
        }
        builder.finish_node();
    } else {
        builder.start_node(CsSyntaxKind::IdentifierName);
        builder.token(CsSyntaxKind::Ident, name);
        builder.finish_node();
    }

    builder.token(CsSyntaxKind::RParen, ")");
    builder.finish_node();
}

/// Quote and escape a string or char body
fn quote(body: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(body.len() + 2);
    out.push(delimiter);
    for c in body.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
