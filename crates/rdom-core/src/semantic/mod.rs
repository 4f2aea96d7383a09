//! Symbol lookup for type references
//!
//! The model only needs one question answered: "which type does this name
//! refer to?". `TypeResolver` is that capability; `SymbolTable` is the
//! in-crate implementation built from the predefined keyword types and the
//! declarations found in a CST.

mod symbol_table;

pub use symbol_table::SymbolTable;

use rowan::TextRange;
use std::fmt;

/// Copyable handle to a symbol inside a `SymbolTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

/// Where a symbol comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Keyword alias of a runtime type (`string`, `int`, ...)
    Predefined,
    /// Declared in the parsed source
    Declared,
}

/// A type known to the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub declarations: Vec<TextRange>,
}

/// Answer to a successful type lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub symbol: SymbolId,
    pub qualified_name: String,
    pub declarations: Vec<TextRange>,
}

/// Resolves type names written in source to symbols
pub trait TypeResolver {
    /// `None` means the name is not known, which callers must accept
    fn resolve_type(&self, name: &str) -> Option<ResolvedType>;
}

/// Resolver that knows nothing, for building a model without semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemantics;

impl TypeResolver for NoSemantics {
    fn resolve_type(&self, _name: &str) -> Option<ResolvedType> {
        None
    }
}
