//! Symbol table of predefined and declared types

use indexmap::IndexMap;

use super::{ResolvedType, Symbol, SymbolId, SymbolKind, TypeResolver};
use crate::cst::ast::{AstNode, NamespaceDecl, TypeDecl};
use crate::cst::{CsSyntaxKind, CsSyntaxNode};

/// Keyword types and the runtime types they alias
const PREDEFINED_TYPES: &[(&str, &str)] = &[
    ("bool", "System.Boolean"),
    ("byte", "System.Byte"),
    ("sbyte", "System.SByte"),
    ("char", "System.Char"),
    ("decimal", "System.Decimal"),
    ("double", "System.Double"),
    ("float", "System.Single"),
    ("int", "System.Int32"),
    ("uint", "System.UInt32"),
    ("long", "System.Int64"),
    ("ulong", "System.UInt64"),
    ("short", "System.Int16"),
    ("ushort", "System.UInt16"),
    ("object", "System.Object"),
    ("string", "System.String"),
];

/// Type symbols indexed by every name they can be written as
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: IndexMap<String, SymbolId>,
}

impl SymbolTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the keyword types
    pub fn with_predefined() -> Self {
        let mut table = Self::new();
        for (keyword, qualified) in PREDEFINED_TYPES {
            let id = table.add_symbol(Symbol {
                name: (*keyword).to_string(),
                qualified_name: (*qualified).to_string(),
                kind: SymbolKind::Predefined,
                declarations: Vec::new(),
            });
            // `System.String` and `String` name the same type as `string`
            table.by_name.insert((*qualified).to_string(), id);
            if let Some(simple) = qualified.rsplit('.').next() {
                table.by_name.entry(simple.to_string()).or_insert(id);
            }
        }
        table
    }

    /// Predefined types plus every type declared under `root`
    pub fn collect(root: &CsSyntaxNode) -> Self {
        let mut table = Self::with_predefined();

        for node in root.descendants() {
            let Some(decl) = TypeDecl::cast(node.clone()) else {
                continue;
            };
            let Some(name) = decl.name() else {
                continue;
            };

            let qualified_name = qualify(&node, &name);
            let range = node.text_range();

            let existing = table
                .by_name
                .get(&qualified_name)
                .copied()
                .filter(|id| table.symbols[id.index()].kind == SymbolKind::Declared);
            match existing {
                // partial declarations add ranges to one symbol
                Some(id) => table.symbols[id.index()].declarations.push(range),
                None => {
                    let id = table.add_symbol(Symbol {
                        name: name.clone(),
                        qualified_name: qualified_name.clone(),
                        kind: SymbolKind::Declared,
                        declarations: vec![range],
                    });
                    table.by_name.insert(qualified_name, id);
                    table.by_name.entry(name).or_insert(id);
                }
            }
        }

        tracing::debug!("Collected {} type symbols", table.symbols.len());
        table
    }

    /// Add a symbol under its simple name, without overwriting
    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_raw(self.symbols.len() as u32);
        self.by_name.entry(symbol.name.clone()).or_insert(id);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// Lookup by simple or qualified name
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (SymbolId::from_raw(idx as u32), symbol))
    }
}

impl TypeResolver for SymbolTable {
    fn resolve_type(&self, name: &str) -> Option<ResolvedType> {
        let name = name.trim();
        let key = name.strip_prefix("global::").unwrap_or(name);
        let id = self.lookup(key)?;
        let symbol = self.get(id)?;
        Some(ResolvedType {
            symbol: id,
            qualified_name: symbol.qualified_name.clone(),
            declarations: symbol.declarations.clone(),
        })
    }
}

/// Prefix a type name with its enclosing namespaces and types
fn qualify(node: &CsSyntaxNode, name: &str) -> String {
    let mut parts = vec![name.to_string()];
    for ancestor in node.ancestors().skip(1) {
        let part = match ancestor.kind() {
            CsSyntaxKind::NamespaceDecl => NamespaceDecl::cast(ancestor).and_then(|n| n.name()),
            CsSyntaxKind::TypeDecl => TypeDecl::cast(ancestor).and_then(|t| t.name()),
            _ => None,
        };
        if let Some(part) = part {
            parts.push(part);
        }
    }
    parts.reverse();
    parts.join(".")
}
