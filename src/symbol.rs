//! Interned symbol identifiers.
//!
//! Role
//! - A [`Symbol`] is a compact numeric handle for an identifier string, in the same spirit as
//!   `hyformal`'s [`InlineVariable`](https://docs.rs/hyformal) newtype-around-`u32`: cheap to
//!   copy, compare, and hash, with the actual text kept in a side table.
//! - [`SymbolTable`] owns the strings; a `Symbol` is only meaningful relative to the table that
//!   produced it.
use std::collections::HashMap;

/// A compact, interned identifier.
///
/// Two symbols compare equal iff they were interned from the same string in the same
/// [`SymbolTable`]. Symbols from different tables must not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

/// Owns the interned strings backing a family of [`Symbol`] handles.
#[derive(Default)]
pub struct SymbolTable {
    strings: Vec<Box<str>>,
    ids: HashMap<Box<str>, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the same [`Symbol`] for repeated calls with equal strings.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.ids.get(name) {
            return *sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = name.into();
        self.ids.insert(boxed.clone(), sym);
        self.strings.push(boxed);
        sym
    }

    /// Resolve a previously interned symbol back to its source text.
    ///
    /// Panics if `sym` was not produced by this table.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut table = SymbolTable::new();
        let a = table.intern("x");
        let b = table.intern("x");
        let c = table.intern("y");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.resolve(a), "x");
        assert_eq!(table.resolve(c), "y");
    }
}
