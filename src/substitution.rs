//! `Substitution`: a symbol-to-expression binding map produced by matching and consumed by
//! substitution application.
use std::collections::HashMap;

use crate::equality::equal;
use crate::expression::Expression;
use crate::scope::Scope;
use crate::symbol::Symbol;

pub struct Substitution<'s> {
    bindings: HashMap<Symbol, Expression<'s>>,
}

impl<'s> Substitution<'s> {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn singleton(sym: Symbol, bound: Expression<'s>) -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(sym, bound);
        Self { bindings }
    }

    pub fn get(&self, sym: Symbol) -> Option<&Expression<'s>> {
        self.bindings.get(&sym)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Expression<'s>)> {
        self.bindings.iter().map(|(k, v)| (*k, v))
    }

    /// Combine `self` with `other`. A symbol bound in both must be bound to structurally equal
    /// expressions; on any conflict, every captured subtree in both maps is returned to `scope`
    /// and `None` is reported, since a failed join must not leak the partially accumulated
    /// captures.
    pub fn join(self, other: Self, scope: &Scope<'s>) -> Option<Self> {
        let mut merged = self.bindings;
        let mut conflict = false;
        for (sym, bound) in other.bindings {
            match merged.get(&sym) {
                Some(existing) if equal(existing.root, bound.root) => {
                    // Same binding captured twice (e.g. a repeated pattern variable); the
                    // duplicate copy is redundant once the first is kept.
                    scope.drop_node(bound.root);
                }
                Some(_) => {
                    conflict = true;
                    scope.drop_node(bound.root);
                }
                None => {
                    merged.insert(sym, bound);
                }
            }
        }
        if conflict {
            for (_, bound) in merged {
                scope.drop_node(bound.root);
            }
            None
        } else {
            Some(Self { bindings: merged })
        }
    }

    /// Release every captured subtree this substitution owns. Called on the accumulator when a
    /// sibling match fails partway through an operand-list walk.
    pub fn drop_all(self, scope: &Scope<'s>) {
        for (_, bound) in self.bindings {
            scope.drop_node(bound.root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::scope::with_node_arena;
    use crate::symbol::SymbolTable;

    #[test]
    fn join_collapses_equal_duplicate_bindings() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let mut symbols = SymbolTable::new();
            let x = symbols.intern("x");

            let leaf_a = scope.alloc_leaf(Atom::Integer(1));
            let leaf_b = scope.alloc_leaf(Atom::Integer(1));
            let a = Substitution::singleton(x, Expression::with_default_signature(leaf_a));
            let b = Substitution::singleton(x, Expression::with_default_signature(leaf_b));

            let joined = a.join(b, &scope).expect("equal bindings should join");
            assert!(joined.get(x).is_some());
        });
    }

    #[test]
    fn join_rejects_conflicting_bindings() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let mut symbols = SymbolTable::new();
            let x = symbols.intern("x");

            let leaf_a = scope.alloc_leaf(Atom::Integer(1));
            let leaf_b = scope.alloc_leaf(Atom::Integer(2));
            let a = Substitution::singleton(x, Expression::with_default_signature(leaf_a));
            let b = Substitution::singleton(x, Expression::with_default_signature(leaf_b));

            assert!(a.join(b, &scope).is_none());
        });
    }
}
