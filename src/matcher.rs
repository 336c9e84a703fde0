//! Component C: one-sided pattern matching.
//!
//! Every free symbol in `pattern` is treated as a capture variable: matching a symbol leaf
//! always succeeds and binds it to a deep copy of the corresponding subject subtree;
//! matching any other atom requires the subject to be an equal-valued leaf; matching an interior
//! node requires the subject to be an interior node with the same operation and an operand list
//! that matches pairwise, in order, with no leftover operands on either side.
use crate::atom::Atom;
use crate::equality::clone_deep;
use crate::expression::Expression;
use crate::scope::{NodeRef, Scope};
use crate::substitution::Substitution;

/// Attempt to match `pattern` against `subject`, returning the capture substitution on success.
pub fn match_pattern<'s>(
    scope: &Scope<'s>,
    pattern: NodeRef<'s>,
    subject: NodeRef<'s>,
) -> Option<Substitution<'s>> {
    match pattern.atom() {
        Some(Atom::Symbol(sym)) => {
            let captured = clone_deep(scope, subject);
            Some(Substitution::singleton(
                sym,
                Expression::with_default_signature(captured),
            ))
        }
        Some(other) => {
            if subject.atom() == Some(other) {
                Some(Substitution::empty())
            } else {
                None
            }
        }
        None => {
            let pattern_op = pattern.operation().unwrap();
            if subject.operation() != Some(pattern_op) {
                return None;
            }
            let mut acc = Substitution::empty();
            let mut p_cursor = pattern.down();
            let mut s_cursor = subject.down();
            loop {
                match (p_cursor, s_cursor) {
                    (None, None) => break,
                    (Some(p), Some(s)) => match match_pattern(scope, p, s) {
                        Some(partial) => match acc.join(partial, scope) {
                            Some(joined) => acc = joined,
                            None => return None,
                        },
                        None => {
                            acc.drop_all(scope);
                            return None;
                        }
                    },
                    _ => {
                        // Differing operand-list lengths: no match.
                        acc.drop_all(scope);
                        return None;
                    }
                }
                p_cursor = p_cursor.and_then(|p| p.next());
                s_cursor = s_cursor.and_then(|s| s.next());
            }
            Some(acc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Operation;
    use crate::scope::with_node_arena;
    use crate::symbol::SymbolTable;

    #[test]
    fn symbol_pattern_captures_any_subtree() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let mut symbols = SymbolTable::new();
            let a = symbols.intern("a");

            let pattern = scope.alloc_leaf(Atom::Symbol(a));
            let subject = scope.alloc_leaf(Atom::Integer(42));

            let sigma = match_pattern(&scope, pattern, subject).expect("symbol always matches");
            assert_eq!(sigma.get(a).unwrap().root.atom(), Some(Atom::Integer(42)));
        });
    }

    #[test]
    fn literal_pattern_requires_equal_atom() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let pattern = scope.alloc_leaf(Atom::Integer(1));
            let subject_ok = scope.alloc_leaf(Atom::Integer(1));
            let subject_bad = scope.alloc_leaf(Atom::Integer(2));

            assert!(match_pattern(&scope, pattern, subject_ok).is_some());
            assert!(match_pattern(&scope, pattern, subject_bad).is_none());
        });
    }

    #[test]
    fn repeated_pattern_variable_requires_equal_captures() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let mut symbols = SymbolTable::new();
            let x = symbols.intern("x");

            // pattern: x + x
            let px1 = scope.alloc_leaf(Atom::Symbol(x));
            let px2 = scope.alloc_leaf(Atom::Symbol(x));
            px1.set_next(Some(px2));
            let pattern = scope.alloc_inner(Operation::Add, px1);

            // subject: 3 + 3 matches
            let s1 = scope.alloc_leaf(Atom::Integer(3));
            let s2 = scope.alloc_leaf(Atom::Integer(3));
            s1.set_next(Some(s2));
            let subject_match = scope.alloc_inner(Operation::Add, s1);
            assert!(match_pattern(&scope, pattern, subject_match).is_some());

            // subject: 3 + 4 does not
            let t1 = scope.alloc_leaf(Atom::Integer(3));
            let t2 = scope.alloc_leaf(Atom::Integer(4));
            t1.set_next(Some(t2));
            let subject_conflict = scope.alloc_inner(Operation::Add, t1);
            assert!(match_pattern(&scope, pattern, subject_conflict).is_none());
        });
    }
}
