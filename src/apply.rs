//! Component D: substitution application.
//!
//! Rebuilds `tree` with every symbol leaf bound in `sigma` replaced by a deep copy of its bound
//! expression, and every other node freshly allocated. The result is always fully independent of
//! both `tree` and `sigma`'s captured subtrees: nothing is aliased.
use smallvec::SmallVec;

use crate::atom::Atom;
use crate::equality::{clone_deep, splice_operand_list};
use crate::expression::Expression;
use crate::scope::{NodeRef, Scope};
use crate::substitution::Substitution;

pub fn apply_node<'s>(scope: &Scope<'s>, sigma: &Substitution<'s>, tree: NodeRef<'s>) -> NodeRef<'s> {
    match tree.atom() {
        Some(Atom::Symbol(sym)) => match sigma.get(sym) {
            Some(bound) => clone_deep(scope, bound.root),
            None => clone_deep(scope, tree),
        },
        Some(other) => scope.alloc_leaf(other),
        None => {
            let op = tree.operation().unwrap();
            let mut children: SmallVec<[NodeRef<'s>; 8]> = SmallVec::new();
            let mut cursor = tree.down();
            while let Some(child) = cursor {
                children.push(apply_node(scope, sigma, child));
                cursor = child.next();
            }
            splice_operand_list(&children);
            scope.alloc_inner(op, children[0])
        }
    }
}

pub fn apply_expression<'s>(
    scope: &Scope<'s>,
    sigma: &Substitution<'s>,
    expr: &Expression<'s>,
) -> Expression<'s> {
    let root = apply_node(scope, sigma, expr.root);
    Expression::with_default_signature(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_pattern;
    use crate::op::Operation;
    use crate::scope::with_node_arena;
    use crate::symbol::SymbolTable;

    #[test]
    fn apply_substitutes_captured_variable() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let mut symbols = SymbolTable::new();
            let x = symbols.intern("x");
            let y = symbols.intern("y");

            // pattern: x + y, subject: 1 + 2
            let px = scope.alloc_leaf(Atom::Symbol(x));
            let py = scope.alloc_leaf(Atom::Symbol(y));
            px.set_next(Some(py));
            let pattern = scope.alloc_inner(Operation::Add, px);

            let s1 = scope.alloc_leaf(Atom::Integer(1));
            let s2 = scope.alloc_leaf(Atom::Integer(2));
            s1.set_next(Some(s2));
            let subject = scope.alloc_inner(Operation::Add, s1);

            let sigma = match_pattern(&scope, pattern, subject).unwrap();

            // rhs: y + x -> should become 2 + 1
            let ry = scope.alloc_leaf(Atom::Symbol(y));
            let rx = scope.alloc_leaf(Atom::Symbol(x));
            ry.set_next(Some(rx));
            let rhs = scope.alloc_inner(Operation::Add, ry);

            let result = apply_node(&scope, &sigma, rhs);
            assert_eq!(result.operation(), Some(Operation::Add));
            let first = result.down().unwrap();
            assert_eq!(first.atom(), Some(Atom::Integer(2)));
            assert_eq!(first.next().unwrap().atom(), Some(Atom::Integer(1)));
        });
    }
}
