//! Concrete end-to-end scenarios not already covered by `src/transform.rs`'s own test module
//! (commutative swaps, transform monotonicity, and depth bounds live there since they need the
//! search's internals). This file covers substitution capture and reapplication, signature
//! conflict detection, hash distinction, and rejecting spurious cross-operation matches.
use oxidius_core::dedup::quick_hash;
use oxidius_core::domain::Domain;
use oxidius_core::prelude::*;

fn leaf_sym<'s>(scope: &Scope<'s>, sym: Symbol) -> NodeRef<'s> {
    scope.alloc_leaf(Atom::Symbol(sym))
}

fn binary<'s>(scope: &Scope<'s>, op: Operation, a: NodeRef<'s>, b: NodeRef<'s>) -> NodeRef<'s> {
    a.set_next(Some(b));
    scope.alloc_inner(op, a)
}

/// `match(a + b, k + 2*x)` yields `{a -> k, b -> 2*x}`; applying that to `a * b` yields
/// `k * (2*x)`.
#[test]
fn substitution_capture_and_reapplication() {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();
        let (a, b) = (symbols.intern("a"), symbols.intern("b"));
        let pattern = binary(&scope, Operation::Add, leaf_sym(&scope, a), leaf_sym(&scope, b));

        let k = symbols.intern("k");
        let x = symbols.intern("x");
        let two_x = binary(
            &scope,
            Operation::Mul,
            scope.alloc_leaf(Atom::Integer(2)),
            leaf_sym(&scope, x),
        );
        let subject = binary(&scope, Operation::Add, leaf_sym(&scope, k), two_x);

        let sigma = match_pattern(&scope, pattern, subject).expect("a + b should match k + 2*x");
        assert!(equal(sigma.get(a).unwrap().root, leaf_sym(&scope, k)));
        assert!(equal(
            sigma.get(b).unwrap().root,
            binary(
                &scope,
                Operation::Mul,
                scope.alloc_leaf(Atom::Integer(2)),
                leaf_sym(&scope, x),
            )
        ));

        let a_times_b = binary(&scope, Operation::Mul, leaf_sym(&scope, a), leaf_sym(&scope, b));
        let result = apply_node(&scope, &sigma, a_times_b);

        let expected = binary(
            &scope,
            Operation::Mul,
            leaf_sym(&scope, k),
            binary(
                &scope,
                Operation::Mul,
                scope.alloc_leaf(Atom::Integer(2)),
                leaf_sym(&scope, x),
            ),
        );
        assert!(equal(result, expected));
    });
}

/// A statement binding the same symbol to two different domains is a signature conflict.
#[test]
fn signature_conflict_on_incompatible_domains() {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();
        let (a, b) = (symbols.intern("a"), symbols.intern("b"));

        let lhs_root = binary(&scope, Operation::Add, leaf_sym(&scope, a), leaf_sym(&scope, b));
        let rhs_root = binary(&scope, Operation::Add, leaf_sym(&scope, b), leaf_sym(&scope, a));

        let mut lhs_sig = Signature::new();
        lhs_sig.insert(a, Domain::Integer);
        let lhs = Expression::with_signature(lhs_root, lhs_sig);

        let mut rhs_sig = Signature::new();
        rhs_sig.insert(a, Domain::Real);
        let rhs = Expression::with_signature(rhs_root, rhs_sig);

        let result = Statement::new(lhs, rhs, Comparator::Equal);
        assert!(matches!(result, Err(OxError::SignatureConflict { symbol }) if symbol == a));
    });
}

/// `quick_hash` distinguishes different root operations, and is order-sensitive by design.
#[test]
fn hash_distinguishes_operation_and_operand_order() {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();
        let (x, y) = (symbols.intern("x"), symbols.intern("y"));

        let x_plus_y = binary(&scope, Operation::Add, leaf_sym(&scope, x), leaf_sym(&scope, y));
        let x_times_y = binary(&scope, Operation::Mul, leaf_sym(&scope, x), leaf_sym(&scope, y));
        assert_ne!(quick_hash(x_plus_y), quick_hash(x_times_y));

        let y_plus_x = binary(&scope, Operation::Add, leaf_sym(&scope, y), leaf_sym(&scope, x));
        assert_ne!(quick_hash(x_plus_y), quick_hash(y_plus_x));
    });
}

/// `match(a + b, x * y)` returns empty: an additive pattern never unifies with a multiplicative
/// subject.
#[test]
fn no_spurious_match_across_operations() {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();
        let (a, b) = (symbols.intern("a"), symbols.intern("b"));
        let (x, y) = (symbols.intern("x"), symbols.intern("y"));

        let pattern = binary(&scope, Operation::Add, leaf_sym(&scope, a), leaf_sym(&scope, b));
        let subject = binary(&scope, Operation::Mul, leaf_sym(&scope, x), leaf_sym(&scope, y));

        assert!(match_pattern(&scope, pattern, subject).is_none());
    });
}
