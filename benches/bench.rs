use oxidius_core::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const OPS: [Operation; 4] = [Operation::Add, Operation::Sub, Operation::Mul, Operation::Div];

/// Build a random expression of roughly `budget` depth, in the same style as
/// `hyformal`'s `build_complex_expr`: seeded RNG for reproducible benchmark input, leaves
/// sampled once the budget runs out or with a fixed leaf probability.
fn build_random_expr<'s>(
    scope: &Scope<'s>,
    symbols: &mut SymbolTable,
    rng: &mut ChaCha20Rng,
    budget: usize,
) -> NodeRef<'s> {
    if budget == 0 || rng.random_bool(0.35) {
        return match rng.random_range(0..=2) {
            0 => scope.alloc_leaf(Atom::Integer(rng.random_range(-9..=9))),
            1 => {
                let name = format!("v{}", rng.random_range(0..4));
                scope.alloc_leaf(Atom::Symbol(symbols.intern(&name)))
            }
            _ => scope.alloc_leaf(Atom::Real(rng.random_range(-9.0..9.0))),
        };
    }

    let op = OPS[rng.random_range(0..OPS.len())];
    let lhs = build_random_expr(scope, symbols, rng, budget - 1);
    let rhs = build_random_expr(scope, symbols, rng, budget - 1);
    lhs.set_next(Some(rhs));
    scope.alloc_inner(op, lhs)
}

fn commutativity_axiom<'s>(scope: &Scope<'s>, symbols: &mut SymbolTable) -> Statement<'s> {
    let a = symbols.intern("a");
    let b = symbols.intern("b");
    let mk = |s: Symbol| scope.alloc_leaf(Atom::Symbol(s));
    let lhs_root = {
        let x = mk(a);
        x.set_next(Some(mk(b)));
        scope.alloc_inner(Operation::Add, x)
    };
    let rhs_root = {
        let x = mk(b);
        x.set_next(Some(mk(a)));
        scope.alloc_inner(Operation::Add, x)
    };
    Statement::new(
        Expression::with_default_signature(lhs_root),
        Expression::with_default_signature(rhs_root),
        Comparator::Equal,
    )
    .unwrap()
}

fn bench_equal_and_clone(c: &mut Criterion) {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0x42);
        let tree = build_random_expr(&scope, &mut symbols, &mut rng, 8);
        let twin = {
            let mut rng2 = ChaCha20Rng::seed_from_u64(0x42);
            let mut symbols2 = SymbolTable::new();
            build_random_expr(&scope, &mut symbols2, &mut rng2, 8)
        };

        c.bench_function("equal_depth8", |b| {
            b.iter(|| black_box(equal(tree, twin)));
        });

        c.bench_function("clone_deep_depth8", |b| {
            b.iter(|| black_box(clone_deep(&scope, tree)));
        });
    });
}

fn bench_match_pattern(c: &mut Criterion) {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();
        let axiom = commutativity_axiom(&scope, &mut symbols);
        let mut rng = ChaCha20Rng::seed_from_u64(0x99);
        let subject = build_random_expr(&scope, &mut symbols, &mut rng, 6);

        c.bench_function("match_pattern_depth6", |b| {
            b.iter(|| black_box(match_pattern(&scope, axiom.lhs.root, subject)));
        });
    });
}

fn bench_transform_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_exhaustive_search");
    for depth in [3usize, 5, 7] {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let mut symbols = SymbolTable::new();
            let axiom = commutativity_axiom(&scope, &mut symbols);
            let mut rng = ChaCha20Rng::seed_from_u64(0xC0FFEE);
            let target_root = build_random_expr(&scope, &mut symbols, &mut rng, depth);
            let target = Expression::with_default_signature(target_root);

            group.bench_function(format!("depth_{depth}"), |b| {
                b.iter(|| {
                    black_box(transform(
                        &scope,
                        &target,
                        &axiom,
                        TransformOptions::default(),
                    ))
                });
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_equal_and_clone,
    bench_match_pattern,
    bench_transform_search,
);
criterion_main!(benches);
