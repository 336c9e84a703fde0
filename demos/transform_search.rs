use oxidius_core::prelude::*;

fn main() {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();

        let a = symbols.intern("a");
        let b = symbols.intern("b");
        let mk = |s: Symbol| scope.alloc_leaf(Atom::Symbol(s));

        // axiom: a + b = b + a
        let lhs = {
            let x = mk(a);
            x.set_next(Some(mk(b)));
            scope.alloc_inner(Operation::Add, x)
        };
        let rhs = {
            let x = mk(b);
            x.set_next(Some(mk(a)));
            scope.alloc_inner(Operation::Add, x)
        };
        let axiom = Statement::new(
            Expression::with_default_signature(lhs),
            Expression::with_default_signature(rhs),
            Comparator::Equal,
        )
        .expect("lhs and rhs share no conflicting symbol domains");

        // target: (x + y) + z, parsed left-associative.
        let x = symbols.intern("x");
        let y = symbols.intern("y");
        let z = symbols.intern("z");
        let xy = {
            let n = mk(x);
            n.set_next(Some(mk(y)));
            scope.alloc_inner(Operation::Add, n)
        };
        let target_root = {
            xy.set_next(Some(mk(z)));
            scope.alloc_inner(Operation::Add, xy)
        };
        let target = Expression::with_default_signature(target_root);

        let results = transform(&scope, &target, &axiom, TransformOptions::default());
        println!("found {} distinct rewritings of (x + y) + z:", results.len());
        for (i, result) in results.iter().enumerate() {
            println!("  [{i}] root op = {:?}", result.root.operation());
        }
    });
}
