use oxidius_core::prelude::*;

fn main() {
    with_node_arena(|arena| {
        let scope = Scope::new(arena);
        let mut symbols = SymbolTable::new();

        let a = symbols.intern("a");
        let b = symbols.intern("b");
        let mk = |s: Symbol| scope.alloc_leaf(Atom::Symbol(s));

        // pattern: a + b
        let pattern = {
            let x = mk(a);
            x.set_next(Some(mk(b)));
            scope.alloc_inner(Operation::Add, x)
        };

        // subject: 1 + 2
        let subject = {
            let x = scope.alloc_leaf(Atom::Integer(1));
            x.set_next(Some(scope.alloc_leaf(Atom::Integer(2))));
            scope.alloc_inner(Operation::Add, x)
        };

        let sigma = match_pattern(&scope, pattern, subject).expect("a + b always matches a sum");
        println!("matched a + b against 1 + 2");

        // rhs: b + a -> applying sigma swaps the operands.
        let rhs = {
            let x = mk(b);
            x.set_next(Some(mk(a)));
            scope.alloc_inner(Operation::Add, x)
        };
        let rewritten = apply_node(&scope, &sigma, rhs);
        println!(
            "rewrote via a + b = b + a: result is an Add node = {}",
            rewritten.operation() == Some(Operation::Add)
        );
    });
}
