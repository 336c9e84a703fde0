//! Oxidius: the symbolic rewrite engine at the core of the Oxidius algebra language.
//!
//! This crate owns the five components described by the engine's data-flow (expression trees
//! and their scoped allocator, structural equality/cloning, one-sided pattern matching,
//! substitution application, and the exhaustive `transform` search), plus the plain-data
//! action/value vocabulary an external lexer/parser/driver targets. It does not lex, parse, or
//! drive a session; those are deliberately out of scope, see the crate's accompanying design
//! notes for the boundary.
//!
//! Shape
//!  - Every [`scope::Node`] is allocated out of a [`scope::NodeArena`] and handed out as a
//!    `&'s Node<'s>`; a [`scope::Scope`] is a lightweight bookkeeping layer over that arena that
//!    can detect a node being retired twice.
//!  - [`equality`], [`matcher`], and [`apply`] are pure functions over those borrowed trees.
//!  - [`transform`] drives the exhaustive rewrite search, deduplicating through [`dedup`].
//!
//! Example
//! ```
//! use oxidius_core::prelude::*;
//!
//! with_node_arena(|arena| {
//!     let scope = Scope::new(arena);
//!     let mut symbols = SymbolTable::new();
//!     let (a, b) = (symbols.intern("a"), symbols.intern("b"));
//!
//!     // axiom: a + b = b + a
//!     let mk = |s: Symbol| scope.alloc_leaf(Atom::Symbol(s));
//!     let lhs = { let x = mk(a); x.set_next(Some(mk(b))); scope.alloc_inner(Operation::Add, x) };
//!     let rhs = { let x = mk(b); x.set_next(Some(mk(a))); scope.alloc_inner(Operation::Add, x) };
//!     let axiom = Statement::new(
//!         Expression::with_default_signature(lhs),
//!         Expression::with_default_signature(rhs),
//!         Comparator::Equal,
//!     ).unwrap();
//!
//!     // target: x + y
//!     let (x, y) = (symbols.intern("x"), symbols.intern("y"));
//!     let target_root = { let n = mk(x); n.set_next(Some(mk(y))); scope.alloc_inner(Operation::Add, n) };
//!     let target = Expression::with_default_signature(target_root);
//!
//!     let results = transform(&scope, &target, &axiom, TransformOptions::default());
//!     assert_eq!(results.len(), 2); // { x + y, y + x }
//! });
//! ```

/// The action/value vocabulary consumed by an out-of-scope driver.
pub mod action;
/// Component D: substitution application.
pub mod apply;
/// Leaf values.
pub mod atom;
/// The exhaustive transform search's deduplication table.
pub mod dedup;
/// Numeric domains and symbol-to-domain signatures.
pub mod domain;
/// Component B: structural equality, deep cloning, and shallow cloning.
pub mod equality;
/// Non-fatal error types shared across the crate.
pub mod error;
/// `Expression`: a tree root plus its governing signature.
pub mod expression;
/// Component C: one-sided pattern matching.
pub mod matcher;
/// The operation tag carried by interior tree nodes.
pub mod op;
/// Component A: the scoped tree store.
pub mod scope;
/// `Statement`: a comparison between two expressions.
pub mod statement;
/// `Substitution`: a symbol-to-expression binding map.
pub mod substitution;
/// Interned symbol identifiers.
pub mod symbol;
/// Component E: the exhaustive transform search.
pub mod transform;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::action::{Action, ActionResult, Value};
    pub use crate::apply::{apply_expression, apply_node};
    pub use crate::atom::Atom;
    pub use crate::dedup::{DedupTable, DedupTableConfig, PushOutcome};
    pub use crate::domain::{default_domain, merge_signatures, Domain, Signature};
    pub use crate::equality::{clone_deep, clone_soft, equal};
    pub use crate::error::{OxError, OxResult};
    pub use crate::expression::{collect_symbols, Expression};
    pub use crate::matcher::match_pattern;
    pub use crate::op::Operation;
    pub use crate::scope::{with_node_arena, Node, NodeArena, NodeRef, Scope};
    pub use crate::statement::{Comparator, Statement};
    pub use crate::substitution::Substitution;
    pub use crate::symbol::{Symbol, SymbolTable};
    pub use crate::transform::{transform, transform_with_config, TransformOptions};
}
