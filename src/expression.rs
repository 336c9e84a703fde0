//! `Expression`: a tree root paired with the signature governing its free symbols.
use std::collections::HashSet;

use crate::atom::Atom;
use crate::domain::{default_domain, Signature};
use crate::scope::NodeRef;
use crate::symbol::Symbol;

#[derive(Clone)]
pub struct Expression<'s> {
    pub root: NodeRef<'s>,
    pub signature: Signature,
}

impl<'s> Expression<'s> {
    /// Build an expression from a bare tree, assigning every free symbol the default domain
    /// (real, for any symbol not otherwise constrained). Used whenever the engine materializes a
    /// result it did not receive a signature for from the caller.
    pub fn with_default_signature(root: NodeRef<'s>) -> Self {
        let mut signature = Signature::new();
        for sym in collect_symbols(root) {
            signature.insert(sym, default_domain());
        }
        Self { root, signature }
    }

    /// Build an expression from an explicit signature, typically supplied by a driver that
    /// parsed a declaration alongside the expression text.
    pub fn with_signature(root: NodeRef<'s>, signature: Signature) -> Self {
        Self { root, signature }
    }
}

/// Walk `root` collecting every `Symbol` atom reachable via `down`/`next`.
pub fn collect_symbols<'s>(root: NodeRef<'s>) -> HashSet<Symbol> {
    let mut out = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(Atom::Symbol(sym)) = node.atom() {
            out.insert(sym);
        }
        if let Some(down) = node.down() {
            stack.push(down);
        }
        if let Some(next) = node.next() {
            stack.push(next);
        }
    }
    out
}
