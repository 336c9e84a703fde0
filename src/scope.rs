//! Component A: the tree store and its scoped drop bookkeeping.
//!
//! Grounded in `hyformal::arena::ExprArenaCtx` / `with_arena_ctx`: a [`NodeArena`] owns every
//! node ever allocated for a given computation, handed out as `&'s Node<'s>` references whose
//! lifetime is tied to the arena itself via the same "self-referential struct behind a
//! higher-rank callback" trick `with_arena_ctx` uses. Actual memory is reclaimed exactly once,
//! when the `NodeArena` drops; a [`Scope`] is a lightweight *bookkeeping* layer over that single
//! arena, tracking which node addresses a particular region of the algorithm considers "dropped"
//! so that a double-drop can be detected even though Rust's ownership model makes a real
//! double-free impossible. Multiple scopes may share one arena (the dedup table keeps its own
//! internal scope, separate from a caller's).
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use typed_arena::Arena;

use crate::atom::Atom;
use crate::op::Operation;

#[derive(Clone, Copy)]
enum NodeKind<'s> {
    Leaf(Atom),
    Inner(Operation, NodeRef<'s>),
}

/// A single tree node. Interior mutability (`Cell`) on `kind` and `next` lets the transform
/// engine splice operand chains and rewrite `down` pointers in place without re-allocating every
/// ancestor.
pub struct Node<'s> {
    kind: Cell<NodeKind<'s>>,
    next: Cell<Option<NodeRef<'s>>>,
}

/// A borrowed handle to a node, valid for the lifetime of the arena that allocated it.
pub type NodeRef<'s> = &'s Node<'s>;

impl<'s> Node<'s> {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind.get(), NodeKind::Leaf(_))
    }

    pub fn atom(&self) -> Option<Atom> {
        match self.kind.get() {
            NodeKind::Leaf(a) => Some(a),
            NodeKind::Inner(..) => None,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match self.kind.get() {
            NodeKind::Inner(op, _) => Some(op),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn down(&self) -> Option<NodeRef<'s>> {
        match self.kind.get() {
            NodeKind::Inner(_, down) => Some(down),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn next(&self) -> Option<NodeRef<'s>> {
        self.next.get()
    }

    pub fn set_next(&self, next: Option<NodeRef<'s>>) {
        self.next.set(next);
    }

    /// Overwrite the first-child pointer of an interior node. Used by the transform engine when
    /// reassembling a rewritten operand list under an otherwise-unchanged root. Panics if called
    /// on a leaf: a caller confusing leaves and interior nodes here is an internal bug, not a
    /// recoverable condition.
    pub fn set_down(&self, new_down: NodeRef<'s>) {
        match self.kind.get() {
            NodeKind::Inner(op, _) => self.kind.set(NodeKind::Inner(op, new_down)),
            NodeKind::Leaf(_) => panic!("set_down called on a leaf node"),
        }
    }

    fn address(&self) -> usize {
        self as *const Node<'s> as usize
    }

    /// Iterate this node's `next`-linked siblings, starting with `self`.
    pub fn chain(&'s self) -> ChainIter<'s> {
        ChainIter { cursor: Some(self) }
    }
}

pub struct ChainIter<'s> {
    cursor: Option<NodeRef<'s>>,
}

impl<'s> Iterator for ChainIter<'s> {
    type Item = NodeRef<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.next();
        Some(current)
    }
}

/// Owns the backing allocation for every node in a computation. Create one with
/// [`with_node_arena`]; everything allocated from it lives exactly as long as the arena does.
pub struct NodeArena<'s> {
    arena: Arena<Node<'s>>,
}

impl<'s> NodeArena<'s> {
    fn alloc_leaf(&'s self, atom: Atom) -> NodeRef<'s> {
        self.arena.alloc(Node {
            kind: Cell::new(NodeKind::Leaf(atom)),
            next: Cell::new(None),
        })
    }

    fn alloc_inner(&'s self, op: Operation, down: NodeRef<'s>) -> NodeRef<'s> {
        self.arena.alloc(Node {
            kind: Cell::new(NodeKind::Inner(op, down)),
            next: Cell::new(None),
        })
    }
}

/// Run `f` with a freshly created arena, in the same shape as `hyformal::arena::with_arena_ctx`.
pub fn with_node_arena<F, R>(f: F) -> R
where
    F: for<'s> FnOnce(&'s NodeArena<'s>) -> R,
{
    let arena = NodeArena {
        arena: Arena::new(),
    };
    f(&arena)
}

/// A bookkeeping region over a [`NodeArena`]. Allocating through a scope is identical to
/// allocating through the arena directly; the scope additionally remembers which addresses have
/// been [`drop_node`](Scope::drop_node)-retired, so a second retirement of the same address is
/// detectable.
pub struct Scope<'s> {
    arena: &'s NodeArena<'s>,
    retired: RefCell<HashSet<usize>>,
}

impl<'s> Scope<'s> {
    pub fn new(arena: &'s NodeArena<'s>) -> Self {
        Self {
            arena,
            retired: RefCell::new(HashSet::new()),
        }
    }

    pub fn alloc_leaf(&self, atom: Atom) -> NodeRef<'s> {
        self.arena.alloc_leaf(atom)
    }

    pub fn alloc_inner(&self, op: Operation, down: NodeRef<'s>) -> NodeRef<'s> {
        self.arena.alloc_inner(op, down)
    }

    /// Retire every node reachable from `root` via `down` and `next`, recording each address as
    /// dropped. Retiring an address that is already retired is fatal: in debug builds this panics
    /// naming the offending address, since by construction it can only happen from a bug in this
    /// crate's own bookkeeping, never from data the driver supplies.
    pub fn drop_node(&self, root: NodeRef<'s>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            self.retire(node);
            if let Some(down) = node.down() {
                stack.push(down);
            }
            if let Some(next) = node.next() {
                stack.push(next);
            }
        }
    }

    fn retire(&self, node: NodeRef<'s>) {
        let addr = node.address();
        let first_time = self.retired.borrow_mut().insert(addr);
        if !first_time {
            #[cfg(debug_assertions)]
            panic!("double free: node at {addr:#x} was already retired in this scope");
        }
    }

    /// Move this scope's retirement set into `other`. `O(k)` in the number of pending addresses,
    /// never a tree walk: transferring ownership of a live subtree between scopes is bookkeeping,
    /// not a copy.
    pub fn transfer_to(&self, other: &Scope<'s>) {
        let mut mine = self.retired.borrow_mut();
        other.retired.borrow_mut().extend(mine.drain());
    }

    pub fn retired_count(&self) -> usize {
        self.retired.borrow().len()
    }

    /// Create a fresh, independently-bookkept [`Scope`] over the same backing [`NodeArena`].
    ///
    /// Used by [`crate::dedup::DedupTable`] to own a scope of its own, into which all candidate
    /// expressions are dropped, while still allocating out of the caller's arena so nodes can be
    /// freely passed between the two without crossing an arena boundary.
    pub fn new_nested(&self) -> Scope<'s> {
        Scope::new(self.arena)
    }
}
