//! Component B: structural equality, deep cloning, and shallow (soft) cloning.
//!
//! Both traversals are iterative, stack-based, post-order where needed, grounded directly in
//! `hyformal::arena::ExprArenaCtx::deep_copy`'s `Frame::Enter`/`Frame::Exit` pattern and
//! `hyformal::expr::AnyExprRef`'s iterative `PartialEq`, rather than naive recursion, so a
//! pathologically deep expression tree cannot blow the call stack.
use smallvec::SmallVec;

use crate::scope::{NodeRef, Scope};

/// Structural equality: same shape, same operations, same atoms, same operand order. Iterative
/// to avoid recursion depth proportional to tree depth.
pub fn equal<'s>(a: NodeRef<'s>, b: NodeRef<'s>) -> bool {
    let mut stack: SmallVec<[(NodeRef<'s>, NodeRef<'s>); 16]> = SmallVec::new();
    stack.push((a, b));
    while let Some((x, y)) = stack.pop() {
        match (x.is_leaf(), y.is_leaf()) {
            (true, true) => {
                if x.atom() != y.atom() {
                    return false;
                }
            }
            (false, false) => {
                if x.operation() != y.operation() {
                    return false;
                }
                let mut cx = x.down();
                let mut cy = y.down();
                loop {
                    match (cx, cy) {
                        (None, None) => break,
                        (Some(nx), Some(ny)) => {
                            stack.push((nx, ny));
                            cx = nx.next();
                            cy = ny.next();
                        }
                        _ => return false,
                    }
                }
            }
            _ => return false,
        }
    }
    true
}

enum Frame<'s> {
    Enter(NodeRef<'s>),
    Exit(NodeRef<'s>, usize),
}

/// Deep-copy the subtree rooted at `node` into `scope`, allocating every node fresh. The
/// returned root's `next` is always `None`: the caller owns splicing it into whatever chain it
/// belongs in.
pub fn clone_deep<'s>(scope: &Scope<'s>, node: NodeRef<'s>) -> NodeRef<'s> {
    let mut stack: SmallVec<[Frame<'s>; 16]> = SmallVec::new();
    let mut results: SmallVec<[NodeRef<'s>; 16]> = SmallVec::new();
    stack.push(Frame::Enter(node));
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(n) => {
                if n.is_leaf() {
                    stack.push(Frame::Exit(n, 0));
                } else {
                    let children: SmallVec<[NodeRef<'s>; 8]> = n.down().unwrap().chain().collect();
                    stack.push(Frame::Exit(n, children.len()));
                    for child in children.iter().rev() {
                        stack.push(Frame::Enter(child));
                    }
                }
            }
            Frame::Exit(n, arity) => {
                if let Some(atom) = n.atom() {
                    results.push(scope.alloc_leaf(atom));
                } else {
                    let op = n.operation().unwrap();
                    let start = results.len() - arity;
                    let children: SmallVec<[NodeRef<'s>; 8]> = results.drain(start..).collect();
                    splice_chain(&children);
                    results.push(scope.alloc_inner(op, children[0]));
                }
            }
        }
    }
    let root = results.pop().expect("clone_deep: empty result stack");
    root.set_next(None);
    root
}

/// Shallow-copy only the root node; `down` (for interior nodes) and `next` are carried over
/// verbatim, aliasing the source's children. Used by the transform engine to build a new root
/// shell around a freshly assembled operand list, which it then overwrites via
/// [`crate::scope::Node::set_down`].
pub fn clone_soft<'s>(scope: &Scope<'s>, node: NodeRef<'s>) -> NodeRef<'s> {
    let copy = match node.atom() {
        Some(atom) => scope.alloc_leaf(atom),
        None => scope.alloc_inner(node.operation().unwrap(), node.down().unwrap()),
    };
    copy.set_next(node.next());
    copy
}

fn splice_chain<'s>(nodes: &[NodeRef<'s>]) {
    for pair in nodes.windows(2) {
        pair[0].set_next(Some(pair[1]));
    }
    if let Some(last) = nodes.last() {
        last.set_next(None);
    }
}

pub(crate) fn splice_operand_list<'s>(nodes: &[NodeRef<'s>]) {
    splice_chain(nodes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::op::Operation;
    use crate::scope::with_node_arena;

    fn leaf<'s>(scope: &Scope<'s>, v: i64) -> NodeRef<'s> {
        scope.alloc_leaf(Atom::Integer(v))
    }

    #[test]
    fn equal_trees_built_in_different_buffers_compare_equal() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let x1 = leaf(&scope, 1);
            let y1 = leaf(&scope, 2);
            x1.set_next(Some(y1));
            let a = scope.alloc_inner(Operation::Add, x1);

            let x2 = leaf(&scope, 1);
            let y2 = leaf(&scope, 2);
            x2.set_next(Some(y2));
            let b = scope.alloc_inner(Operation::Add, x2);

            assert!(equal(a, b));
        });
    }

    #[test]
    fn operand_order_matters() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let x1 = leaf(&scope, 1);
            let y1 = leaf(&scope, 2);
            x1.set_next(Some(y1));
            let a = scope.alloc_inner(Operation::Add, x1);

            let y2 = leaf(&scope, 2);
            let x2 = leaf(&scope, 1);
            y2.set_next(Some(x2));
            let b = scope.alloc_inner(Operation::Add, y2);

            assert!(!equal(a, b));
        });
    }

    #[test]
    fn clone_deep_produces_independent_equal_tree() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let x = leaf(&scope, 1);
            let y = leaf(&scope, 2);
            x.set_next(Some(y));
            let root = scope.alloc_inner(Operation::Add, x);

            let copy = clone_deep(&scope, root);
            assert!(equal(root, copy));
            assert!(!std::ptr::eq(root, copy));
            assert!(copy.next().is_none());
        });
    }

    #[test]
    fn clone_soft_aliases_children() {
        with_node_arena(|arena| {
            let scope = Scope::new(arena);
            let x = leaf(&scope, 1);
            let y = leaf(&scope, 2);
            x.set_next(Some(y));
            let root = scope.alloc_inner(Operation::Add, x);

            let shell = clone_soft(&scope, root);
            assert!(std::ptr::eq(shell.down().unwrap(), x));
            assert!(!std::ptr::eq(shell, root));
        });
    }
}
