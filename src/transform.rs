//! Component E: the exhaustive transform search.
//!
//! Given a target expression and an equational axiom `L = R`, enumerates every expression
//! reachable by repeatedly rewriting some subtree with `L -> R` or `R -> L`, deduplicated
//! through a [`DedupTable`]. The search is root-first: each call tries to rewrite its own root,
//! then recurses into operands, then reassembles every combination of a rewritten operand with
//! every rewriting of its siblings.
use crate::apply::apply_node;
use crate::dedup::{DedupTable, DedupTableConfig};
use crate::equality::{clone_deep, clone_soft, splice_operand_list};
use crate::expression::Expression;
use crate::matcher::match_pattern;
use crate::scope::{NodeRef, Scope};
use crate::statement::Statement;

/// Options accepted by [`transform`].
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Re-run the search on every newly discovered expression until fixpoint. Default `true`.
    pub exhaustive: bool,
    /// Bound on recursion into sub-expressions. `None` means unbounded.
    pub depth: Option<usize>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            exhaustive: true,
            depth: None,
        }
    }
}

/// Enumerate every expression reachable from `target` by rewriting with `axiom`. `axiom` must be
/// an equality; any other comparator makes "rewrite in either direction" meaningless and is a
/// caller bug, not a runtime condition, so it is asserted rather than reported as an
/// [`crate::error::OxError`].
///
/// `scope` both backs the returned expressions and seeds the search's own scratch allocations;
/// internally the search opens a nested [`Scope`] (via [`DedupTable`]) over the same arena so its
/// intermediate candidates can be reclaimed independently of the caller's bookkeeping.
pub fn transform<'s>(
    scope: &Scope<'s>,
    target: &Expression<'s>,
    axiom: &Statement<'s>,
    opts: TransformOptions,
) -> Vec<Expression<'s>> {
    transform_with_config(scope, target, axiom, opts, DedupTableConfig::default())
}

/// As [`transform`], but with explicit dedup-table sizing.
pub fn transform_with_config<'s>(
    scope: &Scope<'s>,
    target: &Expression<'s>,
    axiom: &Statement<'s>,
    opts: TransformOptions,
    table_config: DedupTableConfig,
) -> Vec<Expression<'s>> {
    assert!(
        axiom.is_equality(),
        "transform requires an equational axiom"
    );

    let mut table = DedupTable::new(scope.new_nested(), table_config);
    let seed = Expression::with_default_signature(clone_deep(scope, target.root));
    let mut pm = Vec::new();
    transform_step(scope, &mut table, seed, axiom, opts, opts.depth, &mut pm);

    pm.into_iter()
        .map(|idx| Expression::with_default_signature(clone_deep(scope, table.flat_at(idx).root)))
        .collect()
}

fn child_depth(depth: Option<usize>) -> Option<usize> {
    depth.map(|d| d.saturating_sub(1))
}

/// One call of the recursive search, following nine numbered steps against a single expression
/// `e`. `pm` accumulates every table index reachable from this call.
fn transform_step<'s>(
    scope: &Scope<'s>,
    table: &mut DedupTable<'s>,
    e: Expression<'s>,
    axiom: &Statement<'s>,
    opts: TransformOptions,
    depth: Option<usize>,
    pm: &mut Vec<usize>,
) {
    // Step 1.
    if depth == Some(0) {
        scope.drop_node(e.root);
        return;
    }

    // Step 2.
    table.push(e.clone(), pm);

    // Step 3.
    if e.root.is_leaf() {
        return;
    }

    let mut novel: Vec<usize> = Vec::new();

    // Step 4: rewrite at the root in both directions.
    if let Some(sigma) = match_pattern(scope, axiom.lhs.root, e.root) {
        let candidate_root = apply_node(scope, &sigma, axiom.rhs.root);
        sigma.drop_all(scope);
        table.push(
            Expression::with_default_signature(candidate_root),
            &mut novel,
        );
    }
    if let Some(tau) = match_pattern(scope, axiom.rhs.root, e.root) {
        let candidate_root = apply_node(scope, &tau, axiom.lhs.root);
        tau.drop_all(scope);
        table.push(
            Expression::with_default_signature(candidate_root),
            &mut novel,
        );
    }

    // Step 5: recurse into each operand independently, collecting its reachable-index list.
    let mut markers: Vec<Vec<usize>> = Vec::new();
    let mut cursor = e.root.down();
    while let Some(child) = cursor {
        let child_seed = Expression::with_default_signature(clone_deep(scope, child));
        let mut child_pm = Vec::new();
        transform_step(
            scope,
            table,
            child_seed,
            axiom,
            opts,
            child_depth(depth),
            &mut child_pm,
        );
        cursor = child.next();
        markers.push(child_pm);
    }

    // Step 6: reassemble every combination of rewritten operands under the unchanged root op,
    // generalized to arbitrary arity via a plain Cartesian product (see DESIGN.md).
    for combo in cartesian_product(&markers) {
        let mut children: Vec<NodeRef<'s>> = Vec::with_capacity(combo.len());
        for &idx in &combo {
            children.push(clone_deep(scope, table.flat_at(idx).root));
        }
        splice_operand_list(&children);
        let shell = clone_soft(scope, e.root);
        shell.set_down(children[0]);
        shell.set_next(None);
        table.push(Expression::with_default_signature(shell), &mut novel);
    }

    // Step 7: fixpoint. Each freshly discovered expression is itself searched, at this same
    // structural level (unchanged `depth`); further discoveries append to the very `novel` list
    // being walked, so the loop naturally drains once nothing new appears.
    if opts.exhaustive {
        let mut i = 0;
        while i < novel.len() {
            let stored_root = table.flat_at(novel[i]).root;
            let sub_seed = Expression::with_default_signature(clone_deep(scope, stored_root));
            transform_step(scope, table, sub_seed, axiom, opts, depth, &mut novel);
            i += 1;
        }
    }

    // Step 8.
    pm.extend_from_slice(&novel);

    // Step 9: the per-child marker ranges were scaffolding for step 6 and must not survive into
    // the final set.
    for child_pm in &markers {
        table.clear(child_pm);
    }
}

/// Row-major Cartesian product of `lists`, generalizing reassembly to `n` operands instead of
/// just two. Empty if any input list is empty.
fn cartesian_product(lists: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut combos: Vec<Vec<usize>> = vec![Vec::new()];
    for list in lists {
        if list.is_empty() {
            return Vec::new();
        }
        let mut next = Vec::with_capacity(combos.len() * list.len());
        for combo in &combos {
            for &idx in list {
                let mut extended = combo.clone();
                extended.push(idx);
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}
