//! The exhaustive transform search's deduplication table.
//!
//! A two-level open-addressed structure: `buckets` rows, each holding up to
//! `slots_per_bucket` [`Expression`]s. [`quick_hash`] routes a candidate to a row; linear
//! probing within the row resolves collisions by structural equality, so two structurally equal
//! expressions always collapse to one slot no matter how many times either is pushed.
use smallvec::SmallVec;

use crate::equality::equal;
use crate::expression::Expression;
use crate::scope::{NodeRef, Scope};

/// Tuning knobs for [`DedupTable`]. Bucket overflow is a diagnostic and a tuning knob to react
/// to, not a correctness error.
#[derive(Debug, Clone, Copy)]
pub struct DedupTableConfig {
    /// `M`: number of hash buckets.
    pub buckets: usize,
    /// `N`: slots per bucket.
    pub slots_per_bucket: usize,
}

impl Default for DedupTableConfig {
    /// Generous enough that the crate's own worked test scenarios never overflow a single row.
    fn default() -> Self {
        Self {
            buckets: 61,
            slots_per_bucket: 8,
        }
    }
}

/// Result of [`DedupTable::push`]. Exposing this instead of silently discarding overflowed
/// candidates lets a caller react to row pressure instead of losing candidates unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The expression was new; it now occupies a slot and its flat index was appended to `pm`.
    Inserted,
    /// A structurally equal expression already occupied a slot in this row; `pm` is unchanged.
    Duplicate,
    /// Every slot in the candidate's row was occupied by an unequal expression.
    Overflow,
}

/// The dedup table itself. Owns an internal [`Scope`] into which every expression it ever stores
/// or discards is dropped, so a whole `transform` call's allocations are accounted for in one
/// place.
pub struct DedupTable<'s> {
    scope: Scope<'s>,
    buckets: usize,
    slots_per_bucket: usize,
    slots: Vec<Option<Expression<'s>>>,
    unique: usize,
}

impl<'s> DedupTable<'s> {
    pub fn new(scope: Scope<'s>, config: DedupTableConfig) -> Self {
        let slots = (0..config.buckets * config.slots_per_bucket)
            .map(|_| None)
            .collect();
        Self {
            scope,
            buckets: config.buckets,
            slots_per_bucket: config.slots_per_bucket,
            slots,
            unique: 0,
        }
    }

    /// Insert `expr`, or discover it is already present. On success the flat slot index is
    /// appended to `pm`; on [`PushOutcome::Duplicate`] or [`PushOutcome::Overflow`] `expr`'s tree
    /// is immediately retired through the table's internal scope, since the table will never
    /// reference it.
    pub fn push(&mut self, expr: Expression<'s>, pm: &mut Vec<usize>) -> PushOutcome {
        let bucket = (quick_hash(expr.root) as usize) % self.buckets;
        for slot in 0..self.slots_per_bucket {
            let flat = bucket * self.slots_per_bucket + slot;
            match &self.slots[flat] {
                None => {
                    pm.push(flat);
                    self.unique += 1;
                    self.slots[flat] = Some(expr);
                    return PushOutcome::Inserted;
                }
                Some(existing) if equal(existing.root, expr.root) => {
                    self.scope.drop_node(expr.root);
                    return PushOutcome::Duplicate;
                }
                Some(_) => {}
            }
        }
        self.scope.drop_node(expr.root);
        PushOutcome::Overflow
    }

    /// The expression stored at flat index `i`. Panics if `i` names an empty slot: callers only
    /// ever pass indices they (or `push`) just recorded.
    pub fn flat_at(&self, i: usize) -> &Expression<'s> {
        self.slots[i]
            .as_ref()
            .expect("flat_at: slot is not occupied")
    }

    /// Invalidate every index in `pm`, retiring its tree and decrementing the unique count.
    /// Idempotent per index: clearing an already-empty slot is a no-op, which the transform
    /// engine relies on when it clears indices it holds.
    pub fn clear(&mut self, pm: &[usize]) {
        for &i in pm {
            if let Some(expr) = self.slots[i].take() {
                self.scope.drop_node(expr.root);
                self.unique -= 1;
            }
        }
    }

    pub fn unique(&self) -> usize {
        self.unique
    }

    pub fn row_occupancy(&self, bucket: usize) -> usize {
        let start = bucket * self.slots_per_bucket;
        self.slots[start..start + self.slots_per_bucket]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    pub fn slots_per_bucket(&self) -> usize {
        self.slots_per_bucket
    }
}

/// `quick_hash(tree)`: combine three depth-limited structural hashes by rotation. Two trees
/// differing anywhere within depth 2 of the root almost always hash differently; two structurally
/// equal trees always hash identically, which [`crate::equality::equal`] relies on for
/// consistency.
pub fn quick_hash<'s>(node: NodeRef<'s>) -> u32 {
    let h0 = hash_to_depth(node, 0);
    let h1 = hash_to_depth(node, 1);
    let h2 = hash_to_depth(node, 2);
    h1.rotate_right(h0 % 7) | h2.rotate_left(h0 % 11)
}

/// `hashN(tree)`: leaves hash their atom regardless of depth; an interior node seeds with its
/// operation and, while `depth > 0`, XORs in each operand's hash (recursing at `depth - 1`) and
/// increments the running seed after each operand to break symmetry across operand order. At
/// `depth == 0` an interior node's hash is its operation's seed alone.
fn hash_to_depth<'s>(node: NodeRef<'s>, depth: u32) -> u32 {
    match node.atom() {
        Some(atom) => atom.hash_seed(),
        None => {
            let mut seed = node.operation().unwrap().hash_seed();
            if depth == 0 {
                return seed;
            }
            let children: SmallVec<[NodeRef<'s>; 8]> = node.down().unwrap().chain().collect();
            for child in children {
                seed ^= hash_to_depth(child, depth - 1);
                seed = seed.wrapping_add(1);
            }
            seed
        }
    }
}
