//! `Statement`: a comparison between two expressions, plus its merged signature.
use crate::domain::{merge_signatures, Signature};
use crate::error::OxError;
use crate::expression::Expression;
use crate::symbol::Symbol;

/// The relational token joining a statement's two sides. Spec §6 describes comparator tokens as
/// "looked up dynamically by literal string" by the (out of scope) parser; `Custom` carries
/// whatever symbol the driver interned for a comparator this crate does not name explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Custom(Symbol),
}

pub struct Statement<'s> {
    pub lhs: Expression<'s>,
    pub rhs: Expression<'s>,
    pub comparator: Comparator,
    pub signature: Signature,
}

impl<'s> Statement<'s> {
    /// Build a statement, merging `lhs` and `rhs`'s signatures. Fails with
    /// [`OxError::SignatureConflict`] if a symbol shared by both sides disagrees on domain.
    pub fn new(
        lhs: Expression<'s>,
        rhs: Expression<'s>,
        comparator: Comparator,
    ) -> Result<Self, OxError> {
        let signature = merge_signatures(&lhs.signature, &rhs.signature)?;
        Ok(Self {
            lhs,
            rhs,
            comparator,
            signature,
        })
    }

    pub fn is_equality(&self) -> bool {
        self.comparator == Comparator::Equal
    }
}
