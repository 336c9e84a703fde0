//! Numeric domains and the per-expression `Signature` mapping symbols to them.
use std::collections::HashMap;

use crate::error::OxError;
use crate::symbol::Symbol;

/// The domain a free symbol is presumed to range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Domain {
    Integer,
    Rational,
    Real,
    Complex,
}

/// Maps each free symbol appearing in an expression or statement to the domain it ranges over.
pub type Signature = HashMap<Symbol, Domain>;

/// Merge two signatures, as required when combining a statement's `lhs` and `rhs`. A symbol
/// present in both must agree on domain; disagreement is a [`OxError::SignatureConflict`], not a
/// panic, since it reflects a malformed statement the driver handed us rather than an internal
/// invariant violation.
pub fn merge_signatures(a: &Signature, b: &Signature) -> Result<Signature, OxError> {
    let mut out = a.clone();
    for (sym, domain) in b {
        match out.get(sym) {
            Some(existing) if existing != domain => {
                return Err(OxError::SignatureConflict { symbol: *sym });
            }
            Some(_) => {}
            None => {
                out.insert(*sym, *domain);
            }
        }
    }
    Ok(out)
}

/// The default domain assigned to a symbol whose constraint is not otherwise known: real, for
/// any symbol not otherwise constrained.
pub fn default_domain() -> Domain {
    Domain::Real
}
