//! Error types.
//!
//! Grounded in `hycore::utils::error::HyError`: a `thiserror`-derived enum plus a `Result` alias.
//! `DoubleFree` is deliberately not a variant here: fatal conditions abort the process instead of
//! returning a value the caller could swallow; see [`crate::scope`].
use thiserror::Error;

use crate::symbol::Symbol;

#[derive(Debug, Error)]
pub enum OxError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("signature conflict on symbol {symbol}: bound to incompatible domains")]
    SignatureConflict { symbol: Symbol },

    #[error("arity mismatch for operation {op}: expected {expected}, found {found}")]
    ArityMismatch {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("unknown function {0:?}")]
    UnknownFunction(String),
}

pub type OxResult<T> = Result<T, OxError>;
