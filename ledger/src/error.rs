//! Error types for the Strata ledger.
//!
//! Two very different failure families live here, on purpose:
//!
//! - Malformed constructor input (`InvalidPreviousHash`, `InvalidIndex`)
//!   surfaces immediately as an `Err` from the constructing call.
//! - Chain-integrity problems are *not* errors at all — they are
//!   [`Validation::Failure`](crate::chain::validation::Validation) values
//!   returned by `validate()`. The [`LedgerError::ChainInvalid`] variant
//!   exists only for callers that explicitly convert a failed validation
//!   into `Result` land via `Validation::into_result`.

use thiserror::Error;

/// Errors surfaced by ledger constructors and `Result`-converted validations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A block was constructed with a previous hash of the wrong length.
    #[error("previous hash must be exactly {expected} characters, got {got}")]
    InvalidPreviousHash {
        /// Required hex length (always 64).
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// A block was constructed with a non-positive index.
    #[error("block index must be a positive integer, got {0}")]
    InvalidIndex(u64),

    /// A failed validation, rendered. Produced only by
    /// `Validation::into_result`; `validate()` itself never returns `Err`.
    #[error("chain validation failed {0}")]
    ChainInvalid(String),
}
