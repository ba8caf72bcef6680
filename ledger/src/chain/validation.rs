//! # Validation Results
//!
//! Chain integrity outcomes are values, not exceptions. `validate()` hands
//! back a [`Validation`] and the caller decides whether a failure is worth
//! escalating — the network service maps it to an error response, a test
//! asserts on it, a batch job logs it and moves on.
//!
//! This is deliberately separate from the argument-validation path
//! ([`LedgerError`](crate::error::LedgerError)), which *does* use `Result`:
//! a malformed constructor call is the caller's bug and fails immediately,
//! while a broken chain is a discovered condition worth carrying around
//! as data.

use std::fmt;

use crate::error::LedgerError;

/// The outcome of a validation: either the validated subject, or the
/// reason it failed.
///
/// Combining results short-circuits on the first failure, so independent
/// checks compose left to right without nesting. Outcomes are plain
/// values — validating two chains concurrently produces two fully
/// independent `Validation`s.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Validation<T> {
    /// The subject passed every check.
    Success(T),
    /// The first check that failed, as a human-readable reason.
    Failure(String),
}

impl<T> Validation<T> {
    /// Wrap a validated subject.
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Record a failed check.
    pub fn failure(reason: impl Into<String>) -> Self {
        Validation::Failure(reason.into())
    }

    /// `true` for [`Validation::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// `true` for [`Validation::Failure`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The validated subject, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Validation::Success(v) => Some(v),
            Validation::Failure(_) => None,
        }
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Validation::Success(_) => None,
            Validation::Failure(r) => Some(r),
        }
    }

    /// Short-circuiting combination: the first failure wins, otherwise the
    /// second outcome is returned.
    pub fn and<U>(self, other: Validation<U>) -> Validation<U> {
        match self {
            Validation::Success(_) => other,
            Validation::Failure(reason) => Validation::Failure(reason),
        }
    }

    /// Transform the subject of a success; failures pass through untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Validation<U> {
        match self {
            Validation::Success(v) => Validation::Success(f(v)),
            Validation::Failure(reason) => Validation::Failure(reason),
        }
    }

    /// Convert to `Result` for promise-style callers that want a failed
    /// validation to become an error. The error message embeds the
    /// rendered outcome, e.g.
    /// `chain validation failed Failure (Hash length must equal 64)`.
    pub fn into_result(self) -> Result<T, LedgerError> {
        match self {
            Validation::Success(v) => Ok(v),
            Validation::Failure(reason) => {
                Err(LedgerError::ChainInvalid(format!("Failure ({reason})")))
            }
        }
    }
}

impl<T> fmt::Display for Validation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Success(_) => write!(f, "Success"),
            Validation::Failure(reason) => write!(f, "Failure ({reason})"),
        }
    }
}
