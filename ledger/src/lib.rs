// Copyright (c) 2026 Strata Contributors. MIT License.
// See LICENSE for details.

//! # Strata Ledger — Core Library
//!
//! An append-only, hash-linked ledger: an ordered sequence of immutable-ish
//! blocks where every block cryptographically commits to its predecessor.
//! The interesting engineering lives in two places — keeping the linkage
//! invariants honest (`validate`) and observing the chain as it grows
//! (the live block feed). Everything else is a thin collaborator.
//!
//! ## Architecture
//!
//! - **chain** — Block, Blockchain, the Success/Failure validation type,
//!   and the live block stream. The core of the crate.
//! - **crypto** — SHA-256 digests and Ed25519 keys. Nothing exotic.
//! - **wallet** — Wallet, Money, and Transaction value objects. The chain
//!   treats transactions as inert payload; these exist for the callers
//!   that mine and sign.
//! - **perf** — A transparent decorator that times `validate` without
//!   changing what it returns.
//! - **config** — Protocol constants. One place, no exceptions.
//!
//! ## Design Philosophy
//!
//! 1. Appending is lax, validating is strict. `push` accepts what you give
//!    it; `validate` is the single authority on chain integrity. Corruption
//!    is discoverable, never silently rejected.
//! 2. Validation failures are data (`Validation::Failure`), not panics and
//!    not `Err`. Callers decide how loud to be about them.
//! 3. A slow stream subscriber never slows down the chain.

pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod perf;
pub mod wallet;

pub use chain::block::Block;
pub use chain::blockchain::Blockchain;
pub use chain::stream::{BlockFeed, Subscription};
pub use chain::validation::Validation;
pub use error::LedgerError;
