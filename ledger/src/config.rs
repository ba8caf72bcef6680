//! # Ledger Configuration & Constants
//!
//! Every magic number in Strata lives here. A constant hardcoded anywhere
//! else is a bug waiting for its second copy to drift.

/// Length of a block hash in lowercase hex characters. SHA-256 is 32 bytes,
/// so 64 characters — `validate` enforces this on every block it walks.
pub const HASH_HEX_LENGTH: usize = 64;

/// Index of the genesis block. The chain is 1-indexed: the first `push`
/// after construction lands at index 2.
pub const GENESIS_INDEX: u64 = 1;

/// The previous-hash sentinel carried by the genesis block: sixty-four
/// `'0'` characters. No block hashes to this value, which is the point.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Capacity of the per-chain broadcast channel that feeds live block
/// subscribers. Large enough to absorb append bursts; a subscriber that
/// falls further behind than this loses the oldest entries, not the chain.
pub const BLOCK_CHANNEL_CAPACITY: usize = 256;

/// Hash prefix treated as the proof-of-work difficulty marker by the
/// example feed filters and the node's notification stream. Strata does
/// not retarget difficulty; this is a fixed prefix.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Reward paid to the miner wallet for each mined block, in the smallest
/// unit of the reward currency.
pub const MINING_REWARD: u64 = 100;

/// Ledger protocol version, reported by the node's status surface.
pub const PROTOCOL_VERSION: &str = "0.1.0";
