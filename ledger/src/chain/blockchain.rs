//! # Chain Management
//!
//! An ordered, append-only collection of blocks, never empty — construction
//! installs the genesis block and nothing ever removes it.
//!
//! The contract is deliberately asymmetric:
//!
//! - [`push`](Blockchain::push) is **lax**. It appends whatever block it
//!   is handed, linkage unexamined, and fans it out to live subscribers.
//! - [`validate`](Blockchain::validate) is **strict**. It is the single
//!   authority on chain integrity, walking every consecutive pair and
//!   returning the first broken invariant as a
//!   [`Validation::Failure`].
//!
//! The gap between the two is intentional: a corrupted block can be pushed
//! (or an appended block corrupted in place through
//! [`top_mut`](Blockchain::top_mut)) and the damage only surfaces when
//! somebody asks. Do not "fix" this by validating on append.

use tokio::sync::broadcast;

use crate::chain::block::Block;
use crate::chain::stream::BlockFeed;
use crate::chain::validation::Validation;
use crate::config::{BLOCK_CHANNEL_CAPACITY, HASH_HEX_LENGTH};

/// The ledger: genesis first, tip last.
///
/// Reads (`height`, `top`, iteration, `validate`) are side-effect-free and
/// safe to interleave; `push` is the only state-advancing operation and
/// assumes a single logical writer. Independent instances share nothing —
/// corrupting one cannot affect another's validation outcome.
#[derive(Debug)]
pub struct Blockchain {
    blocks: Vec<Block>,
    block_tx: broadcast::Sender<Block>,
}

impl Blockchain {
    /// Create a chain holding exactly the genesis block. Infallible.
    pub fn new() -> Self {
        let (block_tx, _) = broadcast::channel(BLOCK_CHANNEL_CAPACITY);
        Self {
            blocks: vec![Block::genesis()],
            block_tx,
        }
    }

    /// Append a block to the tip and return a reference to it.
    ///
    /// No linkage checks happen here — see the module docs. The block is
    /// also delivered, in append order, to every live [`BlockFeed`]
    /// subscriber; delivery is fire-and-forget, so a slow or absent
    /// subscriber never blocks the append.
    pub fn push(&mut self, block: Block) -> &Block {
        tracing::debug!(index = block.index, "appending block");
        let position = self.blocks.len();
        self.blocks.push(block);
        let appended = &self.blocks[position];
        // Send fails only when no subscriber exists, which is fine.
        let _ = self.block_tx.send(appended.clone());
        appended
    }

    /// Number of blocks in the chain. Always at least 1.
    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    /// The most recently appended block.
    pub fn top(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Mutable access to the tip.
    ///
    /// This is a supported corruption hook, not a leak: integrity tests
    /// reach through it to break a field and then assert that
    /// [`validate`](Self::validate) notices. Nothing recomputes or guards
    /// behind your back.
    pub fn top_mut(&mut self) -> &mut Block {
        self.blocks
            .last_mut()
            .expect("chain always holds the genesis block")
    }

    /// All blocks, genesis to tip.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterate from genesis to tip. Restartable; each call observes the
    /// chain length at the moment it starts.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Walk every consecutive pair once and report the first broken
    /// invariant, or `Success` wrapping the chain.
    ///
    /// Per pair `(previous, current)`, in order:
    ///
    /// 1. `current.hash()` must be 64 characters;
    /// 2. `current.previous_hash` must equal `previous.hash()`;
    /// 3. `current.index` must be `previous.index + 1`.
    ///
    /// Hashes are re-derived during the walk, so any mutation since the
    /// last call is observed. Side-effect-free and idempotent: calling it
    /// repeatedly on an unmodified chain yields the same outcome.
    pub fn validate(&self) -> Validation<&Blockchain> {
        for position in 1..self.blocks.len() {
            let previous = &self.blocks[position - 1];
            let current = &self.blocks[position];

            if current.hash().len() != HASH_HEX_LENGTH {
                return Validation::failure("Hash length must equal 64");
            }
            if current.previous_hash != previous.hash() {
                return Validation::failure(format!(
                    "Previous hash at position {} does not match the hash of position {}",
                    position,
                    position - 1
                ));
            }
            if current.index != previous.index + 1 {
                return Validation::failure(format!(
                    "Index at position {} must be one greater than its predecessor",
                    position
                ));
            }
        }
        Validation::success(self)
    }

    /// Subscribe to blocks appended from this moment on.
    ///
    /// The returned feed yields each subsequently pushed block in append
    /// order and never completes while the chain is alive. There is no
    /// replay of blocks appended before the subscription. Any number of
    /// independent subscribers may be active at once.
    pub fn subscribe(&self) -> BlockFeed {
        BlockFeed::new(self.block_tx.subscribe())
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Blockchain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a block correctly linked to the current tip, the way the
    /// mining service does it.
    fn linked_block(chain: &Blockchain) -> Block {
        Block::new(chain.top().index + 1, chain.top().hash(), vec![]).unwrap()
    }

    #[test]
    fn new_chain_is_genesis_only() {
        let chain = Blockchain::new();
        assert_eq!(chain.height(), 1);
        assert_eq!(chain.top().index, 1);
        assert_eq!(chain.top().previous_hash, "0".repeat(64));
    }

    #[test]
    fn first_push_lands_at_index_two() {
        let mut chain = Blockchain::new();
        let block = linked_block(&chain);
        let top = chain.push(block);
        assert_eq!(top.index, 2);
        assert_eq!(chain.height(), 2);
    }

    #[test]
    fn push_does_not_enforce_linkage() {
        let mut chain = Blockchain::new();
        // Wrong index, previous hash pointing nowhere — push takes it anyway.
        let stray = Block::new(41, "f".repeat(64), vec![]).unwrap();
        chain.push(stray);
        assert_eq!(chain.height(), 2);
        // The damage surfaces only on validate.
        assert!(chain.validate().is_failure());
    }

    #[test]
    fn valid_chain_of_three_validates() {
        let mut chain = Blockchain::new();
        let b = linked_block(&chain);
        chain.push(b);
        let b = linked_block(&chain);
        chain.push(b);
        assert_eq!(chain.height(), 3);
        assert!(!chain.validate().is_failure());
    }

    #[test]
    fn validate_is_idempotent() {
        let mut chain = Blockchain::new();
        let b = linked_block(&chain);
        chain.push(b);
        let first = chain.validate().is_success();
        let second = chain.validate().is_success();
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn tampered_index_fails_validation() {
        let mut chain = Blockchain::new();
        let b = linked_block(&chain);
        chain.push(b);
        let b = linked_block(&chain);
        chain.push(b);

        chain.top_mut().index = 0;
        let outcome = chain.validate();
        assert!(outcome.is_failure());
    }

    #[test]
    fn tampered_hash_length_reports_the_reason() {
        let mut chain = Blockchain::new();
        let b = linked_block(&chain);
        chain.push(b);
        chain.top_mut().set_hash("XXXXXXX");

        let outcome = chain.validate();
        assert!(outcome.is_failure());
        assert!(outcome
            .reason()
            .unwrap()
            .contains("Hash length must equal 64"));
    }

    #[test]
    fn tampered_payload_breaks_linkage_of_successor() {
        let mut chain = Blockchain::new();
        let b = linked_block(&chain);
        chain.push(b);
        let b = linked_block(&chain);
        chain.push(b);

        // Mutate the middle block; its derived hash changes, so the tip's
        // previous_hash no longer matches.
        chain.blocks[1].timestamp_ms += 1;
        let outcome = chain.validate();
        assert!(outcome.is_failure());
        assert!(outcome.reason().unwrap().contains("Previous hash"));
    }

    #[test]
    fn iteration_covers_genesis_to_tip_in_order() {
        let mut chain = Blockchain::new();
        let b = linked_block(&chain);
        chain.push(b);
        let b = linked_block(&chain);
        chain.push(b);

        let indices: Vec<u64> = (&chain).into_iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        // Restartable: a second traversal replays from genesis.
        let again: Vec<u64> = chain.iter().map(|b| b.index).collect();
        assert_eq!(again, indices);
    }

    #[test]
    fn independent_chains_are_isolated() {
        let mut healthy = Blockchain::new();
        let b = linked_block(&healthy);
        healthy.push(b);

        let mut corrupted = Blockchain::new();
        let b = linked_block(&corrupted);
        corrupted.push(b);
        corrupted.top_mut().set_hash("XXXXXXX");

        assert!(healthy.validate().is_success());
        assert!(corrupted.validate().is_failure());
        // And the healthy chain still validates after the other failed.
        assert!(healthy.validate().is_success());
    }

    #[test]
    fn validate_returns_the_chain_on_success() {
        let chain = Blockchain::new();
        let outcome = chain.validate();
        let subject = outcome.value().expect("fresh chain is valid");
        assert_eq!(subject.height(), 1);
    }
}
