//! The ledger core: blocks, the chain that owns them, the Success/Failure
//! validation type, and the live block feed.

pub mod block;
pub mod blockchain;
pub mod stream;
pub mod validation;

pub use block::Block;
pub use blockchain::Blockchain;
pub use stream::{BlockFeed, Subscription};
pub use validation::Validation;
