//! # Live Block Feed
//!
//! Bridges the chain's append notifications to a push/subscribe surface.
//! A [`BlockFeed`] is an unbounded, cancellable stream of the blocks
//! appended *after* the subscription was created, in append order.
//!
//! Delivery is decoupled from the appender: each subscriber reads its own
//! cursor over a broadcast channel, and a subscriber that falls too far
//! behind loses its oldest undelivered blocks rather than slowing `push`
//! down. Lag is logged and skipped — the feed never surfaces a per-block
//! error; anything wrong with a block is `validate()`'s business.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::chain::block::Block;

type Predicate = Box<dyn FnMut(&Block) -> bool + Send>;

/// A live, filterable stream of newly appended blocks.
///
/// Created by [`Blockchain::subscribe`](crate::chain::blockchain::Blockchain::subscribe).
/// Never completes while the chain is alive; drop the feed (or the
/// [`Subscription`] driving it) to stop receiving. Blocks appended before
/// the subscription are not replayed.
pub struct BlockFeed {
    inner: BroadcastStream<Block>,
    predicate: Option<Predicate>,
}

impl BlockFeed {
    pub(crate) fn new(rx: broadcast::Receiver<Block>) -> Self {
        Self {
            inner: BroadcastStream::new(rx),
            predicate: None,
        }
    }

    /// Keep only blocks matching `predicate`. Filters compose: calling
    /// this twice keeps blocks matching both.
    ///
    /// The canonical use is dropping already-mined-looking blocks:
    ///
    /// ```no_run
    /// use strata_ledger::{config::DIFFICULTY_PREFIX, Blockchain};
    ///
    /// let chain = Blockchain::new();
    /// let feed = chain
    ///     .subscribe()
    ///     .filter_blocks(|b| !b.previous_hash.starts_with(DIFFICULTY_PREFIX));
    /// ```
    pub fn filter_blocks<P>(mut self, predicate: P) -> Self
    where
        P: FnMut(&Block) -> bool + Send + 'static,
    {
        self.predicate = match self.predicate.take() {
            None => Some(Box::new(predicate)),
            Some(mut first) => {
                let mut second = predicate;
                Some(Box::new(move |block: &Block| first(block) && second(block)))
            }
        };
        self
    }

    /// Await the next matching block. `None` once the chain (and with it
    /// the sending side) has been dropped.
    pub async fn recv(&mut self) -> Option<Block> {
        self.next().await
    }

    /// Drive the feed on a background task, handing each matching block
    /// to `handler`. The returned [`Subscription`] cancels delivery when
    /// unsubscribed or dropped.
    pub fn forward_to<F>(self, mut handler: F) -> Subscription
    where
        F: FnMut(Block) + Send + 'static,
    {
        let mut feed = self;
        let task = tokio::spawn(async move {
            while let Some(block) = feed.recv().await {
                handler(block);
            }
        });
        Subscription { task }
    }
}

impl Stream for BlockFeed {
    type Item = Block;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(block))) => {
                    let matches = match this.predicate.as_mut() {
                        Some(predicate) => predicate(&block),
                        None => true,
                    };
                    if matches {
                        return Poll::Ready(Some(block));
                    }
                    // Filtered out; poll for the next one.
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    tracing::warn!(skipped, "block feed lagged; skipping missed blocks");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Handle to a running [`BlockFeed::forward_to`] delivery task.
///
/// Unsubscribing (or dropping the handle) cancels the task: the handler
/// sees no further blocks, other subscribers are untouched, and the chain
/// itself doesn't notice.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stop delivery now.
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::blockchain::Blockchain;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn linked_block(chain: &Blockchain) -> Block {
        Block::new(chain.top().index + 1, chain.top().hash(), vec![]).unwrap()
    }

    #[tokio::test]
    async fn delivers_appended_blocks_in_order() {
        let mut chain = Blockchain::new();
        let mut feed = chain.subscribe();

        for _ in 0..3 {
            let block = linked_block(&chain);
            chain.push(block);
        }

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(feed.recv().await.unwrap().index);
        }
        assert_eq!(seen, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn no_replay_of_pre_subscription_blocks() {
        let mut chain = Blockchain::new();
        let early = linked_block(&chain);
        chain.push(early);

        let mut feed = chain.subscribe();
        let late = linked_block(&chain);
        chain.push(late);

        // Only the post-subscription block arrives.
        assert_eq!(feed.recv().await.unwrap().index, 3);
    }

    #[tokio::test]
    async fn filter_drops_non_matching_blocks() {
        let mut chain = Blockchain::new();
        let mut feed = chain
            .subscribe()
            .filter_blocks(|block| block.index % 2 == 0);

        for _ in 0..4 {
            let block = linked_block(&chain);
            chain.push(block);
        }
        // Indices pushed: 2, 3, 4, 5 — only the even ones pass.
        assert_eq!(feed.recv().await.unwrap().index, 2);
        assert_eq!(feed.recv().await.unwrap().index, 4);
    }

    #[tokio::test]
    async fn multiple_subscribers_each_see_every_block() {
        let mut chain = Blockchain::new();
        let mut feed_a = chain.subscribe();
        let mut feed_b = chain.subscribe();

        let block = linked_block(&chain);
        chain.push(block);

        assert_eq!(feed_a.recv().await.unwrap().index, 2);
        assert_eq!(feed_b.recv().await.unwrap().index, 2);
    }

    #[tokio::test]
    async fn unsubscribed_handler_receives_nothing_further() {
        let mut chain = Blockchain::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&delivered);

        let subscription = chain.subscribe().forward_to(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let block = linked_block(&chain);
        chain.push(block);
        // Let the delivery task run.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let before = delivered.load(Ordering::SeqCst);
        assert_eq!(before, 1);

        subscription.unsubscribe();
        let block = linked_block(&chain);
        chain.push(block);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn unsubscribe_leaves_other_subscribers_running() {
        let mut chain = Blockchain::new();
        let muted = chain.subscribe().forward_to(|_| {});
        let mut live = chain.subscribe();

        muted.unsubscribe();
        let block = linked_block(&chain);
        chain.push(block);

        assert_eq!(live.recv().await.unwrap().index, 2);
    }

    #[tokio::test]
    async fn push_never_blocks_on_absent_consumption() {
        let mut chain = Blockchain::new();
        let _feed = chain.subscribe(); // subscribed, never read

        // Push far more than the channel capacity; push must not stall.
        for _ in 0..(crate::config::BLOCK_CHANNEL_CAPACITY + 16) {
            let block = linked_block(&chain);
            chain.push(block);
        }
        assert_eq!(chain.height(), crate::config::BLOCK_CHANNEL_CAPACITY + 17);
    }
}
