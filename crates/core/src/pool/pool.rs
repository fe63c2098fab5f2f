//! Ticket pool implementation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{debug, info, trace};

use super::types::{PoolStats, RemoveOutcome, TicketId};

/// State guarded by the pool lock. Mutated only inside a single critical
/// section per operation, never across an await.
struct PoolState {
    tickets: VecDeque<TicketId>,
    next_id: TicketId,
    total_added: u32,
}

/// Bounded, finite-supply FIFO queue shared by all agents of a run.
///
/// `add` and `remove` are async and cancellation-safe: dropping an in-flight
/// call leaves the pool exactly as if the call had returned early, because
/// every mutation happens under the lock with no suspension point inside.
pub struct TicketPool {
    state: Mutex<PoolState>,
    max_capacity: u32,
    total_tickets: u32,
    /// Readable without the lock for fast-path short-circuiting; any decision
    /// that also touches the queue re-checks it under the lock.
    running: AtomicBool,
    not_full: Notify,
    not_empty: Notify,
}

impl TicketPool {
    /// Create a pool holding at most `max_capacity` tickets at once and
    /// issuing at most `total_tickets` over its lifetime.
    pub fn new(max_capacity: u32, total_tickets: u32) -> Self {
        Self {
            state: Mutex::new(PoolState {
                tickets: VecDeque::new(),
                next_id: 0,
                total_added: 0,
            }),
            max_capacity,
            total_tickets,
            running: AtomicBool::new(true),
            not_full: Notify::new(),
            not_empty: Notify::new(),
        }
    }

    /// Insert up to `amount` tickets, waiting while the pool is full.
    ///
    /// Returns `false` without inserting anything if the pool has been shut
    /// down or the supply limit is already reached. Otherwise inserts
    /// `min(amount, remaining supply, remaining room)` tickets with strictly
    /// increasing identifiers and returns `true`.
    pub async fn add(&self, vendor_id: u32, amount: u32) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            return false;
        }

        let notified = self.not_full.notified();
        tokio::pin!(notified);

        loop {
            // Register interest before checking the predicate so a wake
            // landing between the check and the await is not lost.
            notified.as_mut().enable();

            {
                let mut state = self.locked();

                if !self.running.load(Ordering::SeqCst) {
                    return false;
                }
                if state.total_added >= self.total_tickets {
                    return false;
                }

                let queued = state.tickets.len() as u32;
                if queued < self.max_capacity {
                    let remaining = self.total_tickets - state.total_added;
                    let room = self.max_capacity - queued;
                    let to_add = amount.min(remaining).min(room);

                    for _ in 0..to_add {
                        state.next_id += 1;
                        let ticket_id = state.next_id;
                        state.tickets.push_back(ticket_id);
                        state.total_added += 1;
                        debug!(
                            vendor_id,
                            ticket_id,
                            available = state.tickets.len(),
                            "ticket added to pool"
                        );
                    }

                    drop(state);
                    self.not_empty.notify_waiters();
                    return true;
                }
            }

            trace!(vendor_id, "pool full, vendor waiting for space");
            notified.as_mut().await;
            notified.set(self.not_full.notified());
        }
    }

    /// Remove the ticket at the head of the queue, waiting while the pool is
    /// empty and more tickets may still arrive.
    ///
    /// Returns [`RemoveOutcome::Stopped`] after shutdown and
    /// [`RemoveOutcome::Exhausted`] once the supply limit is reached with the
    /// queue drained; both return without waiting.
    pub async fn remove(&self, customer_id: u32) -> RemoveOutcome {
        if !self.running.load(Ordering::SeqCst) {
            return RemoveOutcome::Stopped;
        }

        let notified = self.not_empty.notified();
        tokio::pin!(notified);

        loop {
            notified.as_mut().enable();

            {
                let mut state = self.locked();

                if !self.running.load(Ordering::SeqCst) {
                    return RemoveOutcome::Stopped;
                }

                if let Some(ticket_id) = state.tickets.pop_front() {
                    debug!(
                        customer_id,
                        ticket_id,
                        available = state.tickets.len(),
                        "ticket removed from pool"
                    );
                    drop(state);
                    self.not_full.notify_waiters();
                    return RemoveOutcome::Delivered(ticket_id);
                }

                if state.total_added >= self.total_tickets {
                    return RemoveOutcome::Exhausted;
                }
            }

            trace!(customer_id, "pool empty, customer waiting for tickets");
            notified.as_mut().await;
            notified.set(self.not_empty.notified());
        }
    }

    /// Stop the pool and wake every task blocked in `add` or `remove`.
    ///
    /// One-shot: a stopped pool never runs again. Calling this on an already
    /// stopped pool is a no-op apart from redundant (harmless) wakes.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("ticket pool shutting down");
        }
        self.not_full.notify_waiters();
        self.not_empty.notify_waiters();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Tickets currently queued.
    pub fn available(&self) -> u32 {
        self.locked().tickets.len() as u32
    }

    /// Tickets ever added to the pool.
    pub fn total_added(&self) -> u32 {
        self.locked().total_added
    }

    pub fn supply_limit(&self) -> u32 {
        self.total_tickets
    }

    pub fn capacity(&self) -> u32 {
        self.max_capacity
    }

    /// True once the full supply has been issued and the queue is drained,
    /// the natural end of a run as opposed to a manual shutdown.
    pub fn all_supply_retrieved(&self) -> bool {
        let state = self.locked();
        state.total_added >= self.total_tickets && state.tickets.is_empty()
    }

    /// One consistent snapshot of all counters.
    pub fn stats(&self) -> PoolStats {
        let state = self.locked();
        PoolStats {
            available: state.tickets.len() as u32,
            total_added: state.total_added,
            supply_limit: self.total_tickets,
            capacity: self.max_capacity,
            running: self.running.load(Ordering::SeqCst),
        }
    }

    // No code panics while holding the lock, so poisoning can only come from
    // a panic in test code; recover the guard rather than propagate it.
    fn locked(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_add_assigns_increasing_ids() {
        let pool = TicketPool::new(10, 10);
        assert!(pool.add(1, 3).await);
        assert!(pool.add(2, 2).await);

        for expected in 1..=5 {
            assert_eq!(pool.remove(1).await, RemoveOutcome::Delivered(expected));
        }
    }

    #[tokio::test]
    async fn test_add_caps_at_supply_limit() {
        let pool = TicketPool::new(100, 10);
        // Asking for more than the supply inserts only what is left.
        assert!(pool.add(1, 25).await);
        assert_eq!(pool.total_added(), 10);
        assert_eq!(pool.available(), 10);

        // Supply exhausted: further adds are refused without blocking.
        assert!(!pool.add(1, 1).await);
        assert_eq!(pool.total_added(), 10);
    }

    #[tokio::test]
    async fn test_add_caps_at_capacity() {
        let pool = TicketPool::new(5, 100);
        assert!(pool.add(1, 20).await);
        assert_eq!(pool.available(), 5);
        assert_eq!(pool.total_added(), 5);
    }

    #[tokio::test]
    async fn test_add_blocks_while_full_until_remove() {
        let pool = Arc::new(TicketPool::new(2, 10));
        assert!(pool.add(1, 2).await);

        let blocked = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.add(1, 1).await })
        };

        // The add cannot complete while the pool is full.
        tokio::task::yield_now().await;
        assert!(!blocked.is_finished());

        assert_eq!(pool.remove(1).await, RemoveOutcome::Delivered(1));

        let accepted = timeout(Duration::from_secs(1), blocked)
            .await
            .expect("blocked add did not wake after remove")
            .unwrap();
        assert!(accepted);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_remove_blocks_until_add() {
        let pool = Arc::new(TicketPool::new(10, 10));

        let blocked = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.remove(1).await })
        };

        tokio::task::yield_now().await;
        assert!(!blocked.is_finished());

        assert!(pool.add(1, 1).await);

        let outcome = timeout(Duration::from_secs(1), blocked)
            .await
            .expect("blocked remove did not wake after add")
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::Delivered(1));
    }

    #[tokio::test]
    async fn test_remove_exhausted_returns_without_blocking() {
        let pool = TicketPool::new(10, 10);
        assert!(pool.add(1, 10).await);
        for _ in 0..10 {
            assert!(matches!(
                pool.remove(1).await,
                RemoveOutcome::Delivered(_)
            ));
        }

        assert!(pool.all_supply_retrieved());
        assert_eq!(pool.remove(1).await, RemoveOutcome::Exhausted);
        // Still running: exhaustion is not a shutdown.
        assert!(pool.is_running());
    }

    #[tokio::test]
    async fn test_shutdown_wakes_blocked_remove() {
        let pool = Arc::new(TicketPool::new(10, 10));

        let blocked = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.remove(1).await })
        };
        tokio::task::yield_now().await;

        pool.shutdown();

        let outcome = timeout(Duration::from_secs(1), blocked)
            .await
            .expect("blocked remove did not wake on shutdown")
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::Stopped);
    }

    #[tokio::test]
    async fn test_shutdown_wakes_blocked_add() {
        let pool = Arc::new(TicketPool::new(1, 10));
        assert!(pool.add(1, 1).await);

        let blocked = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.add(1, 1).await })
        };
        tokio::task::yield_now().await;

        pool.shutdown();

        let accepted = timeout(Duration::from_secs(1), blocked)
            .await
            .expect("blocked add did not wake on shutdown")
            .unwrap();
        assert!(!accepted);
        // No partial insert happened after the shutdown.
        assert_eq!(pool.total_added(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let pool = TicketPool::new(10, 10);
        pool.shutdown();
        pool.shutdown();
        assert!(!pool.is_running());
        assert!(!pool.add(1, 1).await);
        assert_eq!(pool.remove(1).await, RemoveOutcome::Stopped);
    }

    #[test]
    fn test_stats_snapshot() {
        let pool = TicketPool::new(20, 50);
        tokio_test::block_on(async {
            assert!(pool.add(1, 7).await);
            assert!(matches!(pool.remove(1).await, RemoveOutcome::Delivered(1)));
        });

        let stats = pool.stats();
        assert_eq!(stats.available, 6);
        assert_eq!(stats.total_added, 7);
        assert_eq!(stats.supply_limit, 50);
        assert_eq!(stats.capacity, 20);
        assert!(stats.running);
    }

    #[tokio::test]
    async fn test_cancelled_add_leaves_pool_consistent() {
        let pool = Arc::new(TicketPool::new(1, 10));
        assert!(pool.add(1, 1).await);

        // Drop a blocked add mid-wait, as an agent stop would.
        let blocked = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.add(2, 1).await })
        };
        tokio::task::yield_now().await;
        blocked.abort();
        let _ = blocked.await;

        assert_eq!(pool.total_added(), 1);
        assert_eq!(pool.available(), 1);

        // The pool keeps working for everyone else.
        assert_eq!(pool.remove(1).await, RemoveOutcome::Delivered(1));
        assert!(pool.add(3, 1).await);
        assert_eq!(pool.remove(1).await, RemoveOutcome::Delivered(2));
    }
}
