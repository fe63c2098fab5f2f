//! Customer agent: consumes one ticket per cycle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::pool::{RemoveOutcome, TicketPool};

/// Consumes tickets from the shared pool at a fixed cadence until stopped,
/// the pool shuts down, or the supply runs out.
pub struct Customer {
    id: u32,
    pool: Arc<TicketPool>,
    delay: Duration,
    running: Arc<AtomicBool>,
    purchased: Arc<AtomicU64>,
    stop_tx: broadcast::Sender<()>,
}

impl Customer {
    pub fn new(id: u32, pool: Arc<TicketPool>, delay: Duration) -> Self {
        let (stop_tx, _) = broadcast::channel(1);
        Self {
            id,
            pool,
            delay,
            running: Arc::new(AtomicBool::new(true)),
            purchased: Arc::new(AtomicU64::new(0)),
            stop_tx,
        }
    }

    /// Spawn the customer loop as an independent task.
    ///
    /// Each cycle removes one ticket (waiting while the pool is empty and
    /// more may arrive), then paces for the configured delay before counting
    /// the action as completed. The first remove has no preceding delay.
    pub fn spawn(&self) -> JoinHandle<()> {
        let id = self.id;
        let pool = Arc::clone(&self.pool);
        let delay = self.delay;
        let running = Arc::clone(&self.running);
        let purchased = Arc::clone(&self.purchased);
        let mut stop_rx = self.stop_tx.subscribe();

        tokio::spawn(async move {
            info!(customer_id = id, "customer started shopping for tickets");

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let outcome = tokio::select! {
                    _ = stop_rx.recv() => break,
                    outcome = pool.remove(id) => outcome,
                };
                match outcome {
                    RemoveOutcome::Delivered(ticket_id) => {
                        debug!(customer_id = id, ticket_id, "customer purchased ticket");
                    }
                    RemoveOutcome::Exhausted => {
                        debug!(customer_id = id, "ticket supply exhausted");
                        break;
                    }
                    RemoveOutcome::Stopped => break,
                }
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = sleep(delay) => {}
                }

                purchased.fetch_add(1, Ordering::SeqCst);
            }

            running.store(false, Ordering::SeqCst);
            info!(
                customer_id = id,
                purchased = purchased.load(Ordering::SeqCst),
                "customer finished"
            );
        })
    }

    /// Stop the customer, interrupting a blocked remove or pacing delay.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.stop_tx.send(());
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Completed purchase actions.
    pub fn tickets_purchased(&self) -> u64 {
        self.purchased.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
