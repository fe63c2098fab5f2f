//! Vendor agent: produces one ticket per cycle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::info;

use crate::pool::TicketPool;

/// Produces tickets into the shared pool at a fixed cadence until stopped or
/// the supply is exhausted.
pub struct Vendor {
    id: u32,
    pool: Arc<TicketPool>,
    delay: Duration,
    running: Arc<AtomicBool>,
    produced: Arc<AtomicU64>,
    stop_tx: broadcast::Sender<()>,
}

impl Vendor {
    pub fn new(id: u32, pool: Arc<TicketPool>, delay: Duration) -> Self {
        let (stop_tx, _) = broadcast::channel(1);
        Self {
            id,
            pool,
            delay,
            running: Arc::new(AtomicBool::new(true)),
            produced: Arc::new(AtomicU64::new(0)),
            stop_tx,
        }
    }

    /// Spawn the vendor loop as an independent task.
    ///
    /// Each cycle adds one ticket (waiting while the pool is full), then
    /// paces for the configured delay before counting the action as
    /// completed. The first add has no preceding delay.
    pub fn spawn(&self) -> JoinHandle<()> {
        let id = self.id;
        let pool = Arc::clone(&self.pool);
        let delay = self.delay;
        let running = Arc::clone(&self.running);
        let produced = Arc::clone(&self.produced);
        let mut stop_rx = self.stop_tx.subscribe();

        tokio::spawn(async move {
            info!(vendor_id = id, "vendor started providing tickets");

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let accepted = tokio::select! {
                    _ = stop_rx.recv() => break,
                    accepted = pool.add(id, 1) => accepted,
                };
                if !accepted || !running.load(Ordering::SeqCst) {
                    break;
                }

                // The pacing wait is cancellable too: a stop arriving here
                // ends the cycle without waiting out the full delay.
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = sleep(delay) => {}
                }

                produced.fetch_add(1, Ordering::SeqCst);
            }

            running.store(false, Ordering::SeqCst);
            info!(
                vendor_id = id,
                produced = produced.load(Ordering::SeqCst),
                "vendor finished"
            );
        })
    }

    /// Stop the vendor, interrupting a blocked add or pacing delay.
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

    /// Completed produce actions.
    pub fn tickets_produced(&self) -> u64 {
        self.produced.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
