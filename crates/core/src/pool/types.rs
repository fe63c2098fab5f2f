use serde::Serialize;

/// Identifier issued to a ticket by the pool counter (1, 2, 3, ...).
pub type TicketId = u32;

/// Outcome of a [`super::TicketPool::remove`] call.
///
/// The two terminal cases are deliberately distinct: `Stopped` means the pool
/// was shut down, `Exhausted` means the full supply was issued and drained.
/// Neither is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// A ticket was removed from the head of the queue.
    Delivered(TicketId),
    /// The supply limit was reached and the queue is empty; nothing more
    /// will ever arrive.
    Exhausted,
    /// The pool was shut down.
    Stopped,
}

impl RemoveOutcome {
    /// The delivered ticket, if any.
    pub fn ticket(&self) -> Option<TicketId> {
        match self {
            Self::Delivered(id) => Some(*id),
            Self::Exhausted | Self::Stopped => None,
        }
    }
}

/// Consistent snapshot of the pool counters, taken under the pool lock.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoolStats {
    /// Tickets currently queued.
    pub available: u32,
    /// Tickets ever added, never decreases.
    pub total_added: u32,
    /// Finite supply ceiling.
    pub supply_limit: u32,
    /// Maximum tickets resident at once.
    pub capacity: u32,
    /// False once the pool has been shut down.
    pub running: bool,
}
