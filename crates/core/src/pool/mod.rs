//! The shared ticket pool.
//!
//! A bounded, finite-supply, multi-producer/multi-consumer queue of ticket
//! identifiers. Vendors block in [`TicketPool::add`] while the pool is full,
//! customers block in [`TicketPool::remove`] while it is empty and more
//! tickets may still arrive. [`TicketPool::shutdown`] wakes every blocked
//! task so a run can be torn down without deadlock.
//!
//! Wakes are broadcast: every woken task re-validates its wait predicate
//! under the pool lock before proceeding, so spurious wakes and thundering
//! herds are harmless.

mod pool;
mod types;

pub use pool::TicketPool;
pub use types::{PoolStats, RemoveOutcome, TicketId};
