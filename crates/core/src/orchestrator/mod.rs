//! Marketplace orchestration.
//!
//! [`Marketplace::start_run`] builds one fresh [`crate::pool::TicketPool`]
//! from a market configuration and spawns the requested vendor and customer
//! agents against it. The returned [`MarketplaceRun`] owns the agent handles
//! for the run's lifetime: observe it mid-run through [`MarketplaceRun::status`],
//! tear it down with [`MarketplaceRun::stop`], and await completion with
//! [`MarketplaceRun::wait`]. Pools are never reused; a new run builds a new
//! pool.

mod runner;
mod types;

pub use runner::{Marketplace, MarketplaceRun};
pub use types::{AgentStatus, OrchestratorError, RunStatus};
