//! Types for the marketplace orchestrator.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::pool::PoolStats;

/// Errors that can occur when starting a run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Vendor count outside the supported range.
    #[error("vendor count must be between {min} and {max}, got {got}")]
    InvalidVendorCount { got: u32, min: u32, max: u32 },

    /// Customer count outside the supported range.
    #[error("customer count must be between {min} and {max}, got {got}")]
    InvalidCustomerCount { got: u32, min: u32, max: u32 },
}

/// Point-in-time view of a run, safe to take mid-run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    pub started_at: DateTime<Utc>,
    pub pool: PoolStats,
    pub vendors: Vec<AgentStatus>,
    pub customers: Vec<AgentStatus>,
    /// Sum of all vendors' completed produce actions.
    pub total_produced: u64,
    /// Sum of all customers' completed purchase actions.
    pub total_purchased: u64,
    /// True once the full supply has been issued and drained.
    pub complete: bool,
}

/// Per-agent statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub id: u32,
    pub running: bool,
    /// Tickets produced or purchased by this agent.
    pub actions_completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_serializes_for_reporting() {
        let status = RunStatus {
            started_at: Utc::now(),
            pool: PoolStats {
                available: 3,
                total_added: 8,
                supply_limit: 10,
                capacity: 10,
                running: true,
            },
            vendors: vec![AgentStatus {
                id: 1,
                running: true,
                actions_completed: 8,
            }],
            customers: vec![AgentStatus {
                id: 1,
                running: true,
                actions_completed: 5,
            }],
            total_produced: 8,
            total_purchased: 5,
            complete: false,
        };

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["pool"]["available"], 3);
        assert_eq!(json["pool"]["supply_limit"], 10);
        assert_eq!(json["vendors"][0]["actions_completed"], 8);
        assert_eq!(json["total_purchased"], 5);
        assert_eq!(json["complete"], false);
    }
}
