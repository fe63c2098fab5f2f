//! Marketplace run lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::agent::{Customer, Vendor};
use crate::config::{MarketConfig, SimulationConfig};
use crate::pool::TicketPool;

use super::types::{AgentStatus, OrchestratorError, RunStatus};

const MIN_VENDORS: u32 = 1;
const MAX_VENDORS: u32 = 50;
const MIN_CUSTOMERS: u32 = 1;
const MAX_CUSTOMERS: u32 = 200;

/// Entry point for starting marketplace runs.
pub struct Marketplace;

impl Marketplace {
    /// Start a run using the agent counts from the configuration.
    pub fn start(config: &SimulationConfig) -> Result<MarketplaceRun, OrchestratorError> {
        Self::start_run(
            &config.market,
            config.agents.vendors,
            config.agents.customers,
        )
    }

    /// Start a run with a fresh pool and the given number of agents.
    ///
    /// Must be called within a tokio runtime; every agent is spawned as an
    /// independent task bound to the run's pool.
    pub fn start_run(
        market: &MarketConfig,
        vendor_count: u32,
        customer_count: u32,
    ) -> Result<MarketplaceRun, OrchestratorError> {
        if !(MIN_VENDORS..=MAX_VENDORS).contains(&vendor_count) {
            return Err(OrchestratorError::InvalidVendorCount {
                got: vendor_count,
                min: MIN_VENDORS,
                max: MAX_VENDORS,
            });
        }
        if !(MIN_CUSTOMERS..=MAX_CUSTOMERS).contains(&customer_count) {
            return Err(OrchestratorError::InvalidCustomerCount {
                got: customer_count,
                min: MIN_CUSTOMERS,
                max: MAX_CUSTOMERS,
            });
        }

        let pool = Arc::new(TicketPool::new(market.max_capacity, market.total_tickets));

        let mut tasks = Vec::with_capacity((vendor_count + customer_count) as usize);

        let vendors: Vec<Vendor> = (1..=vendor_count)
            .map(|id| Vendor::new(id, Arc::clone(&pool), market.vendor_delay()))
            .collect();
        for vendor in &vendors {
            tasks.push(vendor.spawn());
        }

        let customers: Vec<Customer> = (1..=customer_count)
            .map(|id| Customer::new(id, Arc::clone(&pool), market.customer_delay()))
            .collect();
        for customer in &customers {
            tasks.push(customer.spawn());
        }

        info!(
            vendors = vendor_count,
            customers = customer_count,
            supply = market.total_tickets,
            capacity = market.max_capacity,
            "marketplace run started"
        );

        Ok(MarketplaceRun {
            pool,
            vendors,
            customers,
            tasks,
            started_at: Utc::now(),
        })
    }
}

/// A live marketplace run: one pool plus the agents bound to it.
pub struct MarketplaceRun {
    pool: Arc<TicketPool>,
    vendors: Vec<Vendor>,
    customers: Vec<Customer>,
    tasks: Vec<JoinHandle<()>>,
    started_at: DateTime<Utc>,
}

impl MarketplaceRun {
    pub fn pool(&self) -> &Arc<TicketPool> {
        &self.pool
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Stop every agent, then shut the pool down.
    ///
    /// Safe to call after the run already completed naturally, and safe to
    /// call more than once.
    pub fn stop(&self) {
        info!("stopping marketplace run");
        for vendor in &self.vendors {
            vendor.stop();
        }
        for customer in &self.customers {
            customer.stop();
        }
        self.pool.shutdown();
    }

    /// True once every agent task has exited.
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|task| task.is_finished())
    }

    /// Await all agent tasks.
    ///
    /// A panicked agent is logged and skipped; the rest of the run is still
    /// joined.
    pub async fn wait(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                if e.is_panic() {
                    error!("agent task panicked: {}", e);
                }
            }
        }
        info!(
            produced = self.vendors.iter().map(Vendor::tickets_produced).sum::<u64>(),
            purchased = self
                .customers
                .iter()
                .map(Customer::tickets_purchased)
                .sum::<u64>(),
            "marketplace run finished"
        );
    }

    /// Snapshot the run for observation or reporting, mid-run or after.
    pub fn status(&self) -> RunStatus {
        let vendors: Vec<AgentStatus> = self
            .vendors
            .iter()
            .map(|v| AgentStatus {
                id: v.id(),
                running: v.is_running(),
                actions_completed: v.tickets_produced(),
            })
            .collect();
        let customers: Vec<AgentStatus> = self
            .customers
            .iter()
            .map(|c| AgentStatus {
                id: c.id(),
                running: c.is_running(),
                actions_completed: c.tickets_purchased(),
            })
            .collect();

        RunStatus {
            started_at: self.started_at,
            pool: self.pool.stats(),
            total_produced: vendors.iter().map(|v| v.actions_completed).sum(),
            total_purchased: customers.iter().map(|c| c.actions_completed).sum(),
            complete: self.pool.all_supply_retrieved(),
            vendors,
            customers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn market() -> MarketConfig {
        MarketConfig::new(10, 10, 500, 500).unwrap()
    }

    #[tokio::test]
    async fn test_start_run_rejects_bad_counts() {
        let market = market();
        assert!(matches!(
            Marketplace::start_run(&market, 0, 10),
            Err(OrchestratorError::InvalidVendorCount { got: 0, .. })
        ));
        assert!(matches!(
            Marketplace::start_run(&market, 51, 10),
            Err(OrchestratorError::InvalidVendorCount { got: 51, .. })
        ));
        assert!(matches!(
            Marketplace::start_run(&market, 5, 0),
            Err(OrchestratorError::InvalidCustomerCount { got: 0, .. })
        ));
        assert!(matches!(
            Marketplace::start_run(&market, 5, 201,),
            Err(OrchestratorError::InvalidCustomerCount { got: 201, .. })
        ));
    }

    #[tokio::test]
    async fn test_start_run_sizes_pool_from_config() {
        let market = MarketConfig::new(100, 250, 500, 500).unwrap();
        let run = Marketplace::start_run(&market, 2, 3).unwrap();

        assert_eq!(run.pool().supply_limit(), 100);
        assert_eq!(run.pool().capacity(), 250);
        assert_eq!(run.vendors().len(), 2);
        assert_eq!(run.customers().len(), 3);

        run.stop();
    }

    #[tokio::test]
    async fn test_stop_terminates_blocked_agents() {
        // Delays far longer than the test: every agent is blocked or pacing
        // when stop arrives.
        let market = MarketConfig::new(10, 10, 10_000, 10_000).unwrap();
        let mut run = Marketplace::start_run(&market, 3, 5).unwrap();
        tokio::task::yield_now().await;

        run.stop();
        timeout(Duration::from_secs(2), run.wait())
            .await
            .expect("agents did not terminate after stop");

        assert!(!run.pool().is_running());
        assert!(run.vendors().iter().all(|v| !v.is_running()));
        assert!(run.customers().iter().all(|c| !c.is_running()));
    }

    #[tokio::test]
    async fn test_stop_after_natural_completion_is_safe() {
        let market = market();
        let run = Marketplace::start_run(&market, 1, 1).unwrap();
        run.stop();
        run.stop();
        assert!(!run.pool().is_running());
    }

    #[tokio::test]
    async fn test_status_snapshot_mid_run() {
        let market = market();
        let run = Marketplace::start_run(&market, 2, 4).unwrap();

        let status = run.status();
        assert_eq!(status.vendors.len(), 2);
        assert_eq!(status.customers.len(), 4);
        assert_eq!(status.pool.supply_limit, 10);
        assert!(status.pool.running);
        assert!(!status.complete);

        run.stop();
    }
}
