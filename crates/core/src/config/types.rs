use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{validate::validate_market, ConfigError};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub market: MarketConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
}

/// Ticket market configuration.
///
/// All four values are range-checked: a `MarketConfig` obtained through
/// [`MarketConfig::new`] or [`super::load_config`] is always valid.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketConfig {
    /// Total tickets ever issued across the run (10-1000).
    pub total_tickets: u32,
    /// Maximum tickets resident in the pool at once
    /// (at least `total_tickets`, at most 1000).
    pub max_capacity: u32,
    /// Pause after each successful vendor action, in milliseconds (500-10000).
    #[serde(default = "default_vendor_delay_ms")]
    pub vendor_delay_ms: u64,
    /// Pause after each successful customer action, in milliseconds (500-10000).
    #[serde(default = "default_customer_delay_ms")]
    pub customer_delay_ms: u64,
}

impl MarketConfig {
    /// Create a validated market configuration.
    pub fn new(
        total_tickets: u32,
        max_capacity: u32,
        vendor_delay_ms: u64,
        customer_delay_ms: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            total_tickets,
            max_capacity,
            vendor_delay_ms,
            customer_delay_ms,
        };
        validate_market(&config)?;
        Ok(config)
    }

    pub fn vendor_delay(&self) -> Duration {
        Duration::from_millis(self.vendor_delay_ms)
    }

    pub fn customer_delay(&self) -> Duration {
        Duration::from_millis(self.customer_delay_ms)
    }
}

fn default_vendor_delay_ms() -> u64 {
    1000
}

fn default_customer_delay_ms() -> u64 {
    1000
}

/// How many vendor and customer agents a run spawns.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentsConfig {
    /// Number of vendor agents (1-50).
    #[serde(default = "default_vendors")]
    pub vendors: u32,
    /// Number of customer agents (1-200).
    #[serde(default = "default_customers")]
    pub customers: u32,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            vendors: default_vendors(),
            customers: default_customers(),
        }
    }
}

fn default_vendors() -> u32 {
    5
}

fn default_customers() -> u32 {
    10
}
