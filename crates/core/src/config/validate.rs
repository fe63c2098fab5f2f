use super::{
    types::{MarketConfig, SimulationConfig},
    ConfigError,
};

const MIN_TOTAL_TICKETS: u32 = 10;
const MAX_TOTAL_TICKETS: u32 = 1000;
const MAX_POOL_CAPACITY: u32 = 1000;
const MIN_DELAY_MS: u64 = 500;
const MAX_DELAY_MS: u64 = 10_000;

const MIN_VENDORS: u32 = 1;
const MAX_VENDORS: u32 = 50;
const MIN_CUSTOMERS: u32 = 1;
const MAX_CUSTOMERS: u32 = 200;

/// Validate a full simulation configuration.
pub fn validate_config(config: &SimulationConfig) -> Result<(), ConfigError> {
    validate_market(&config.market)?;

    if config.agents.vendors < MIN_VENDORS || config.agents.vendors > MAX_VENDORS {
        return Err(ConfigError::ValidationError(format!(
            "agents.vendors must be between {} and {}, got {}",
            MIN_VENDORS, MAX_VENDORS, config.agents.vendors
        )));
    }
    if config.agents.customers < MIN_CUSTOMERS || config.agents.customers > MAX_CUSTOMERS {
        return Err(ConfigError::ValidationError(format!(
            "agents.customers must be between {} and {}, got {}",
            MIN_CUSTOMERS, MAX_CUSTOMERS, config.agents.customers
        )));
    }

    Ok(())
}

/// Validate the market section on its own.
///
/// The capacity check depends on `total_tickets`, so supply is checked first.
pub(super) fn validate_market(market: &MarketConfig) -> Result<(), ConfigError> {
    if market.total_tickets < MIN_TOTAL_TICKETS || market.total_tickets > MAX_TOTAL_TICKETS {
        return Err(ConfigError::ValidationError(format!(
            "market.total_tickets must be between {} and {}, got {}",
            MIN_TOTAL_TICKETS, MAX_TOTAL_TICKETS, market.total_tickets
        )));
    }

    if market.max_capacity < market.total_tickets || market.max_capacity > MAX_POOL_CAPACITY {
        return Err(ConfigError::ValidationError(format!(
            "market.max_capacity must be between total_tickets ({}) and {}, got {}",
            market.total_tickets, MAX_POOL_CAPACITY, market.max_capacity
        )));
    }

    validate_delay(market.vendor_delay_ms, "market.vendor_delay_ms")?;
    validate_delay(market.customer_delay_ms, "market.customer_delay_ms")?;

    Ok(())
}

fn validate_delay(delay_ms: u64, field: &str) -> Result<(), ConfigError> {
    if delay_ms < MIN_DELAY_MS || delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::ValidationError(format!(
            "{} must be between {} and {}, got {}",
            field, MIN_DELAY_MS, MAX_DELAY_MS, delay_ms
        )));
    }
    Ok(())
}
