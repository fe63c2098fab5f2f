pub mod agent;
pub mod config;
pub mod orchestrator;
pub mod pool;

pub use agent::{Customer, Vendor};
pub use config::{
    load_config, load_config_from_str, save_config, validate_config, AgentsConfig, ConfigError,
    MarketConfig, SimulationConfig,
};
pub use orchestrator::{AgentStatus, Marketplace, MarketplaceRun, OrchestratorError, RunStatus};
pub use pool::{PoolStats, RemoveOutcome, TicketId, TicketPool};
