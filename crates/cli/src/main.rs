use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boxoffice_core::{load_config, load_config_from_str, save_config, Marketplace};

/// Written next to the binary when no configuration file exists yet.
const DEFAULT_CONFIG: &str = r#"# Boxoffice simulation configuration

[market]
# Total tickets ever issued across the run (10-1000).
total_tickets = 100
# Maximum tickets resident in the pool at once (total_tickets-1000).
max_capacity = 100
# Pause after each vendor/customer action, in milliseconds (500-10000).
vendor_delay_ms = 1000
customer_delay_ms = 1000

[agents]
# Number of vendor agents (1-50).
vendors = 5
# Number of customer agents (1-200).
customers = 10
"#;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("BOXOFFICE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    if !config_path.exists() {
        let defaults =
            load_config_from_str(DEFAULT_CONFIG).context("Default configuration is invalid")?;
        save_config(&defaults, &config_path)
            .with_context(|| format!("Failed to write default config to {:?}", config_path))?;
        info!(
            "No configuration found; wrote defaults to {:?}. Adjust it and run again.",
            config_path
        );
        return Ok(());
    }

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    info!(
        total_tickets = config.market.total_tickets,
        max_capacity = config.market.max_capacity,
        vendors = config.agents.vendors,
        customers = config.agents.customers,
        "Configuration loaded"
    );

    let mut run = Marketplace::start(&config).context("Failed to start marketplace run")?;

    // Report once a second until the run drains naturally or Ctrl-C arrives.
    let outcome = loop {
        tokio::select! {
            _ = signal::ctrl_c() => break "stopped",
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
        }

        let status = run.status();
        info!(
            available = status.pool.available,
            added = status.pool.total_added,
            supply = status.pool.supply_limit,
            purchased = status.total_purchased,
            "marketplace status"
        );

        if status.complete && run.is_finished() {
            break "completed";
        }
    };

    run.stop();
    run.wait().await;

    let status = run.status();
    for vendor in &status.vendors {
        info!(
            vendor_id = vendor.id,
            produced = vendor.actions_completed,
            "vendor summary"
        );
    }
    for customer in &status.customers {
        info!(
            customer_id = customer.id,
            purchased = customer.actions_completed,
            "customer summary"
        );
    }
    info!(
        outcome,
        produced = status.total_produced,
        purchased = status.total_purchased,
        "marketplace run over"
    );

    Ok(())
}
