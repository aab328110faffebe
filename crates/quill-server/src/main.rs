//! Quill server entry point.
//!
//! Composition root: loads configuration from the environment, opens
//! the database, runs migrations, and wires the page and license
//! services together.

use std::env;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quill_billing::{BillingConfig, HttpBillingClient, LicenseService, StaticFlagClient};
use quill_core::Result;
use quill_db::repository::{
    LibsqlLicenseRepository, LibsqlMemberRepository, LibsqlPageRepository,
    LibsqlWorkspaceRepository,
};
use quill_db::{DbConfig, DbManager, run_migrations};
use quill_pages::PageService;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    if let Err(err) = run().await {
        error!(%err, "Quill server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let db_config = db_config_from_env();
    let billing_config = billing_config_from_env();

    let manager = DbManager::connect(&db_config).await?;
    run_migrations(&manager.connection()).await?;

    let _page_service = PageService::new(
        LibsqlPageRepository::new(manager.connection()),
        LibsqlMemberRepository::new(manager.connection()),
    );
    let _license_service = LicenseService::new(
        LibsqlWorkspaceRepository::new(manager.connection()),
        LibsqlMemberRepository::new(manager.connection()),
        LibsqlLicenseRepository::new(manager.connection()),
        HttpBillingClient::new(&billing_config)?,
        billing_config,
    );
    let _flags = StaticFlagClient { enabled: true };

    // The HTTP surface mounts on top of these handles; until it does,
    // the process holds them and waits for shutdown.
    info!("Quill services ready");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping"),
        Err(err) => error!(%err, "Failed to listen for shutdown signal"),
    }

    Ok(())
}

fn db_config_from_env() -> DbConfig {
    let mut config = DbConfig::default();
    if let Ok(path) = env::var("QUILL_DB_PATH") {
        config.path = path;
    }
    config
}

fn billing_config_from_env() -> BillingConfig {
    let mut config = BillingConfig::default();
    if let Ok(url) = env::var("QUILL_BILLING_URL") {
        config.base_url = url;
    }
    if let Ok(key) = env::var("QUILL_BILLING_API_KEY") {
        config.api_key = key;
    }
    if let Ok(secs) = env::var("QUILL_LICENSE_FRESHNESS_SECS") {
        if let Ok(secs) = secs.parse::<u64>() {
            config.freshness_window = Duration::from_secs(secs);
        }
    }
    config
}
