mod config;
mod main_lib;

use config::Config;
use main_lib::{init_tracing, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let summary = run(&config).await.map_err(|e| {
        tracing::error!("Update aborted: {:#}", e);
        e
    })?;

    tracing::info!(
        "Update complete: {} stocks, {} alerts",
        summary.record_count,
        summary.alert_count
    );
    Ok(())
}
