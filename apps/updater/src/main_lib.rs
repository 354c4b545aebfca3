use std::sync::Arc;

use tickerboard_core::{read_watchlist, DashboardService, DashboardWriter, WriteSummary};
use tickerboard_market_data::{
    AlphaVantageProvider, HistoryProvider, QuoteProvider, QuoteResolver, RequestGate,
    YahooProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Wire the providers into a dashboard service.
pub fn build_service(config: &Config, api_key: &str) -> anyhow::Result<DashboardService> {
    let yahoo = YahooProvider::with_timeout(config.request_timeout)?;
    let quotes: Arc<dyn QuoteProvider> = Arc::new(QuoteResolver::new(yahoo));
    let history: Arc<dyn HistoryProvider> = Arc::new(AlphaVantageProvider::with_timeout(
        api_key.to_string(),
        config.request_timeout,
    ));

    Ok(DashboardService::new(
        quotes,
        history,
        RequestGate::new(config.history_delay),
    ))
}

/// One full update: watchlist in, dashboard artifacts out.
///
/// The watchlist is read before the credential is checked; either failure
/// aborts before any ticker is processed.
pub async fn run(config: &Config) -> anyhow::Result<WriteSummary> {
    let tickers = read_watchlist(&config.watchlist_path)?;
    let api_key = config.api_key()?;
    tracing::info!(
        "Updating {} tickers from {}",
        tickers.len(),
        config.watchlist_path.display()
    );

    let service = build_service(config, api_key)?;
    let run = service.run(&tickers).await;
    for skipped in &run.skipped {
        tracing::warn!("Skipped {}: {}", skipped.ticker, skipped.reason);
    }

    let summary = DashboardWriter::new(&config.site_dir).write(&run)?;
    Ok(summary)
}
