mod api;
mod cache;
mod chart;
mod config;
mod dashboard;
mod error;
mod models;
#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::dashboard::DashboardService;
use crate::error::Result;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr();

    info!("Starting Crypto Dashboard on http://{}", bind_addr);
    info!(
        "CoinGecko: {} | window: {} days | cache TTL: {}s | refresh: {}s",
        config.coingecko_base_url,
        config.history_days,
        config.cache_ttl_secs,
        config.refresh_interval_secs
    );

    let service = web::Data::new(DashboardService::new(config)?);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .configure(dashboard::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
