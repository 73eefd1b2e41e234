pub mod handlers;

use crate::api::CoinGeckoClient;
use crate::cache::TtlCache;
use crate::chart::{self, ChartSpec};
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::models::{Coin, CoinInfo, KeyMetrics, PriceSeries};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use handlers::configure;

/// Everything the page needs for one rerun.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub coin: CoinInfo,
    pub days: u32,
    pub metrics: KeyMetrics,
    pub price_chart: ChartSpec,
    pub volume_chart: ChartSpec,
    pub price_histogram: ChartSpec,
    pub fetched_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

pub struct DashboardService {
    client: CoinGeckoClient,
    cache: TtlCache<(Coin, u32), Arc<PriceSeries>>,
    config: Config,
}

impl DashboardService {
    pub fn new(config: Config) -> Result<Self> {
        let client = CoinGeckoClient::new(config.clone())?;
        let cache = TtlCache::new(config.cache_ttl());

        Ok(Self {
            client,
            cache,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Cached series for `coin` over the configured window.
    pub async fn series(&self, coin: Coin) -> Result<Arc<PriceSeries>> {
        let days = self.config.history_days;

        let purged = self.cache.purge_expired().await;
        if purged > 0 {
            debug!("Purged {} expired series, {} cached", purged, self.cache.len().await);
        }

        self.cache
            .get_or_try_insert_with((coin, days), || async {
                self.client.fetch_market_chart(coin, days).await.map(Arc::new)
            })
            .await
    }

    pub async fn load(&self, coin: Coin) -> Result<DashboardView> {
        let series = self.series(coin).await?;
        if !series.has_volumes() {
            warn!("No volume data returned for {}", coin);
        }
        let metrics = KeyMetrics::from_series(&series)
            .ok_or_else(|| DashboardError::data_format("Could not process the fetched data"))?;

        let symbol = coin.symbol();
        let view = DashboardView {
            coin: coin.into(),
            days: series.days,
            metrics,
            price_chart: chart::price_chart(symbol, &series),
            volume_chart: chart::volume_chart(symbol, &series),
            price_histogram: chart::price_histogram(symbol, &series),
            fetched_at: series.fetched_at,
            generated_at: Utc::now(),
        };

        info!(
            "Rendered {} dashboard: {} points, latest ${:.2}",
            coin, view.metrics.data_points, view.metrics.latest_price
        );
        Ok(view)
    }
}
