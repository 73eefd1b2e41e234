use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::models::{Coin, PricePoint, PriceSeries};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

/// Body of `GET /coins/{id}/market_chart`. Each row is `[unix_ms, value]`.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, Option<f64>)>,
    #[serde(default)]
    total_volumes: Vec<(f64, Option<f64>)>,
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    config: Config,
}

impl CoinGeckoClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("crypto-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_market_chart(&self, coin: Coin, days: u32) -> Result<PriceSeries> {
        let url = format!(
            "{}/coins/{}/market_chart",
            self.config.coingecko_base_url,
            coin.coingecko_id()
        );

        info!("Fetching latest data for {}...", coin.name());
        debug!("Fetching market chart from CoinGecko: {} (days={})", url, days);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", self.config.vs_currency.clone()),
                ("days", days.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DashboardError::Api {
                status: response.status().as_u16(),
                message: format!("CoinGecko API returned status: {}", response.status()),
            });
        }

        let text = response.text().await?;
        match parse_market_chart(coin, days, &text) {
            Ok(series) => {
                info!("[COINGECKO] {}: {} points", coin, series.len());
                Ok(series)
            }
            Err(e) => {
                error!("CoinGecko raw response: {}", truncate(&text, 512));
                Err(e)
            }
        }
    }
}

/// Reshapes a `market_chart` body into a non-empty [`PriceSeries`].
pub fn parse_market_chart(coin: Coin, days: u32, body: &str) -> Result<PriceSeries> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let chart: MarketChartResponse =
        serde_json::from_value(value).map_err(|e| DashboardError::data_format(e.to_string()))?;

    let mut points = Vec::with_capacity(chart.prices.len());
    for (i, (ms, price)) in chart.prices.iter().enumerate() {
        let price = price
            .filter(|p| p.is_finite())
            .ok_or_else(|| DashboardError::data_format(format!("missing price at index {}", i)))?;

        let volume = chart
            .total_volumes
            .get(i)
            .and_then(|(_, v)| *v)
            .filter(|v| v.is_finite());

        points.push(PricePoint {
            timestamp: timestamp_from_millis(*ms)?,
            price,
            volume,
        });
    }

    let series = PriceSeries::new(coin, days, Utc::now(), points);
    if series.is_empty() {
        return Err(DashboardError::data_format("no price points returned"));
    }
    Ok(series)
}

fn timestamp_from_millis(ms: f64) -> Result<DateTime<Utc>> {
    if !ms.is_finite() {
        return Err(DashboardError::data_format("non-numeric timestamp"));
    }
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .ok_or_else(|| DashboardError::data_format(format!("timestamp out of range: {}", ms)))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
