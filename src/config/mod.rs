use crate::error::{DashboardError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// One day.
const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub coingecko_base_url: String,
    pub vs_currency: String,
    pub history_days: u32,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub refresh_interval_secs: u64,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            history_days: 60, // ~2 months
            cache_ttl_secs: 600,
            request_timeout_secs: 30,
            refresh_interval_secs: 15,
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let history_days = parse_var("HISTORY_DAYS", defaults.history_days)?;
        if history_days == 0 {
            return Err(DashboardError::Config("Invalid HISTORY_DAYS".to_string()));
        }

        let refresh_interval_secs = validate_refresh_interval(parse_var(
            "REFRESH_INTERVAL_SECS",
            defaults.refresh_interval_secs,
        )?)?;

        Ok(Self {
            coingecko_base_url: env::var("COINGECKO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.coingecko_base_url),
            vs_currency: env::var("VS_CURRENCY").unwrap_or(defaults.vs_currency),
            history_days,
            cache_ttl_secs: parse_var("CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            refresh_interval_secs,
            host: env::var("DASHBOARD_HOST").unwrap_or(defaults.host),
            port: parse_var("DASHBOARD_PORT", defaults.port)?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The page polls `/api/dashboard` at this interval. Browsers cap
/// `setInterval` at 2^31-1 ms, well above the one-day ceiling.
fn validate_refresh_interval(secs: u64) -> Result<u64> {
    if secs == 0 || secs > MAX_REFRESH_INTERVAL_SECS {
        return Err(DashboardError::Config("Invalid REFRESH_INTERVAL_SECS".to_string()));
    }
    Ok(secs)
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| DashboardError::Config(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}
