use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Assets offered in the dashboard dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Coin {
    Btc,
    Eth,
    Doge,
    Xrp,
    Teth,
    Bnb,
    Sol,
    Usdc,
    Steth,
    Tron,
    Card,
    Wste,
    Chai,
    Pi,
}

impl Coin {
    /// Dropdown order; the first entry is the default selection.
    pub const ALL: [Coin; 14] = [
        Coin::Btc,
        Coin::Eth,
        Coin::Doge,
        Coin::Xrp,
        Coin::Teth,
        Coin::Bnb,
        Coin::Sol,
        Coin::Usdc,
        Coin::Steth,
        Coin::Tron,
        Coin::Card,
        Coin::Wste,
        Coin::Chai,
        Coin::Pi,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Btc => "BTC",
            Coin::Eth => "ETH",
            Coin::Doge => "DOGE",
            Coin::Xrp => "XRP",
            Coin::Teth => "TETH",
            Coin::Bnb => "BNB",
            Coin::Sol => "SOL",
            Coin::Usdc => "USDC",
            Coin::Steth => "STETH",
            Coin::Tron => "TRON",
            Coin::Card => "CARD",
            Coin::Wste => "WSTE",
            Coin::Chai => "CHAI",
            Coin::Pi => "PI",
        }
    }

    /// CoinGecko asset id used in the `market_chart` path.
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Coin::Btc => "bitcoin",
            Coin::Eth => "ethereum",
            Coin::Doge => "dogecoin",
            Coin::Xrp => "ripple",
            Coin::Teth => "tether",
            Coin::Bnb => "binancecoin",
            Coin::Sol => "solana",
            Coin::Usdc => "usd-coin",
            Coin::Steth => "staked-ether",
            Coin::Tron => "tron",
            Coin::Card => "cardano",
            Coin::Wste => "wrapped-steth",
            Coin::Chai => "chainlink",
            Coin::Pi => "pi-network",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Coin::Btc => "Bitcoin",
            Coin::Eth => "Ethereum",
            Coin::Doge => "Dogecoin",
            Coin::Xrp => "Ripple",
            Coin::Teth => "Tether",
            Coin::Bnb => "Binance Coin",
            Coin::Sol => "Solana",
            Coin::Usdc => "USD Coin",
            Coin::Steth => "Staked Ether",
            Coin::Tron => "Tron",
            Coin::Card => "Cardano",
            Coin::Wste => "Wrapped stETH",
            Coin::Chai => "Chainlink",
            Coin::Pi => "Pi Network",
        }
    }
}

impl Default for Coin {
    fn default() -> Self {
        Coin::Btc
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Coin {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Coin::ALL
            .iter()
            .copied()
            .find(|coin| coin.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownCoin(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinInfo {
    pub symbol: &'static str,
    pub id: &'static str,
    pub name: &'static str,
}

impl From<Coin> for CoinInfo {
    fn from(coin: Coin) -> Self {
        Self {
            symbol: coin.symbol(),
            id: coin.coingecko_id(),
            name: coin.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: Option<f64>,
}

/// Prices for one coin over a trailing window, ordered by strictly
/// increasing timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub coin: Coin,
    pub days: u32,
    pub fetched_at: DateTime<Utc>,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts the points by timestamp. On a duplicate timestamp the point
    /// that came later in `points` is kept.
    pub fn new(coin: Coin, days: u32, fetched_at: DateTime<Utc>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);

        let mut ordered: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match ordered.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => ordered.push(point),
            }
        }

        Self {
            coin,
            days,
            fetched_at,
            points: ordered,
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// `(min, max)` timestamps, or `None` for an empty series.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.first()?.timestamp, self.last()?.timestamp))
    }

    pub fn has_volumes(&self) -> bool {
        self.points.iter().any(|p| p.volume.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub latest_price: f64,
    pub price_change: Option<f64>,
    pub price_change_percent: Option<f64>,
    pub volume_24h: Option<f64>,
    pub data_points: usize,
}

impl KeyMetrics {
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let points = series.points();
        let latest = points.last()?;
        let previous = points.len().checked_sub(2).map(|i| &points[i]);

        let price_change = previous.map(|prev| latest.price - prev.price);
        let price_change_percent = previous.and_then(|prev| {
            if prev.price == 0.0 {
                None
            } else {
                Some((latest.price - prev.price) / prev.price * 100.0)
            }
        });

        Some(Self {
            latest_price: latest.price,
            price_change,
            price_change_percent,
            volume_24h: latest.volume,
            data_points: points.len(),
        })
    }
}
