//! Plotly figure specs built from a [`PriceSeries`].
//!
//! The page passes `data` and `layout` straight to `Plotly.newPlot`, so the
//! field names here follow plotly.js.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::PriceSeries;

const PRICE_COLOR: &str = "royalblue";
const VOLUME_COLOR: &str = "lightseagreen";
const HISTOGRAM_COLOR: &str = "mediumpurple";
const GRID_COLOR: &str = "#ebf0f8";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        x: Vec<DateTime<Utc>>,
        y: Vec<f64>,
        mode: &'static str,
        name: &'static str,
        line: Line,
        hovertemplate: &'static str,
    },
    Bar {
        x: Vec<DateTime<Utc>>,
        y: Vec<f64>,
        name: &'static str,
        marker: Marker,
        hovertemplate: &'static str,
    },
    Histogram {
        x: Vec<f64>,
        name: &'static str,
        marker: Marker,
        hovertemplate: &'static str,
    },
}

#[cfg(test)]
impl Trace {
    /// Number of plotted samples.
    pub fn len(&self) -> usize {
        match self {
            Trace::Scatter { x, .. } | Trace::Bar { x, .. } => x.len(),
            Trace::Histogram { x, .. } => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<&'static str>,
    pub dragmode: &'static str,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub gridcolor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
    /// Slider bounds. Omitted for numeric axes and empty series so plotly autoranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[DateTime<Utc>; 2]>,
}

impl Axis {
    fn time(title: &str, span: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Self {
        Self {
            title: Title::new(title),
            kind: Some("date"),
            gridcolor: GRID_COLOR,
            rangeslider: Some(RangeSlider {
                visible: true,
                range: span.map(|(min, max)| [min, max]),
            }),
        }
    }

    fn linear(title: &str) -> Self {
        Self {
            title: Title::new(title),
            kind: None,
            gridcolor: GRID_COLOR,
            rangeslider: None,
        }
    }
}

fn layout(title: String, xaxis: Axis, yaxis: Axis, hovermode: Option<&'static str>) -> Layout {
    Layout {
        title: Title::new(title),
        xaxis,
        yaxis,
        hovermode,
        dragmode: "zoom",
        paper_bgcolor: "white",
        plot_bgcolor: "white",
    }
}

/// Line chart of price over time with a range slider spanning the series.
pub fn price_chart(symbol: &str, series: &PriceSeries) -> ChartSpec {
    let points = series.points();
    let trace = Trace::Scatter {
        x: points.iter().map(|p| p.timestamp).collect(),
        y: points.iter().map(|p| p.price).collect(),
        mode: "lines",
        name: "Price",
        line: Line {
            color: PRICE_COLOR,
            width: 2,
        },
        hovertemplate: "<b>Date</b>: %{x|%Y-%m-%d}<br><b>Price</b>: $%{y:,.2f}<extra></extra>",
    };

    ChartSpec {
        data: vec![trace],
        layout: layout(
            format!("{} Price Trend", symbol),
            Axis::time("Date", series.span()),
            Axis::linear("Price (USD)"),
            Some("x unified"),
        ),
    }
}

/// Bar chart of trading volume. Points without a volume are skipped.
pub fn volume_chart(symbol: &str, series: &PriceSeries) -> ChartSpec {
    let (x, y): (Vec<_>, Vec<_>) = series
        .points()
        .iter()
        .filter_map(|p| p.volume.map(|v| (p.timestamp, v)))
        .unzip();
    let span = x.first().copied().zip(x.last().copied());

    let trace = Trace::Bar {
        x,
        y,
        name: "Volume",
        marker: Marker {
            color: VOLUME_COLOR,
        },
        hovertemplate: "<b>Date</b>: %{x|%Y-%m-%d}<br><b>Volume</b>: $%{y:,.0f}<extra></extra>",
    };

    ChartSpec {
        data: vec![trace],
        layout: layout(
            format!("{} Trading Volume", symbol),
            Axis::time("Date", span),
            Axis::linear("Volume (USD)"),
            Some("x unified"),
        ),
    }
}

/// Histogram of prices; plotly does the binning.
pub fn price_histogram(symbol: &str, series: &PriceSeries) -> ChartSpec {
    let trace = Trace::Histogram {
        x: series.points().iter().map(|p| p.price).collect(),
        name: "Price Distribution",
        marker: Marker {
            color: HISTOGRAM_COLOR,
        },
        hovertemplate: "<b>Price Range</b>: %{x}<br><b>Count</b>: %{y}<extra></extra>",
    };

    let mut xaxis = Axis::linear("Price (USD)");
    xaxis.rangeslider = Some(RangeSlider {
        visible: true,
        range: None,
    });

    ChartSpec {
        data: vec![trace],
        layout: layout(
            format!("{} Price Distribution", symbol),
            xaxis,
            Axis::linear("Frequency"),
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coin, PricePoint};
    use chrono::{Duration, TimeZone};

    fn daily_series(days: i64) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let points = (0..days)
            .map(|i| PricePoint {
                timestamp: start + Duration::days(i),
                price: 100.0 + i as f64,
                volume: if i % 2 == 0 { Some(1_000.0 * i as f64) } else { None },
            })
            .collect();
        PriceSeries::new(Coin::Btc, days as u32, start, points)
    }

    #[test]
    fn test_price_chart_sixty_days() {
        let series = daily_series(60);
        let spec = price_chart("BTC", &series);

        assert_eq!(spec.data.len(), 1);
        assert_eq!(spec.data[0].len(), 60);
        assert_eq!(spec.layout.title.text, "BTC Price Trend");

        let slider = spec.layout.xaxis.rangeslider.as_ref().unwrap();
        assert!(slider.visible);
        let [min, max] = slider.range.unwrap();
        assert_eq!(min, series.first().unwrap().timestamp);
        assert_eq!(max, series.last().unwrap().timestamp);
        assert_eq!(max - min, Duration::days(59));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let series = daily_series(30);
        let first = price_chart("ETH", &series);
        let second = price_chart("ETH", &series);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_series_renders_empty_chart() {
        let series = PriceSeries::new(Coin::Sol, 60, Utc::now(), Vec::new());

        let spec = price_chart("SOL", &series);
        assert!(spec.data[0].is_empty());
        assert_eq!(spec.layout.xaxis.rangeslider.as_ref().unwrap().range, None);

        assert!(volume_chart("SOL", &series).data[0].is_empty());
        assert!(price_histogram("SOL", &series).data[0].is_empty());
    }

    #[test]
    fn test_volume_chart_skips_missing_volumes() {
        let series = daily_series(10);
        let spec = volume_chart("BTC", &series);

        assert_eq!(spec.data[0].len(), 5);
        let [min, max] = spec.layout.xaxis.rangeslider.as_ref().unwrap().range.unwrap();
        assert_eq!(min, series.points()[0].timestamp);
        assert_eq!(max, series.points()[8].timestamp);
    }

    #[test]
    fn test_price_chart_json_shape() {
        let spec = price_chart("BTC", &daily_series(2));
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "lines");
        assert_eq!(json["data"][0]["line"]["color"], "royalblue");
        assert_eq!(json["layout"]["hovermode"], "x unified");
        assert_eq!(json["layout"]["xaxis"]["type"], "date");
        assert_eq!(json["layout"]["xaxis"]["rangeslider"]["visible"], true);
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "Price (USD)");
        assert!(json["layout"]["yaxis"].get("rangeslider").is_none());

        let hist = serde_json::to_value(price_histogram("BTC", &daily_series(2))).unwrap();
        assert_eq!(hist["data"][0]["type"], "histogram");
        assert!(hist["layout"].get("hovermode").is_none());
        assert_eq!(hist["layout"]["yaxis"]["title"]["text"], "Frequency");
    }
}
