use crate::dashboard::DashboardService;
use crate::error::DashboardError;
use crate::models::{ApiResponse, Coin, CoinInfo};
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use tracing::{error, warn};

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub coin: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/api/coins", web::get().to(list_coins))
        .route("/api/dashboard", web::get().to(get_dashboard));
}

async fn index(state: web::Data<DashboardService>) -> Result<HttpResponse> {
    let config = state.config();
    let options: String = Coin::ALL
        .iter()
        .map(|coin| {
            let selected = if *coin == Coin::default() { " selected" } else { "" };
            format!(
                r#"<option value="{sym}"{selected}>{sym}</option>"#,
                sym = coin.symbol(),
                selected = selected
            )
        })
        .collect();

    let html = INDEX_HTML
        .replace("{{COIN_OPTIONS}}", &options)
        .replace("{{DAYS}}", &config.history_days.to_string())
        .replace("{{REFRESH_MS}}", &config.refresh_interval().as_millis().to_string());

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success("Dashboard is healthy"))
}

async fn list_coins() -> HttpResponse {
    let coins: Vec<CoinInfo> = Coin::ALL.iter().copied().map(CoinInfo::from).collect();
    HttpResponse::Ok().json(ApiResponse::success(coins))
}

async fn get_dashboard(
    state: web::Data<DashboardService>,
    query: web::Query<DashboardQuery>,
) -> std::result::Result<HttpResponse, DashboardError> {
    let coin = match query.coin.as_deref() {
        Some(symbol) => symbol.parse::<Coin>()?,
        None => Coin::default(),
    };

    match state.load(coin).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(e) => {
            if e.is_data_format() {
                error!("Unusable market data for {}: {}", coin, e);
            } else if e.is_network() {
                warn!("Failed to fetch {} market data: {}", coin, e);
            } else {
                error!("Failed to load {} dashboard: {}", coin, e);
            }
            Err(e)
        }
    }
}
