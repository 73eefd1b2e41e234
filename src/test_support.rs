//! Local stand-in for the CoinGecko API used by the async tests.

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::Config;

pub const START_MS: i64 = 1_700_000_000_000;
pub const DAY_MS: i64 = 86_400_000;

/// `market_chart` body with one point per day starting at [`START_MS`].
pub fn market_chart_body(days: usize) -> String {
    let prices: Vec<_> = (0..days)
        .map(|i| json!([START_MS + i as i64 * DAY_MS, 30_000.0 + i as f64 * 125.5]))
        .collect();
    let volumes: Vec<_> = (0..days)
        .map(|i| json!([START_MS + i as i64 * DAY_MS, 1.0e9 + i as f64 * 1.0e6]))
        .collect();

    json!({
        "prices": prices,
        "market_caps": [],
        "total_volumes": volumes,
    })
    .to_string()
}

pub struct StubUpstream {
    base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubUpstream {
    /// Answers every request with `status` and `body`. Must run inside an
    /// actix system (`#[actix_web::test]`).
    pub async fn spawn(status: u16, body: String) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_hits = hits.clone();
        let server_requests = requests.clone();
        let server = HttpServer::new(move || {
            let hits = server_hits.clone();
            let requests = server_requests.clone();
            let body = body.clone();
            App::new().default_service(web::to(move |req: HttpRequest| {
                let hits = hits.clone();
                let requests = requests.clone();
                let body = body.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    requests.lock().unwrap().push(req.uri().to_string());
                    HttpResponse::build(StatusCode::from_u16(status).unwrap())
                        .content_type("application/json")
                        .body(body)
                }
            }))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            base_url: format!("http://{}", addr),
            hits,
            requests,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            coingecko_base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request paths with query strings, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
