use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ApiResponse;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API response error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected market data format: {message}")]
    DataFormat { message: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown coin: {0}")]
    UnknownCoin(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn data_format(message: impl Into<String>) -> Self {
        DashboardError::DataFormat {
            message: message.into(),
        }
    }

    /// True for failures reaching or talking to the upstream API.
    pub fn is_network(&self) -> bool {
        matches!(self, DashboardError::Network(_) | DashboardError::Api { .. })
    }

    /// True when the upstream answered but the body had the wrong shape.
    pub fn is_data_format(&self) -> bool {
        matches!(self, DashboardError::DataFormat { .. } | DashboardError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Network(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Api { .. } => StatusCode::BAD_GATEWAY,
            DashboardError::DataFormat { .. } => StatusCode::BAD_GATEWAY,
            DashboardError::Json(_) => StatusCode::BAD_GATEWAY,
            DashboardError::UnknownCoin(_) => StatusCode::BAD_REQUEST,
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_family() {
        let api = DashboardError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(api.is_network());
        assert_eq!(api.status_code(), StatusCode::BAD_GATEWAY);

        let format = DashboardError::data_format("missing prices");
        assert!(format.is_data_format());
        assert!(!format.is_network());
        assert_eq!(format.status_code(), StatusCode::BAD_GATEWAY);

        let coin = DashboardError::UnknownCoin("FOO".to_string());
        assert_eq!(coin.status_code(), StatusCode::BAD_REQUEST);

        let config = DashboardError::Config("Invalid DASHBOARD_PORT".to_string());
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_messages() {
        let err = DashboardError::Api {
            status: 429,
            message: "CoinGecko API returned status: 429 Too Many Requests".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API response error: 429 - CoinGecko API returned status: 429 Too Many Requests"
        );
        assert_eq!(
            DashboardError::data_format("no price points").to_string(),
            "Unexpected market data format: no price points"
        );
    }
}
