//! Client for the forecasting backend.
//!
//! The backend exposes three JSON array endpoints; each is fetched once at
//! startup and never retried. A failed fetch leaves its collection absent
//! until the user reloads.

pub mod records;

pub use records::{ComparisonRecord, DriverRecord, ForecastRecord, region_names};

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::http_client;

/// Upper bound for a single response body.
const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

/// Errors from a single endpoint fetch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL does not parse.
    #[error("Invalid API base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    /// The server answered with a non-success status.
    #[error("GET {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    /// The request could not be carried out (DNS, refused, timeout).
    #[error("GET {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    /// The body was unreadable or exceeded the size bound.
    #[error("GET {endpoint} body could not be read: {source}")]
    Body {
        endpoint: String,
        source: std::io::Error,
    },
    /// The body was not the expected JSON shape.
    #[error("GET {endpoint} returned unexpected JSON: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

/// Typed access to the three dashboard collections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    /// Build a client after validating the base URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `/drivers`.
    pub fn drivers(&self) -> Result<Vec<DriverRecord>, ApiError> {
        self.get_json("/drivers")
    }

    /// GET `/forecasts`.
    pub fn forecasts(&self) -> Result<Vec<ForecastRecord>, ApiError> {
        self.get_json("/forecasts")
    }

    /// GET `/comparison`.
    pub fn comparison(&self) -> Result<Vec<ComparisonRecord>, ApiError> {
        self.get_json("/comparison")
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base, endpoint);
        let response = http_client::agent()
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => ApiError::Status {
                    endpoint: endpoint.to_string(),
                    status,
                },
                transport => ApiError::Transport {
                    endpoint: endpoint.to_string(),
                    message: transport.to_string(),
                },
            })?;
        let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES).map_err(
            |source| ApiError::Body {
                endpoint: endpoint.to_string(),
                source,
            },
        )?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// The in-memory data cache backing every view.
///
/// Collections stay `None` when their fetch failed; the UI renders
/// placeholders for absent collections. Mutation is wholesale replacement
/// on reload, nothing else.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub forecasts: Option<Vec<ForecastRecord>>,
    pub comparison: Option<Vec<ComparisonRecord>>,
    pub drivers: Option<Vec<DriverRecord>>,
    /// Sorted distinct region names derived from the forecast collection.
    pub regions: Vec<String>,
}

impl DashboardData {
    /// Assemble the cache from the three settled fetches.
    pub fn from_collections(
        forecasts: Option<Vec<ForecastRecord>>,
        comparison: Option<Vec<ComparisonRecord>>,
        drivers: Option<Vec<DriverRecord>>,
    ) -> Self {
        let regions = forecasts
            .as_deref()
            .map(region_names)
            .unwrap_or_default();
        Self {
            forecasts,
            comparison,
            drivers,
            regions,
        }
    }

    /// Comparison rows, or an empty slice when the fetch failed.
    pub fn comparison_rows(&self) -> &[ComparisonRecord] {
        self.comparison.as_deref().unwrap_or_default()
    }

    /// Forecast rows, or an empty slice when the fetch failed.
    pub fn forecast_rows(&self) -> &[ForecastRecord] {
        self.forecasts.as_deref().unwrap_or_default()
    }

    /// Driver rows, or an empty slice when the fetch failed.
    pub fn driver_rows(&self) -> &[DriverRecord] {
        self.drivers.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    fn serve_status(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let response = format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\n\r\n");
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn fetches_and_decodes_forecasts() {
        let url = serve_once(r#"[{"Region": "CAR", "Year": 2025, "SARIMAX_Forecast": 5.0}]"#);
        let client = ApiClient::new(&url).unwrap();
        let forecasts = client.forecasts().unwrap();
        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].region, "CAR");
    }

    #[test]
    fn non_success_status_is_reported_with_endpoint() {
        let url = serve_status("503 Service Unavailable");
        let client = ApiClient::new(&url).unwrap();
        match client.drivers() {
            Err(ApiError::Status { endpoint, status }) => {
                assert_eq!(endpoint, "/drivers");
                assert_eq!(status, 503);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let url = serve_once("{ not json ]");
        let client = ApiClient::new(&url).unwrap();
        assert!(matches!(
            client.comparison(),
            Err(ApiError::Decode { .. })
        ));
    }

    #[test]
    fn data_from_collections_derives_regions_from_forecasts() {
        let forecasts = vec![
            ForecastRecord {
                region: "NCR".into(),
                year: 2025,
                forecast: 1.0,
            },
            ForecastRecord {
                region: "CAR".into(),
                year: 2025,
                forecast: 2.0,
            },
        ];
        let data = DashboardData::from_collections(Some(forecasts), None, None);
        assert_eq!(data.regions, ["CAR", "NCR"]);
        assert!(data.comparison_rows().is_empty());
    }

    #[test]
    fn failed_forecast_fetch_leaves_regions_empty() {
        let data = DashboardData::from_collections(None, Some(Vec::new()), None);
        assert!(data.regions.is_empty());
    }
}
