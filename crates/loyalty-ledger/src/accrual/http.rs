//! HTTP implementation of [`AccrualOracle`].
//!
//! `GET {base_url}/api/orders/{number}`:
//!
//! | response | decision |
//! |----------|----------|
//! | 200 + `{"order","status","accrual"?}` | `Verdict` |
//! | 204 | `Pending` |
//! | 429 + `Retry-After: <secs>` | `RateLimited` (configured default when the header is missing) |
//! | anything else, timeouts, bad bodies | `Unreachable` |

use super::{AccrualOracle, AccrualStatus, Decision};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Back-off applied when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum AccrualError {
    #[error("Invalid accrual client configuration: {0}")]
    Config(String),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration for [`HttpAccrualClient`].
#[derive(Debug, Clone)]
pub struct AccrualClientConfig {
    /// Service root, e.g. `http://localhost:8081`.
    pub base_url: String,
    pub timeout: Duration,
    pub default_retry_after: Duration,
}

impl AccrualClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            default_retry_after: DEFAULT_RETRY_AFTER,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_retry_after(mut self, retry_after: Duration) -> Self {
        self.default_retry_after = retry_after;
        self
    }
}

#[derive(Debug, Deserialize)]
struct AccrualResponse {
    order: String,
    status: AccrualStatus,
    #[serde(default)]
    accrual: Option<Decimal>,
}

/// Accrual service client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpAccrualClient {
    client: Client,
    base_url: String,
    default_retry_after: Duration,
}

impl HttpAccrualClient {
    pub fn new(config: AccrualClientConfig) -> Result<Self, AccrualError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AccrualError::Config(format!(
                "base url must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url,
            default_retry_after: config.default_retry_after,
        })
    }

    fn order_url(&self, number: &str) -> String {
        format!("{}/api/orders/{}", self.base_url, number)
    }

    fn retry_after(&self, response: &reqwest::Response) -> Duration {
        response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.default_retry_after)
    }

    async fn verdict(&self, number: &str, response: reqwest::Response) -> Decision {
        let body = match response.json::<AccrualResponse>().await {
            Ok(body) => body,
            Err(e) => return Decision::Unreachable(format!("undecodable accrual response: {e}")),
        };

        if body.order != number {
            return Decision::Unreachable(format!(
                "accrual response for {} while asking for {number}",
                body.order
            ));
        }

        match body.status {
            AccrualStatus::Processed => {
                let accrual = body.accrual.unwrap_or(Decimal::ZERO);
                if accrual < Decimal::ZERO {
                    return Decision::Unreachable(format!("negative accrual {accrual}"));
                }
                Decision::Verdict {
                    status: AccrualStatus::Processed,
                    accrual: Some(accrual),
                }
            }
            status => Decision::Verdict {
                status,
                accrual: None,
            },
        }
    }
}

#[async_trait]
impl AccrualOracle for HttpAccrualClient {
    async fn check(&self, number: &str) -> Decision {
        let url = self.order_url(number);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%number, error = %e, "Accrual request failed");
                return Decision::Unreachable(e.to_string());
            }
        };

        let status = response.status();
        debug!(%number, %status, "Accrual response");
        match status {
            StatusCode::OK => self.verdict(number, response).await,
            StatusCode::NO_CONTENT => Decision::Pending,
            StatusCode::TOO_MANY_REQUESTS => Decision::RateLimited(self.retry_after(&response)),
            other => Decision::Unreachable(format!("unexpected status {other}")),
        }
    }
}
