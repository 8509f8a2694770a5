use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::rates::{RateError, RateSnapshot, RateSource};

pub const DEFAULT_RATES_URL: &str = "https://api.exchangeratesapi.io/latest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Configures an [`HttpRateSource`].
#[derive(Debug)]
pub struct HttpRateSourceBuilder {
    url: String,
    access_key: Option<String>,
    base_currency: Option<String>,
    timeout: Duration,
    max_attempts: u32,
    retry_delay: Duration
}

impl HttpRateSourceBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn access_key(mut self, access_key: Option<String>) -> Self {
        self.access_key = access_key;
        self
    }

    /// Requests rates relative to `base_currency` instead of the service default.
    pub fn base_currency(mut self, base_currency: impl Into<String>) -> Self {
        self.base_currency = Some(base_currency.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of requests made before giving up. Clamped to at least one.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// # Errors
    /// Returns `RateError::Request` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpRateSource, RateError> {
        let client = Client::builder().timeout(self.timeout).build()?;

        let mut query = Vec::new();
        if let Some(access_key) = self.access_key {
            query.push(("access_key", access_key));
        }
        if let Some(base_currency) = self.base_currency {
            query.push(("base", base_currency));
        }

        Ok(HttpRateSource {
            client,
            url: self.url,
            query,
            max_attempts: self.max_attempts,
            retry_delay: self.retry_delay
        })
    }
}

/// Fetches the rate snapshot from an exchange rate HTTP service with a single `GET`.
///
/// Transient failures (timeouts, refused connections, `429` and `5xx`) are
/// retried with a linearly growing delay. Everything else fails immediately.
#[derive(Debug)]
pub struct HttpRateSource {
    client: Client,
    url: String,
    query: Vec<(&'static str, String)>,
    max_attempts: u32,
    retry_delay: Duration
}

impl HttpRateSource {
    pub fn builder() -> HttpRateSourceBuilder {
        HttpRateSourceBuilder {
            url: DEFAULT_RATES_URL.to_string(),
            access_key: None,
            base_currency: None,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self) -> Result<RateSnapshot, RateError> {
        let response = self.client
            .get(&self.url)
            .query(&self.query)
            .send()
            .await?;

        let status = response.status();
        debug!("Exchange rate service responded with status {status}");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(RateError::Status {
                status: status.as_u16(),
                message
            });
        }

        let body = response.text().await?;
        RateSnapshot::from_json(&body)
    }
}

impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<RateSnapshot, RateError> {
        let mut attempt = 1;

        loop {
            debug!("Requesting exchange rates from {} (attempt {attempt}/{})", self.url, self.max_attempts);

            match self.request().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(error) if error.is_transient() && attempt < self.max_attempts => {
                    warn!("Exchange rate request failed, retrying: {error}");
                    sleep(self.retry_delay * attempt).await;
                    attempt += 1;
                }
                Err(error) => return Err(error)
            }
        }
    }
}
