use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::ApiRateLimiter;
use crate::ticker_map::TickerMap;

const MAX_RETRIES: u32 = 3;

/// SEC EDGAR HTTP client
pub struct SecEdgarClient {
    client: Client,
    rate_limiter: ApiRateLimiter,
    max_retries: u32,
    retry_delay: Duration,
}

impl SecEdgarClient {
    /// Create a new client. SEC rejects requests without a descriptive User-Agent.
    pub fn new(user_agent: &str, requests_per_second: u32) -> Result<Self> {
        if user_agent.trim().is_empty() {
            return Err(anyhow!("SEC requests need a User-Agent identifying the caller"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            rate_limiter: ApiRateLimiter::new(requests_per_second),
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Override the retry policy; the wait before attempt `n + 1` is `delay * n`
    pub fn with_retry_policy(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = delay;
        self
    }

    /// GET a URL once and return the body
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;
        self.rate_limiter.wait().await;

        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} failed with status {}", url, status));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Download and parse `company_tickers.json`, retrying with linear backoff
    pub async fn fetch_ticker_map(&self, url: &str) -> Result<TickerMap> {
        let mut attempt = 1;
        loop {
            let result = match self.get_bytes(url).await {
                Ok(payload) => TickerMap::from_company_tickers(&payload).map_err(anyhow::Error::from),
                Err(e) => Err(e),
            };

            match result {
                Ok(map) => {
                    info!("✅ Ticker map fetched on attempt {}/{}", attempt, self.max_retries);
                    return Ok(map);
                }
                Err(e) if attempt < self.max_retries => {
                    warn!("Ticker fetch attempt {} failed: {}. Retrying...", attempt, e);
                    tokio::time::sleep(self.retry_delay * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(format!("ticker fetch failed after {} attempts", attempt)));
                }
            }
        }
    }
}
