use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

pub mod sec_client;
pub use sec_client::SecEdgarClient;

/// Shared request limiter for SEC endpoints (SEC allows 10 requests per second)
pub struct ApiRateLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl ApiRateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}
