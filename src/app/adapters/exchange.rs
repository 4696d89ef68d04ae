//! EUR→UAH exchange-rate provider
//!
//! The effective selling rate is the official National Bank of Ukraine rate
//! plus a configured add-on, floored at a configured minimum. The provider is
//! infallible by contract: any transport, timeout or parse failure degrades
//! to the configured fallback rate, so a flaky rate endpoint can never block
//! a price run.

use crate::config::RateParams;
use crate::constants;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Supplies the EUR→UAH rate used for currency-converting profiles.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Effective rate after the add-on and floor; falls back on failure.
    async fn eur_to_uah(&self, params: &RateParams) -> f64;
}

/// One entry of the NBU exchange JSON response.
#[derive(Debug, Deserialize)]
struct NbuRate {
    rate: f64,
}

/// Rate provider backed by the NBU public statistics endpoint.
pub struct NbuRateClient {
    client: reqwest::Client,
    url: String,
}

impl NbuRateClient {
    pub fn new() -> Self {
        Self::with_url(constants::NBU_EUR_RATE_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(constants::RATE_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.into(),
        }
    }

    async fn official_rate(&self) -> Option<f64> {
        let response = self.client.get(&self.url).send().await.ok()?;
        let rates: Vec<NbuRate> = response.json().await.ok()?;
        rates.first().map(|r| r.rate)
    }
}

impl Default for NbuRateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for NbuRateClient {
    async fn eur_to_uah(&self, params: &RateParams) -> f64 {
        match self.official_rate().await {
            Some(official) => {
                let effective = (official + params.add_uah).max(params.min_rate);
                info!(official, effective, "NBU EUR rate fetched");
                effective
            }
            None => {
                warn!(
                    fallback = params.fallback,
                    "NBU rate unavailable, using fallback"
                );
                params.fallback
            }
        }
    }
}

/// Fixed-rate provider for tests and offline runs.
pub struct FixedRate(pub f64);

#[async_trait]
impl RateProvider for FixedRate {
    async fn eur_to_uah(&self, _params: &RateParams) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let client = NbuRateClient::with_url("http://127.0.0.1:1/rate");
        let params = RateParams {
            add_uah: 1.0,
            min_rate: 49.0,
            fallback: 50.0,
        };
        assert_eq!(client.eur_to_uah(&params).await, 50.0);
    }

    #[tokio::test]
    async fn fixed_rate_ignores_params() {
        let params = RateParams::default();
        assert_eq!(FixedRate(48.6).eur_to_uah(&params).await, 48.6);
    }
}
