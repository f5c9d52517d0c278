//! Token price client backed by the Jupiter price aggregator.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::{PriceProvider, ProviderError};
use crate::config::MarketConfig;

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    data: HashMap<String, PriceEntry>,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    #[allow(dead_code)]
    id: Option<String>,
    price: f64,
}

pub struct JupiterPriceClient {
    client: Client,
    price_api: String,
}

impl JupiterPriceClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("failed to create HTTP client"),
            price_api: config.price_api.clone(),
        }
    }
}

#[async_trait]
impl PriceProvider for JupiterPriceClient {
    /// Fetch the price map and keep only the requested mints.
    async fn prices_for(&self, mints: &[String]) -> Result<HashMap<String, f64>, ProviderError> {
        let resp: PriceResponse = self
            .client
            .get(&self.price_api)
            .send()
            .await?
            .json()
            .await?;

        let prices: HashMap<String, f64> = resp
            .data
            .into_iter()
            .filter(|(mint, _)| mints.iter().any(|m| m == mint))
            .map(|(mint, entry)| (mint, entry.price))
            .collect();

        debug!(requested = mints.len(), priced = prices.len(), "prices fetched");
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_response() {
        let json = r#"{
            "data": {
                "So11111111111111111111111111111111111111112": {
                    "id": "So11111111111111111111111111111111111111112",
                    "mintSymbol": "SOL",
                    "price": 147.23
                }
            },
            "timeTaken": 0.002
        }"#;
        let resp: PriceResponse = serde_json::from_str(json).unwrap();
        let entry = &resp.data["So11111111111111111111111111111111111111112"];
        assert_eq!(entry.price, 147.23);
    }

    #[test]
    fn test_parse_empty_data() {
        let resp: PriceResponse = serde_json::from_str(r#"{"timeTaken": 0.001}"#).unwrap();
        assert!(resp.data.is_empty());
    }
}
