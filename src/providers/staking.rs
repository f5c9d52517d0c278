//! Staking opportunity client: validator APY data with a built-in fallback
//! table so the advisor always has something to recommend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use super::StakingProvider;
use crate::config::MarketConfig;

const DEFAULT_APY: f64 = 7.5;
const DEFAULT_COMMISSION: f64 = 5.0;
const MAX_VALIDATORS: usize = 10;

/// A staking opportunity surfaced to the advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingOpportunity {
    pub name: String,
    pub apy: f64,
    pub commission: f64,
    pub vote_account: Option<String>,
    pub description: String,
}

impl StakingOpportunity {
    fn new(name: String, apy: f64, commission: f64, vote_account: Option<String>) -> Self {
        let description = format!("Stake with {} for {:.2}% APY", name, apy);
        Self {
            name,
            apy,
            commission,
            vote_account,
            description,
        }
    }
}

/// Highest-APY opportunity, if any.
pub fn best_opportunity(ops: &[StakingOpportunity]) -> Option<&StakingOpportunity> {
    ops.iter().max_by(|a, b| a.apy.total_cmp(&b.apy))
}

#[derive(Debug, Deserialize)]
struct ValidatorsResponse {
    validators: Vec<ValidatorEntry>,
}

#[derive(Debug, Deserialize)]
struct ValidatorEntry {
    name: Option<String>,
    apy: Option<f64>,
    commission: Option<f64>,
    vote_account: Option<String>,
}

pub struct StakingClient {
    client: Client,
    sources: Vec<String>,
}

impl StakingClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("failed to create HTTP client"),
            sources: config.staking_sources.clone(),
        }
    }

    async fn fetch_from(&self, source: &str) -> Result<Vec<StakingOpportunity>, super::ProviderError> {
        let resp: ValidatorsResponse = self.client.get(source).send().await?.json().await?;
        let ops = resp
            .validators
            .into_iter()
            .take(MAX_VALIDATORS)
            .map(|v| {
                StakingOpportunity::new(
                    v.name.unwrap_or_else(|| "Unknown".to_string()),
                    v.apy.unwrap_or(DEFAULT_APY),
                    v.commission.unwrap_or(DEFAULT_COMMISSION),
                    v.vote_account,
                )
            })
            .collect();
        Ok(ops)
    }
}

/// Built-in fallback opportunities, used when every source is unreachable
/// or returns an unrecognized shape.
pub fn fallback_opportunities() -> Vec<StakingOpportunity> {
    vec![
        StakingOpportunity::new(
            "Solana Foundation".to_string(),
            7.2,
            0.0,
            Some("Vote111111111111111111111111111111111111111".to_string()),
        ),
        StakingOpportunity::new(
            "Marinade Finance".to_string(),
            6.8,
            2.0,
            Some("MarBmsSgKXdrN1egZf5sqe1TMai9K1rChYNDJgjq7aD".to_string()),
        ),
        StakingOpportunity::new(
            "Jito Labs".to_string(),
            6.5,
            3.0,
            Some("Jito4APyf642JPZPx3hGc6WWJ8zPKtRbR4Xe2q7WnK".to_string()),
        ),
    ]
}

#[async_trait]
impl StakingProvider for StakingClient {
    async fn opportunities(&self) -> Vec<StakingOpportunity> {
        for source in &self.sources {
            match self.fetch_from(source).await {
                Ok(ops) if !ops.is_empty() => return ops,
                Ok(_) => {
                    warn!(source = %source, "staking source returned no validators");
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "staking source failed");
                }
            }
        }
        fallback_opportunities()
    }
}
