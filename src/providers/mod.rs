//! Upstream data providers: Solana RPC balances, token prices, validator
//! staking data. Each provider sits behind a trait so the analyzer can be
//! exercised without the network.

pub mod prices;
pub mod rpc;
pub mod staking;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::portfolio::WalletSnapshot;
use self::staking::StakingOpportunity;

/// Errors from the provider layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("all RPC endpoints and fallback APIs failed")]
    Exhausted,
}

/// Fetches a wallet's native balance and token holdings.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn wallet_snapshot(&self, address: &str) -> Result<WalletSnapshot, ProviderError>;
}

/// Fetches USD prices for a set of mints.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn prices_for(&self, mints: &[String]) -> Result<HashMap<String, f64>, ProviderError>;
}

/// Fetches current staking opportunities. Infallible: implementations fall
/// back to a built-in table when every source is down.
#[async_trait]
pub trait StakingProvider: Send + Sync {
    async fn opportunities(&self) -> Vec<StakingOpportunity>;
}
