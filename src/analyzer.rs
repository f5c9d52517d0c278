//! Wallet analysis pipeline: balances, then prices, then staking data,
//! combined into a priced portfolio ready for the advisor.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::Config;
use crate::portfolio::{Portfolio, WSOL_MINT};
use crate::providers::prices::JupiterPriceClient;
use crate::providers::rpc::SolanaRpcClient;
use crate::providers::staking::{StakingClient, StakingOpportunity};
use crate::providers::{BalanceProvider, PriceProvider, ProviderError, StakingProvider};

/// Everything the advisor needs about one wallet.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub portfolio: Portfolio,
    pub staking: Vec<StakingOpportunity>,
}

pub struct WalletAnalyzer {
    balances: Box<dyn BalanceProvider>,
    prices: Box<dyn PriceProvider>,
    staking: Box<dyn StakingProvider>,
}

impl WalletAnalyzer {
    pub fn new(config: &Config) -> Self {
        Self {
            balances: Box::new(SolanaRpcClient::new(&config.rpc)),
            prices: Box::new(JupiterPriceClient::new(&config.market)),
            staking: Box::new(StakingClient::new(&config.market)),
        }
    }

    /// Assemble an analyzer from explicit providers.
    pub fn with_providers(
        balances: Box<dyn BalanceProvider>,
        prices: Box<dyn PriceProvider>,
        staking: Box<dyn StakingProvider>,
    ) -> Self {
        Self {
            balances,
            prices,
            staking,
        }
    }

    /// Run the full pipeline for one wallet address.
    ///
    /// A balance failure fails the analysis; a price failure only degrades it
    /// (the portfolio is built unpriced).
    pub async fn analyze(&self, address: &str) -> Result<Analysis, ProviderError> {
        let snapshot = self.balances.wallet_snapshot(address).await?;
        info!(
            address = %address,
            sol_balance = snapshot.sol_balance,
            tokens = snapshot.holdings.len(),
            source = %snapshot.source,
            "wallet snapshot fetched"
        );

        let mut mints: Vec<String> = snapshot.holdings.iter().map(|h| h.mint.clone()).collect();
        mints.push(WSOL_MINT.to_string());

        let prices: HashMap<String, f64> = match self.prices.prices_for(&mints).await {
            Ok(prices) => prices,
            Err(e) => {
                warn!(error = %e, "price fetch failed, continuing unpriced");
                HashMap::new()
            }
        };

        let portfolio = Portfolio::build(snapshot, &prices);
        let staking = self.staking.opportunities().await;

        Ok(Analysis {
            portfolio,
            staking,
        })
    }
}
