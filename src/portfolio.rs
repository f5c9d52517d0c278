//! Portfolio model: wallet snapshot, token holdings, USD valuation and the
//! size/risk buckets that drive recommendation selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::wallet;

/// Wrapped-SOL mint, used to price the native balance.
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Well-known mint -> symbol table (the common mainnet tokens this advisor
/// can speak about). Unknown mints render as a shortened mint string.
pub fn symbol_for_mint(mint: &str) -> Option<&'static str> {
    match mint {
        "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v" => Some("USDC"),
        "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB" => Some("USDT"),
        "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263" => Some("BONK"),
        WSOL_MINT => Some("SOL"),
        "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R" => Some("RAY"),
        "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN" => Some("JUP"),
        "orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE" => Some("ORCA"),
        "MangoCzJ36AjZyKwVj3VnYU4GOnOGMVzVhR7c3SBF9Qi" => Some("MNGO"),
        _ => None,
    }
}

/// A single SPL token holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenHolding {
    pub mint: String,
    pub symbol: Option<String>,
    /// Raw amount in base units.
    pub amount: u64,
    pub decimals: u8,
    /// Amount adjusted for decimals.
    pub ui_amount: f64,
}

impl TokenHolding {
    /// Symbol for display, falling back to a shortened mint.
    pub fn display_symbol(&self) -> String {
        match &self.symbol {
            Some(s) => s.clone(),
            None => {
                if self.mint.len() > 8 {
                    format!("{}...", &self.mint[..8])
                } else {
                    self.mint.clone()
                }
            }
        }
    }
}

/// Raw wallet data as fetched from an RPC endpoint or the explorer fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: String,
    /// Native balance in SOL (lamports / 1e9).
    pub sol_balance: f64,
    pub holdings: Vec<TokenHolding>,
    /// Which endpoint or fallback API served the data.
    pub source: String,
}

/// Portfolio size bucket, drives the staking strategy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioSize {
    Small,
    Medium,
    Large,
}

impl PortfolioSize {
    pub fn from_value_usd(value: f64) -> Self {
        if value < 1_000.0 {
            PortfolioSize::Small
        } else if value < 10_000.0 {
            PortfolioSize::Medium
        } else {
            PortfolioSize::Large
        }
    }
}

/// Risk tolerance bucket, drives the allocation strategy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskTolerance {
    pub fn from_value_usd(value: f64) -> Self {
        if value < 1_000.0 {
            RiskTolerance::Conservative
        } else if value > 10_000.0 {
            RiskTolerance::Aggressive
        } else {
            RiskTolerance::Balanced
        }
    }
}

/// A priced wallet portfolio ready for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub address: String,
    pub sol_balance: f64,
    pub holdings: Vec<TokenHolding>,
    /// Sum of priced holdings plus the native balance. Holdings without a
    /// known price contribute zero.
    pub total_value_usd: f64,
    pub source: String,
}

impl Portfolio {
    /// Price a snapshot and resolve well-known symbols.
    pub fn build(snapshot: WalletSnapshot, prices: &HashMap<String, f64>) -> Self {
        let mut holdings = snapshot.holdings;
        let mut total = snapshot.sol_balance * prices.get(WSOL_MINT).copied().unwrap_or(0.0);

        for holding in &mut holdings {
            if holding.symbol.is_none() {
                holding.symbol = symbol_for_mint(&holding.mint).map(str::to_string);
            }
            if let Some(price) = prices.get(&holding.mint) {
                total += holding.ui_amount * price;
            }
        }

        Self {
            address: snapshot.address,
            sol_balance: snapshot.sol_balance,
            holdings,
            total_value_usd: total,
            source: snapshot.source,
        }
    }

    pub fn token_count(&self) -> usize {
        self.holdings.len()
    }

    pub fn size(&self) -> PortfolioSize {
        PortfolioSize::from_value_usd(self.total_value_usd)
    }

    pub fn risk_tolerance(&self) -> RiskTolerance {
        RiskTolerance::from_value_usd(self.total_value_usd)
    }

    /// Symbols held, including SOL itself when the native balance is non-zero.
    pub fn held_symbols(&self) -> Vec<String> {
        let mut symbols = Vec::new();
        if self.sol_balance > 0.0 {
            symbols.push("SOL".to_string());
        }
        for holding in &self.holdings {
            symbols.push(holding.display_symbol());
        }
        symbols
    }

    pub fn short_address(&self) -> String {
        wallet::shorten(&self.address)
    }
}
