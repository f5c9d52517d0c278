//! Local knowledge base of Solana ecosystem facts.
//!
//! A typed, in-process store covering assets, validators, staking and
//! allocation strategies, market playbooks, risk factors and the protocol
//! directory. The advisor consults it instead of calling out to a remote
//! reasoning service; every lookup is infallible and returns `Option`/`Vec`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::portfolio::{Portfolio, PortfolioSize, RiskTolerance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    NativeToken,
    Stablecoin,
    DefiToken,
    Memecoin,
}

impl AssetCategory {
    /// The dominant risk factor carried by assets of this category.
    pub fn risk_factor(self) -> Option<RiskFactor> {
        match self {
            AssetCategory::NativeToken => None,
            AssetCategory::Stablecoin => Some(RiskFactor::DepegRisk),
            AssetCategory::DefiToken => Some(RiskFactor::SmartContractRisk),
            AssetCategory::Memecoin => Some(RiskFactor::HighVolatility),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    HighVolatility,
    SmartContractRisk,
    DepegRisk,
    SlashingRisk,
    ImpermanentLoss,
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskFactor::HighVolatility => "high volatility",
            RiskFactor::SmartContractRisk => "smart contract risk",
            RiskFactor::DepegRisk => "depeg risk",
            RiskFactor::SlashingRisk => "slashing risk",
            RiskFactor::ImpermanentLoss => "impermanent loss",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTrend {
    Bull,
    Bear,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    Dex,
    Aggregator,
    Lending,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetFact {
    pub description: &'static str,
    pub category: AssetCategory,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidatorFact {
    pub name: &'static str,
    pub apy: f64,
    pub commission: f64,
    pub note: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProtocolFact {
    pub name: &'static str,
    pub kind: ProtocolKind,
    pub description: &'static str,
}

/// The fact store. Build once with [`KnowledgeBase::builtin`] and share.
pub struct KnowledgeBase {
    assets: HashMap<&'static str, AssetFact>,
    validators: Vec<ValidatorFact>,
    staking_strategies: HashMap<PortfolioSize, &'static str>,
    allocations: HashMap<RiskTolerance, &'static str>,
    market_playbooks: HashMap<MarketTrend, &'static str>,
    mitigations: HashMap<RiskFactor, &'static str>,
    yield_strategies: Vec<(&'static str, &'static str)>,
    protocols: Vec<ProtocolFact>,
}

impl KnowledgeBase {
    /// The built-in Solana investment knowledge set.
    pub fn builtin() -> Self {
        let mut assets = HashMap::new();
        let mut add = |symbol, description, category, risk| {
            assets.insert(
                symbol,
                AssetFact {
                    description,
                    category,
                    risk,
                },
            );
        };
        add(
            "SOL",
            "Solana native token, high performance blockchain",
            AssetCategory::NativeToken,
            RiskLevel::Medium,
        );
        add(
            "USDC",
            "USD Coin, stablecoin for trading and DeFi",
            AssetCategory::Stablecoin,
            RiskLevel::Low,
        );
        add(
            "USDT",
            "Tether, stablecoin for trading and DeFi",
            AssetCategory::Stablecoin,
            RiskLevel::Low,
        );
        add(
            "RAY",
            "Raydium token, DEX and AMM protocol",
            AssetCategory::DefiToken,
            RiskLevel::Medium,
        );
        add(
            "BONK",
            "BONK memecoin, high volatility, speculative",
            AssetCategory::Memecoin,
            RiskLevel::High,
        );
        add(
            "JUP",
            "Jupiter token, DEX aggregator",
            AssetCategory::DefiToken,
            RiskLevel::Medium,
        );
        add(
            "ORCA",
            "Orca token, user-friendly DEX",
            AssetCategory::DefiToken,
            RiskLevel::Medium,
        );
        add(
            "MNGO",
            "Mango token, lending protocol",
            AssetCategory::DefiToken,
            RiskLevel::Medium,
        );

        let validators = vec![
            ValidatorFact {
                name: "Solana Foundation",
                apy: 7.2,
                commission: 0.0,
                note: "Official validator",
            },
            ValidatorFact {
                name: "Marinade Finance",
                apy: 6.8,
                commission: 2.0,
                note: "Liquid staking",
            },
            ValidatorFact {
                name: "Jito Labs",
                apy: 6.5,
                commission: 3.0,
                note: "MEV protection",
            },
            ValidatorFact {
                name: "P2P Validator",
                apy: 6.9,
                commission: 5.0,
                note: "Professional validator",
            },
            ValidatorFact {
                name: "Everstake",
                apy: 6.7,
                commission: 4.0,
                note: "Reliable validator",
            },
        ];

        let staking_strategies = HashMap::from([
            (
                PortfolioSize::Small,
                "Under $1000, stake 50-70% with Solana Foundation",
            ),
            (
                PortfolioSize::Medium,
                "$1000-$10000, diversify staking across validators",
            ),
            (
                PortfolioSize::Large,
                "Over $10000, use liquid staking and DeFi strategies",
            ),
        ]);

        let allocations = HashMap::from([
            (
                RiskTolerance::Conservative,
                "70% SOL staking, 20% stablecoins, 10% DeFi",
            ),
            (
                RiskTolerance::Balanced,
                "50% SOL staking, 30% DeFi tokens, 20% stablecoins",
            ),
            (
                RiskTolerance::Aggressive,
                "30% SOL staking, 50% DeFi tokens, 20% memecoins",
            ),
        ]);

        let market_playbooks = HashMap::from([
            (
                MarketTrend::Bull,
                "Focus on growth tokens, reduce stablecoin allocation",
            ),
            (
                MarketTrend::Bear,
                "Increase stablecoin allocation, focus on staking",
            ),
            (
                MarketTrend::Sideways,
                "DCA strategies, yield farming, balanced allocation",
            ),
        ]);

        let mitigations = HashMap::from([
            (
                RiskFactor::HighVolatility,
                "Diversify, set stop losses, small position sizes",
            ),
            (
                RiskFactor::SmartContractRisk,
                "Use audited protocols, start with small amounts",
            ),
            (
                RiskFactor::DepegRisk,
                "Diversify across multiple stablecoins",
            ),
            (
                RiskFactor::SlashingRisk,
                "Choose reputable validators, monitor performance",
            ),
            (
                RiskFactor::ImpermanentLoss,
                "Use stable pairs, monitor ratios",
            ),
        ]);

        let yield_strategies = vec![
            (
                "lending",
                "Supply assets to lending protocols for interest",
            ),
            (
                "liquidity_provision",
                "Provide liquidity to DEX pools for trading fees",
            ),
            (
                "leveraged_staking",
                "Use liquid staking tokens for additional yield",
            ),
        ];

        let protocols = vec![
            ProtocolFact {
                name: "Raydium",
                kind: ProtocolKind::Dex,
                description: "AMM DEX, high liquidity, farming rewards",
            },
            ProtocolFact {
                name: "Orca",
                kind: ProtocolKind::Dex,
                description: "User-friendly DEX, concentrated liquidity",
            },
            ProtocolFact {
                name: "Serum",
                kind: ProtocolKind::Dex,
                description: "Order book DEX, professional trading",
            },
            ProtocolFact {
                name: "Jupiter",
                kind: ProtocolKind::Aggregator,
                description: "DEX aggregator, best price routing",
            },
            ProtocolFact {
                name: "Mango Markets",
                kind: ProtocolKind::Lending,
                description: "Lending and borrowing, leveraged trading",
            },
            ProtocolFact {
                name: "Solend",
                kind: ProtocolKind::Lending,
                description: "Lending protocol, supply and borrow assets",
            },
            ProtocolFact {
                name: "Kamino Finance",
                kind: ProtocolKind::Lending,
                description: "Leveraged yield farming, automated strategies",
            },
        ];

        Self {
            assets,
            validators,
            staking_strategies,
            allocations,
            market_playbooks,
            mitigations,
            yield_strategies,
            protocols,
        }
    }

    pub fn asset_info(&self, symbol: &str) -> Option<&AssetFact> {
        self.assets.get(symbol.to_uppercase().as_str())
    }

    pub fn risk_level(&self, symbol: &str) -> Option<RiskLevel> {
        self.asset_info(symbol).map(|a| a.risk)
    }

    pub fn validators(&self) -> &[ValidatorFact] {
        &self.validators
    }

    pub fn staking_strategy(&self, size: PortfolioSize) -> &'static str {
        self.staking_strategies[&size]
    }

    pub fn allocation(&self, tolerance: RiskTolerance) -> &'static str {
        self.allocations[&tolerance]
    }

    pub fn market_playbook(&self, trend: MarketTrend) -> &'static str {
        self.market_playbooks[&trend]
    }

    pub fn risk_mitigation(&self, factor: RiskFactor) -> &'static str {
        self.mitigations[&factor]
    }

    pub fn yield_strategies(&self) -> &[(&'static str, &'static str)] {
        &self.yield_strategies
    }

    pub fn protocols(&self, kind: ProtocolKind) -> Vec<&ProtocolFact> {
        self.protocols.iter().filter(|p| p.kind == kind).collect()
    }

    pub fn protocol_info(&self, name: &str) -> Option<&ProtocolFact> {
        self.protocols.iter().find(|p| p.name == name)
    }

    /// Human-readable insight lines for a portfolio: per-asset description
    /// and risk, then strategy lines keyed off the portfolio's buckets.
    pub fn insights(&self, portfolio: &Portfolio, trend: Option<MarketTrend>) -> Vec<String> {
        let mut lines = Vec::new();

        for symbol in portfolio.held_symbols() {
            if let Some(fact) = self.asset_info(&symbol) {
                lines.push(format!("Asset {}: {}", symbol, fact.description));
                lines.push(format!("Risk level for {}: {}", symbol, fact.risk));
            }
        }

        lines.push(format!(
            "Staking strategy: {}",
            self.staking_strategy(portfolio.size())
        ));
        lines.push(format!(
            "DeFi allocation: {}",
            self.allocation(portfolio.risk_tolerance())
        ));
        if let Some(trend) = trend {
            lines.push(format!("Market strategy: {}", self.market_playbook(trend)));
        }
        if let Some((_, desc)) = self.yield_strategies.first() {
            lines.push(format!("Yield opportunities: {}", desc));
        }

        lines
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
