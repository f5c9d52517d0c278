//! Recommendation engine: turns a priced portfolio, staking opportunities
//! and knowledge-base facts into a prioritized recommendation list.

use serde::{Deserialize, Serialize};

use crate::config::AdvisorConfig;
use crate::knowledge::{KnowledgeBase, MarketTrend, RiskFactor, RiskLevel};
use crate::portfolio::Portfolio;
use crate::providers::staking::{best_opportunity, StakingOpportunity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Staking,
    Allocation,
    MarketTiming,
    YieldFarming,
    RiskManagement,
    Diversification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub action: String,
    pub description: String,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_annual_return: Option<f64>,
}

/// Per-asset risk entry produced by [`Advisor::risk_report`].
#[derive(Debug, Clone, Serialize)]
pub struct AssetRisk {
    pub symbol: String,
    pub risk_level: Option<RiskLevel>,
    pub risk_factor: Option<RiskFactor>,
}

pub struct Advisor {
    knowledge: KnowledgeBase,
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(knowledge: KnowledgeBase, config: AdvisorConfig) -> Self {
        Self { knowledge, config }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Generate the full recommendation list for a portfolio.
    pub fn generate(
        &self,
        portfolio: &Portfolio,
        staking_ops: &[StakingOpportunity],
        market_trend: Option<MarketTrend>,
    ) -> Vec<Recommendation> {
        let mut recs = Vec::new();

        // Direct staking recommendation for wallets holding enough SOL.
        if portfolio.sol_balance > self.config.staking_min_sol {
            if let Some(best) = best_opportunity(staking_ops) {
                let amount = (portfolio.sol_balance * self.config.stake_fraction)
                    .min(self.config.stake_cap_sol);
                recs.push(Recommendation {
                    kind: RecommendationKind::Staking,
                    priority: Priority::High,
                    action: format!("Stake {:.2} SOL", amount),
                    description: best.description.clone(),
                    reasoning: "High APY staking opportunity with reputable validator"
                        .to_string(),
                    estimated_annual_return: Some(amount * best.apy / 100.0),
                });
            }
        }

        recs.push(Recommendation {
            kind: RecommendationKind::Staking,
            priority: Priority::High,
            action: "Optimize Staking Strategy".to_string(),
            description: self.knowledge.staking_strategy(portfolio.size()).to_string(),
            reasoning: "Based on your portfolio size and the Solana knowledge base"
                .to_string(),
            estimated_annual_return: None,
        });

        recs.push(Recommendation {
            kind: RecommendationKind::Allocation,
            priority: Priority::Medium,
            action: "DeFi Allocation Strategy".to_string(),
            description: self
                .knowledge
                .allocation(portfolio.risk_tolerance())
                .to_string(),
            reasoning: "Knowledge base suggests this allocation for your risk profile"
                .to_string(),
            estimated_annual_return: None,
        });

        if let Some(trend) = market_trend {
            recs.push(Recommendation {
                kind: RecommendationKind::MarketTiming,
                priority: Priority::Medium,
                action: "Market-Based Strategy".to_string(),
                description: self.knowledge.market_playbook(trend).to_string(),
                reasoning: "Current market conditions suggest this approach".to_string(),
                estimated_annual_return: None,
            });
        }

        if let Some((_, desc)) = self.knowledge.yield_strategies().first() {
            recs.push(Recommendation {
                kind: RecommendationKind::YieldFarming,
                priority: Priority::Medium,
                action: "Yield Optimization".to_string(),
                description: desc.to_string(),
                reasoning: "Knowledge base identifies yield opportunities".to_string(),
                estimated_annual_return: None,
            });
        }

        recs.push(Recommendation {
            kind: RecommendationKind::RiskManagement,
            priority: Priority::High,
            action: "Risk Mitigation".to_string(),
            description: self
                .knowledge
                .risk_mitigation(RiskFactor::HighVolatility)
                .to_string(),
            reasoning: "Volatility is the dominant risk in crypto portfolios".to_string(),
            estimated_annual_return: None,
        });

        if portfolio.token_count() < self.config.min_token_diversity {
            recs.push(Recommendation {
                kind: RecommendationKind::Diversification,
                priority: Priority::Medium,
                action: "Diversify portfolio".to_string(),
                description: "Consider adding more tokens to diversify risk".to_string(),
                reasoning: format!(
                    "Current portfolio has only {} tokens. Diversification reduces risk.",
                    portfolio.token_count()
                ),
                estimated_annual_return: None,
            });
        }

        recs
    }

    /// Per-held-asset risk assessment from the knowledge base.
    pub fn risk_report(&self, portfolio: &Portfolio) -> Vec<AssetRisk> {
        portfolio
            .held_symbols()
            .into_iter()
            .map(|symbol| {
                let fact = self.knowledge.asset_info(&symbol);
                AssetRisk {
                    risk_level: fact.map(|f| f.risk),
                    risk_factor: fact.and_then(|f| f.category.risk_factor()),
                    symbol,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{TokenHolding, WalletSnapshot};
    use crate::providers::staking::fallback_opportunities;
    use std::collections::HashMap;

    fn advisor() -> Advisor {
        Advisor::new(KnowledgeBase::builtin(), AdvisorConfig::default())
    }

    fn portfolio(sol: f64, holdings: Vec<TokenHolding>) -> Portfolio {
        Portfolio::build(
            WalletSnapshot {
                address: "7pQHLgaTrP25TjmSaoGvTJJKeS2ZyGT2xAAvYLHsSXtk".to_string(),
                sol_balance: sol,
                holdings,
                source: "test".to_string(),
            },
            &HashMap::new(),
        )
    }

    fn holding(mint: &str, symbol: &str) -> TokenHolding {
        TokenHolding {
            mint: mint.to_string(),
            symbol: Some(symbol.to_string()),
            amount: 1_000_000,
            decimals: 6,
            ui_amount: 1.0,
        }
    }

    #[test]
    fn test_staking_recommendation_when_enough_sol() {
        let recs = advisor().generate(&portfolio(5.0, vec![]), &fallback_opportunities(), None);

        let staking = recs
            .iter()
            .find(|r| r.estimated_annual_return.is_some())
            .expect("direct staking recommendation");
        // 5.0 * 0.8 = 4.0 staked with the 7.2% APY best opportunity
        assert_eq!(staking.action, "Stake 4.00 SOL");
        assert!((staking.estimated_annual_return.unwrap() - 4.0 * 7.2 / 100.0).abs() < 1e-9);
        assert_eq!(staking.priority, Priority::High);
    }

    #[test]
    fn test_stake_amount_capped() {
        let recs = advisor().generate(&portfolio(50.0, vec![]), &fallback_opportunities(), None);
        let staking = recs
            .iter()
            .find(|r| r.estimated_annual_return.is_some())
            .unwrap();
        assert_eq!(staking.action, "Stake 10.00 SOL");
    }

    #[test]
    fn test_no_direct_staking_below_minimum() {
        let recs = advisor().generate(&portfolio(0.5, vec![]), &fallback_opportunities(), None);
        assert!(recs.iter().all(|r| r.estimated_annual_return.is_none()));
    }

    #[test]
    fn test_no_direct_staking_without_opportunities() {
        let recs = advisor().generate(&portfolio(5.0, vec![]), &[], None);
        assert!(recs.iter().all(|r| r.estimated_annual_return.is_none()));
    }

    #[test]
    fn test_diversification_below_threshold() {
        let recs = advisor().generate(&portfolio(1.0, vec![]), &[], None);
        assert!(recs
            .iter()
            .any(|r| r.kind == RecommendationKind::Diversification));
    }

    #[test]
    fn test_no_diversification_with_enough_tokens() {
        let holdings = vec![
            holding("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC"),
            holding("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", "USDT"),
            holding("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "BONK"),
        ];
        let recs = advisor().generate(&portfolio(1.0, holdings), &[], None);
        assert!(!recs
            .iter()
            .any(|r| r.kind == RecommendationKind::Diversification));
    }

    #[test]
    fn test_market_timing_only_with_trend() {
        let adv = advisor();
        let p = portfolio(1.0, vec![]);
        let without = adv.generate(&p, &[], None);
        assert!(!without
            .iter()
            .any(|r| r.kind == RecommendationKind::MarketTiming));

        let with = adv.generate(&p, &[], Some(MarketTrend::Bear));
        let market = with
            .iter()
            .find(|r| r.kind == RecommendationKind::MarketTiming)
            .unwrap();
        assert!(market.description.contains("stablecoin"));
    }

    #[test]
    fn test_knowledge_recommendations_always_present() {
        let recs = advisor().generate(&portfolio(0.0, vec![]), &[], None);
        assert!(recs.iter().any(|r| r.action == "Optimize Staking Strategy"));
        assert!(recs.iter().any(|r| r.action == "DeFi Allocation Strategy"));
        assert!(recs.iter().any(|r| r.action == "Yield Optimization"));
        assert!(recs.iter().any(|r| r.action == "Risk Mitigation"));
    }

    #[test]
    fn test_risk_report() {
        let holdings = vec![holding(
            "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
            "BONK",
        )];
        let report = advisor().risk_report(&portfolio(2.0, holdings));

        assert_eq!(report.len(), 2); // SOL + BONK
        let bonk = report.iter().find(|r| r.symbol == "BONK").unwrap();
        assert_eq!(bonk.risk_level, Some(RiskLevel::High));
        assert_eq!(bonk.risk_factor, Some(RiskFactor::HighVolatility));

        let sol = report.iter().find(|r| r.symbol == "SOL").unwrap();
        assert_eq!(sol.risk_level, Some(RiskLevel::Medium));
        assert_eq!(sol.risk_factor, None);
    }

    #[test]
    fn test_risk_report_unknown_asset() {
        let holdings = vec![TokenHolding {
            mint: "UnknownMint11111111111111111111111111111111".to_string(),
            symbol: None,
            amount: 1,
            decimals: 0,
            ui_amount: 1.0,
        }];
        let report = advisor().risk_report(&portfolio(0.0, holdings));
        assert_eq!(report.len(), 1);
        assert!(report[0].risk_level.is_none());
    }
}
