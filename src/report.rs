//! Reply formatting: the markdown templates the agent sends back over chat.

use crate::advisor::{Priority, Recommendation};
use crate::portfolio::Portfolio;
use crate::wallet;

const EXAMPLE_ADDRESS: &str = "7pQHLgaTrP25TjmSaoGvTJJKeS2ZyGT2xAAvYLHsSXtk";

/// Session-start greeting.
pub fn greeting() -> String {
    "🔮 **Solana Investment Advisor**\n\n\
     I'm your investment advisor for Solana wallets! I can:\n\
     • Analyze your wallet portfolio\n\
     • Provide staking recommendations\n\
     • Suggest optimal allocation moves\n\
     • Surface insights from a Solana knowledge base\n\n\
     Please provide your Solana wallet address to get started!"
        .to_string()
}

/// Progress line sent before the fetch pipeline runs.
pub fn analyzing() -> String {
    "🔍 Analyzing your Solana wallet... This may take a moment.".to_string()
}

/// Reply for input that looked like an address but failed validation.
pub fn invalid_address() -> String {
    format!(
        "❌ **Invalid Wallet Address**\n\n\
         The address you provided doesn't appear to be a valid Solana wallet address.\n\n\
         Please provide a valid Solana wallet address (32-44 characters, base58 encoded).\n\n\
         **Example:** `{}`",
        EXAMPLE_ADDRESS
    )
}

/// Reply for input with no address in it at all.
pub fn missing_address() -> String {
    format!(
        "🤔 I need a Solana wallet address to analyze your portfolio.\n\n\
         Please provide a valid Solana wallet address (32-44 characters, base58 encoded).\n\n\
         You can find your wallet address in:\n\
         • Phantom wallet\n\
         • Solflare wallet\n\
         • Any other Solana wallet\n\n\
         **Example:** `{}`",
        EXAMPLE_ADDRESS
    )
}

/// Reply when the analysis pipeline failed outright.
pub fn analysis_failed(error: &str) -> String {
    format!("❌ **Analysis Failed**\n\n{}", error)
}

/// Wallet statistics block.
pub fn wallet_stats(portfolio: &Portfolio, max_holdings: usize) -> String {
    let mut out = String::from("## 📊 Wallet Statistics\n\n");
    out.push_str(&format!(
        "**SOL Balance:** {:.4} SOL\n",
        portfolio.sol_balance
    ));
    out.push_str(&format!(
        "**Token Holdings:** {} tokens\n",
        portfolio.token_count()
    ));
    out.push_str(&format!("**Data Source:** {}\n\n", portfolio.source));

    out.push_str("### 🪙 Token Holdings\n\n");
    if portfolio.holdings.is_empty() {
        out.push_str("No token holdings found or token data unavailable.\n\n");
        return out;
    }

    for (i, holding) in portfolio.holdings.iter().take(max_holdings).enumerate() {
        out.push_str(&format!("{}. **{}**\n", i + 1, holding.display_symbol()));
        out.push_str(&format!("   - Amount: {:.6}\n", holding.ui_amount));
        out.push_str(&format!(
            "   - Mint: `{}`\n\n",
            wallet::shorten(&holding.mint)
        ));
    }

    out
}

fn priority_emoji(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// Recommendations block.
pub fn recommendations(recs: &[Recommendation]) -> String {
    if recs.is_empty() {
        return "No specific recommendations at this time.".to_string();
    }

    let mut out = String::from("## 💡 Investment Recommendations\n\n");
    for (i, rec) in recs.iter().enumerate() {
        out.push_str(&format!(
            "### {} {}. {}\n",
            priority_emoji(rec.priority),
            i + 1,
            rec.action
        ));
        out.push_str(&format!("**Description:** {}\n", rec.description));
        out.push_str(&format!("**Reasoning:** {}\n", rec.reasoning));
        if let Some(ret) = rec.estimated_annual_return {
            out.push_str(&format!("**Estimated Annual Return:** ${:.2}\n", ret));
        }
        out.push('\n');
    }

    out
}

/// The full analysis reply: header, stats, recommendations.
pub fn analysis_reply(
    portfolio: &Portfolio,
    recs: &[Recommendation],
    max_holdings: usize,
) -> String {
    format!(
        "**Wallet Analysis Complete!**\n\n**Wallet:** `{}`\n\n{}{}",
        portfolio.short_address(),
        wallet_stats(portfolio, max_holdings),
        recommendations(recs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::RecommendationKind;
    use crate::portfolio::{TokenHolding, WalletSnapshot};
    use std::collections::HashMap;

    fn sample_portfolio(holdings: Vec<TokenHolding>) -> Portfolio {
        Portfolio::build(
            WalletSnapshot {
                address: "7pQHLgaTrP25TjmSaoGvTJJKeS2ZyGT2xAAvYLHsSXtk".to_string(),
                sol_balance: 3.25,
                holdings,
                source: "https://api.mainnet-beta.solana.com".to_string(),
            },
            &HashMap::new(),
        )
    }

    fn usdc_holding() -> TokenHolding {
        TokenHolding {
            mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            symbol: Some("USDC".to_string()),
            amount: 100_000_000,
            decimals: 6,
            ui_amount: 100.0,
        }
    }

    #[test]
    fn test_greeting_mentions_address() {
        assert!(greeting().contains("wallet address"));
    }

    #[test]
    fn test_help_replies_include_example() {
        assert!(invalid_address().contains(EXAMPLE_ADDRESS));
        assert!(missing_address().contains(EXAMPLE_ADDRESS));
    }

    #[test]
    fn test_wallet_stats_empty_holdings() {
        let stats = wallet_stats(&sample_portfolio(vec![]), 10);
        assert!(stats.contains("**SOL Balance:** 3.2500 SOL"));
        assert!(stats.contains("**Token Holdings:** 0 tokens"));
        assert!(stats.contains("No token holdings found"));
    }

    #[test]
    fn test_wallet_stats_lists_holdings() {
        let stats = wallet_stats(&sample_portfolio(vec![usdc_holding()]), 10);
        assert!(stats.contains("1. **USDC**"));
        assert!(stats.contains("   - Amount: 100.000000"));
        assert!(stats.contains("`EPjFWdd5...ZwyTDt1v`"));
    }

    #[test]
    fn test_wallet_stats_truncates_to_max() {
        let holdings: Vec<TokenHolding> = (0..15)
            .map(|i| TokenHolding {
                mint: format!("Mint{:040}", i),
                symbol: None,
                amount: 1,
                decimals: 0,
                ui_amount: 1.0,
            })
            .collect();
        let stats = wallet_stats(&sample_portfolio(holdings), 10);
        assert!(stats.contains("10. **"));
        assert!(!stats.contains("11. **"));
    }

    #[test]
    fn test_recommendations_empty() {
        assert_eq!(
            recommendations(&[]),
            "No specific recommendations at this time."
        );
    }

    #[test]
    fn test_recommendations_formatting() {
        let recs = vec![Recommendation {
            kind: RecommendationKind::Staking,
            priority: Priority::High,
            action: "Stake 2.60 SOL".to_string(),
            description: "Stake with Solana Foundation for 7.20% APY".to_string(),
            reasoning: "High APY staking opportunity with reputable validator".to_string(),
            estimated_annual_return: Some(18.72),
        }];
        let text = recommendations(&recs);
        assert!(text.contains("### 🔴 1. Stake 2.60 SOL"));
        assert!(text.contains("**Estimated Annual Return:** $18.72"));
    }

    #[test]
    fn test_analysis_reply_shortens_address() {
        let reply = analysis_reply(&sample_portfolio(vec![]), &[], 10);
        assert!(reply.contains("**Wallet:** `7pQHLgaT...YLHsSXtk`"));
        assert!(reply.contains("Wallet Analysis Complete"));
    }
}
