use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Unique agent identifier
    pub agent_id: String,

    /// MQTT broker configuration
    pub mqtt: MqttConfig,

    /// Solana RPC configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Price and staking data sources
    #[serde(default)]
    pub market: MarketConfig,

    /// Recommendation thresholds
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Directory for chat transcripts (disabled when unset)
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_endpoints")]
    pub endpoints: Vec<String>,
    #[serde(default = "default_fallback_api")]
    pub fallback_api: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window")]
    pub window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_price_api")]
    pub price_api: String,
    #[serde(default = "default_staking_sources")]
    pub staking_sources: Vec<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Minimum SOL balance before a direct staking recommendation fires
    #[serde(default = "default_staking_min_sol")]
    pub staking_min_sol: f64,
    /// Fraction of the balance to suggest staking
    #[serde(default = "default_stake_fraction")]
    pub stake_fraction: f64,
    /// Hard cap on the suggested stake, in SOL
    #[serde(default = "default_stake_cap_sol")]
    pub stake_cap_sol: f64,
    /// Below this many tokens the advisor suggests diversifying
    #[serde(default = "default_min_token_diversity")]
    pub min_token_diversity: usize,
    /// Holdings listed in the stats reply
    #[serde(default = "default_max_holdings_shown")]
    pub max_holdings_shown: usize,
}

fn default_keep_alive() -> u64 {
    30
}

fn default_rpc_endpoints() -> Vec<String> {
    vec![
        "https://api.mainnet-beta.solana.com".to_string(),
        "https://solana-api.projectserum.com".to_string(),
        "https://rpc.ankr.com/solana".to_string(),
    ]
}

fn default_fallback_api() -> String {
    "https://api.solscan.io/account".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_requests() -> u32 {
    100
}

fn default_window() -> u64 {
    10
}

fn default_price_api() -> String {
    "https://price.jup.ag/v4/price".to_string()
}

fn default_staking_sources() -> Vec<String> {
    vec!["https://api.solanabeach.io/v1/validators".to_string()]
}

fn default_staking_min_sol() -> f64 {
    1.0
}

fn default_stake_fraction() -> f64 {
    0.8
}

fn default_stake_cap_sol() -> f64 {
    10.0
}

fn default_min_token_diversity() -> usize {
    3
}

fn default_max_holdings_shown() -> usize {
    10
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoints: default_rpc_endpoints(),
            fallback_api: default_fallback_api(),
            timeout_secs: default_timeout(),
            max_requests: default_max_requests(),
            window_secs: default_window(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_api: default_price_api(),
            staking_sources: default_staking_sources(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            staking_min_sol: default_staking_min_sol(),
            stake_fraction: default_stake_fraction(),
            stake_cap_sol: default_stake_cap_sol(),
            min_token_diversity: default_min_token_diversity(),
            max_holdings_shown: default_max_holdings_shown(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(agent_id = %config.agent_id, "configuration loaded");
        Ok(config)
    }

    /// Create default configuration for an agent id
    pub fn default_agent(agent_id: String) -> Self {
        Self {
            agent_id,
            mqtt: MqttConfig {
                broker: "localhost".to_string(),
                port: 1883,
                keep_alive_secs: 30,
            },
            rpc: RpcConfig::default(),
            market: MarketConfig::default(),
            advisor: AdvisorConfig::default(),
            session_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_agent() {
        let config = Config::default_agent("advisor1".to_string());
        assert_eq!(config.agent_id, "advisor1");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.rpc.endpoints.len(), 3);
        assert_eq!(config.advisor.staking_min_sol, 1.0);
        assert!(config.session_dir.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
            agent_id = "advisor1"

            [mqtt]
            broker = "broker.example.com"
            port = 8883
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mqtt.broker, "broker.example.com");
        assert_eq!(config.mqtt.keep_alive_secs, 30);
        // Unspecified sections fall back to defaults
        assert_eq!(
            config.rpc.endpoints[0],
            "https://api.mainnet-beta.solana.com"
        );
        assert_eq!(config.market.price_api, "https://price.jup.ag/v4/price");
        assert_eq!(config.advisor.max_holdings_shown, 10);
    }

    #[test]
    fn test_parse_overrides() {
        let toml_str = r#"
            agent_id = "advisor2"
            session_dir = "/tmp/solsage"

            [mqtt]
            broker = "localhost"
            port = 1883

            [rpc]
            endpoints = ["http://127.0.0.1:8899"]

            [advisor]
            staking_min_sol = 2.5
            stake_cap_sol = 20.0
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rpc.endpoints, vec!["http://127.0.0.1:8899"]);
        assert_eq!(config.advisor.staking_min_sol, 2.5);
        assert_eq!(config.advisor.stake_cap_sol, 20.0);
        // Untouched fields keep their defaults
        assert_eq!(config.advisor.stake_fraction, 0.8);
        assert_eq!(config.session_dir, Some(PathBuf::from("/tmp/solsage")));
    }
}
