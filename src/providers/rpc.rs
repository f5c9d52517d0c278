//! Solana JSON-RPC client with endpoint failover and an explorer-API
//! fallback for the native balance.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{BalanceProvider, ProviderError};
use crate::config::RpcConfig;
use crate::portfolio::{TokenHolding, WalletSnapshot};

/// SPL Token program id; owner-scoped token account queries filter on it.
pub const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Sliding-window rate limiter shared by all outbound requests.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

#[derive(Debug)]
struct RateLimiterInner {
    max_requests: u32,
    window: Duration,
    timestamps: Vec<Instant>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                max_requests,
                window,
                timestamps: Vec::new(),
            })),
        }
    }

    pub async fn acquire(&self) {
        loop {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();
            let window = inner.window;
            inner.timestamps.retain(|&ts| now.duration_since(ts) < window);
            if (inner.timestamps.len() as u32) < inner.max_requests {
                inner.timestamps.push(now);
                return;
            }
            let oldest = inner.timestamps[0];
            let wait = window - now.duration_since(oldest);
            drop(inner);
            tokio::time::sleep(wait).await;
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// `getBalance` / `getTokenAccountsByOwner` wrap their payload in a
/// context-carrying `value` object.
#[derive(Debug, Deserialize)]
struct RpcValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    account: AccountData,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    data: ParsedData,
}

#[derive(Debug, Deserialize)]
struct ParsedData {
    parsed: ParsedPayload,
}

#[derive(Debug, Deserialize)]
struct ParsedPayload {
    info: TokenAccountInfo,
}

#[derive(Debug, Deserialize)]
struct TokenAccountInfo {
    mint: String,
    #[serde(rename = "tokenAmount")]
    token_amount: TokenAmount,
}

#[derive(Debug, Deserialize)]
struct TokenAmount {
    amount: String,
    decimals: u8,
    #[serde(rename = "uiAmount")]
    ui_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SolscanResponse {
    data: Option<SolscanData>,
}

#[derive(Debug, Deserialize)]
struct SolscanData {
    lamports: Option<u64>,
}

pub struct SolanaRpcClient {
    endpoints: Vec<String>,
    fallback_api: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl SolanaRpcClient {
    pub fn new(config: &RpcConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");
        let rate_limiter = RateLimiter::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
        );
        Self {
            endpoints: config.endpoints.clone(),
            fallback_api: config.fallback_api.clone(),
            client,
            rate_limiter,
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ProviderError> {
        self.rate_limiter.acquire().await;
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let envelope: RpcEnvelope<T> = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = envelope.error {
            return Err(ProviderError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| ProviderError::Shape("missing result".to_string()))
    }

    /// Fetch balance and token accounts from a single endpoint. Both calls
    /// must succeed on the same endpoint for the snapshot to count.
    async fn snapshot_from(
        &self,
        endpoint: &str,
        address: &str,
    ) -> Result<WalletSnapshot, ProviderError> {
        let balance: RpcValue<u64> = self
            .call(endpoint, "getBalance", serde_json::json!([address]))
            .await?;

        let accounts: RpcValue<Vec<KeyedAccount>> = self
            .call(
                endpoint,
                "getTokenAccountsByOwner",
                serde_json::json!([
                    address,
                    { "programId": SPL_TOKEN_PROGRAM },
                    { "encoding": "jsonParsed" }
                ]),
            )
            .await?;

        let holdings: Vec<TokenHolding> = accounts
            .value
            .into_iter()
            .filter_map(|keyed| {
                let info = keyed.account.data.parsed.info;
                let amount: u64 = info.token_amount.amount.parse().ok()?;
                if amount == 0 {
                    return None;
                }
                Some(TokenHolding {
                    mint: info.mint,
                    symbol: None,
                    amount,
                    decimals: info.token_amount.decimals,
                    ui_amount: info.token_amount.ui_amount.unwrap_or(0.0),
                })
            })
            .collect();

        Ok(WalletSnapshot {
            address: address.to_string(),
            sol_balance: balance.value as f64 / LAMPORTS_PER_SOL,
            holdings,
            source: endpoint.to_string(),
        })
    }

    /// Explorer API fallback: native balance only, no token accounts.
    async fn snapshot_from_fallback(
        &self,
        address: &str,
    ) -> Result<WalletSnapshot, ProviderError> {
        self.rate_limiter.acquire().await;
        let url = format!("{}?address={}", self.fallback_api, address);
        let resp: SolscanResponse = self.client.get(&url).send().await?.json().await?;
        let lamports = resp
            .data
            .and_then(|d| d.lamports)
            .ok_or_else(|| ProviderError::Shape("missing lamports".to_string()))?;

        Ok(WalletSnapshot {
            address: address.to_string(),
            sol_balance: lamports as f64 / LAMPORTS_PER_SOL,
            holdings: Vec::new(),
            source: "solscan".to_string(),
        })
    }
}

#[async_trait]
impl BalanceProvider for SolanaRpcClient {
    async fn wallet_snapshot(&self, address: &str) -> Result<WalletSnapshot, ProviderError> {
        for endpoint in &self.endpoints {
            match self.snapshot_from(endpoint, address).await {
                Ok(snapshot) => {
                    debug!(endpoint = %endpoint, "wallet snapshot fetched");
                    return Ok(snapshot);
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "RPC endpoint failed");
                }
            }
        }

        match self.snapshot_from_fallback(address).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(error = %e, "explorer fallback failed");
                Err(ProviderError::Exhausted)
            }
        }
    }
}
