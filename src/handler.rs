//! Inbound chat handling: ack, dispatch per content, run the analysis
//! pipeline and reply.

use tracing::{info, warn};

use crate::agent::AdvisorAgent;
use crate::chat::{ChatContent, ChatMessage};
use crate::report;
use crate::session::{ROLE_ADVISOR, ROLE_USER};
use crate::wallet;
use crate::wallet::{MAX_ADDRESS_LEN, MIN_ADDRESS_LEN};

impl AdvisorAgent {
    /// Handle one inbound chat message. Never fails: every error path turns
    /// into a reply or a log line.
    pub async fn handle_message(&mut self, sender: &str, msg: ChatMessage) {
        // ACK first, then process
        if let Err(e) = self.chat.ack(sender, msg.msg_id).await {
            warn!(sender = %sender, error = %e, "failed to ack message");
        }

        for content in msg.content {
            match content {
                ChatContent::StartSession => {
                    info!(sender = %sender, "advisor session started");
                    self.reply(sender, &report::greeting()).await;
                }
                ChatContent::EndSession => {
                    info!(sender = %sender, "advisor session ended");
                }
                ChatContent::Text { text } => {
                    self.record(sender, ROLE_USER, &text);
                    self.handle_text(sender, &text).await;
                }
                ChatContent::Unknown => {
                    warn!(sender = %sender, "ignoring unknown chat content kind");
                }
            }
        }
    }

    /// Dispatch a text content: find an address and analyze, or explain what
    /// is missing.
    pub async fn handle_text(&mut self, sender: &str, text: &str) {
        let trimmed = text.trim();
        info!(sender = %sender, input_len = trimmed.len(), "user input received");

        match wallet::extract_address(trimmed) {
            Some(address) => {
                let address = address.to_string();
                self.run_analysis(sender, &address).await;
            }
            None if (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&trimmed.len()) => {
                // Address-shaped input that failed the alphabet check
                self.reply(sender, &report::invalid_address()).await;
            }
            None => {
                self.reply(sender, &report::missing_address()).await;
            }
        }
    }

    async fn run_analysis(&mut self, sender: &str, address: &str) {
        self.reply(sender, &report::analyzing()).await;

        match self.analyzer.analyze(address).await {
            Ok(analysis) => {
                self.metrics.record_success();
                let recs =
                    self.advisor
                        .generate(&analysis.portfolio, &analysis.staking, None);
                let text = report::analysis_reply(
                    &analysis.portfolio,
                    &recs,
                    self.config.advisor.max_holdings_shown,
                );
                self.reply(sender, &text).await;

                let insights = self
                    .advisor
                    .knowledge()
                    .insights(&analysis.portfolio, None);
                let risk = self.advisor.risk_report(&analysis.portfolio);
                let _ = self
                    .chat
                    .publish_report(
                        "result",
                        serde_json::json!({
                            "wallet": analysis.portfolio.short_address(),
                            "sol_balance": analysis.portfolio.sol_balance,
                            "total_value_usd": analysis.portfolio.total_value_usd,
                            "recommendations": recs.len(),
                            "insights": insights,
                            "risk": risk,
                        }),
                    )
                    .await;
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(address = %address, error = %e, "wallet analysis failed");
                self.reply(sender, &report::analysis_failed(&e.to_string()))
                    .await;

                let _ = self
                    .chat
                    .publish_report(
                        "error",
                        serde_json::json!({
                            "wallet": wallet::shorten(address),
                            "error": e.to_string(),
                        }),
                    )
                    .await;
            }
        }
    }

    /// Send a text reply and record it in the transcript.
    async fn reply(&self, sender: &str, text: &str) {
        if let Err(e) = self.chat.send_text(sender, text).await {
            warn!(sender = %sender, error = %e, "failed to send reply");
        }
        self.record(sender, ROLE_ADVISOR, text);
    }

    fn record(&self, sender: &str, role: &str, content: &str) {
        if let Some(store) = &self.transcript {
            if let Err(e) = store.append(sender, role, content) {
                warn!(error = %e, "failed to append transcript entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    async fn test_agent(session_dir: Option<std::path::PathBuf>) -> AdvisorAgent {
        let mut config = Config::default_agent("test_agent".to_string());
        config.session_dir = session_dir;
        let (agent, _eventloop) = AdvisorAgent::new(config).await.unwrap();
        agent
    }

    #[tokio::test]
    async fn test_text_without_address_replies_help() {
        let dir = TempDir::new().unwrap();
        let mut agent = test_agent(Some(dir.path().to_path_buf())).await;

        agent.handle_text("alice", "what can you do?").await;

        let entries = agent.transcript.as_ref().unwrap().load_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, ROLE_ADVISOR);
        assert!(entries[0].content.contains("I need a Solana wallet address"));
        // No analysis ran
        assert_eq!(agent.metrics.analyses_total, 0);
    }

    #[tokio::test]
    async fn test_address_shaped_garbage_replies_invalid() {
        let dir = TempDir::new().unwrap();
        let mut agent = test_agent(Some(dir.path().to_path_buf())).await;

        // 40 chars, right length but contains 0/O/l
        let bogus = "0Ol0Ol0Ol0Ol0Ol0Ol0Ol0Ol0Ol0Ol0Ol0Ol0Ol0";
        assert_eq!(bogus.len(), 40);
        agent.handle_text("alice", bogus).await;

        let entries = agent.transcript.as_ref().unwrap().load_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].content.contains("Invalid Wallet Address"));
        assert_eq!(agent.metrics.analyses_total, 0);
    }

    #[tokio::test]
    async fn test_start_session_replies_greeting() {
        let dir = TempDir::new().unwrap();
        let mut agent = test_agent(Some(dir.path().to_path_buf())).await;

        let msg = ChatMessage {
            msg_id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            content: vec![ChatContent::StartSession],
        };
        agent.handle_message("alice", msg).await;

        let entries = agent.transcript.as_ref().unwrap().load_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].content.contains("Solana Investment Advisor"));
    }

    #[tokio::test]
    async fn test_text_content_recorded_as_user() {
        let dir = TempDir::new().unwrap();
        let mut agent = test_agent(Some(dir.path().to_path_buf())).await;

        let msg = ChatMessage::text("hello there");
        agent.handle_message("bob", msg).await;

        let entries = agent.transcript.as_ref().unwrap().load_all().unwrap();
        // User entry plus the missing-address reply
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, ROLE_USER);
        assert_eq!(entries[0].content, "hello there");
        assert_eq!(entries[1].role, ROLE_ADVISOR);
    }

    #[tokio::test]
    async fn test_end_session_records_nothing() {
        let dir = TempDir::new().unwrap();
        let mut agent = test_agent(Some(dir.path().to_path_buf())).await;

        let msg = ChatMessage {
            msg_id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            content: vec![ChatContent::EndSession],
        };
        agent.handle_message("alice", msg).await;

        let entries = agent.transcript.as_ref().unwrap().load_all().unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_agent_without_transcript() {
        let mut agent = test_agent(None).await;
        // Must not panic without a transcript store
        agent.handle_text("alice", "hi").await;
        assert!(agent.transcript.is_none());
    }
}
