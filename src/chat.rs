//! MQTT chat transport.
//!
//! Sessions live under `solsage/sessions/{sender}/in|out`; the sender
//! identity is the topic's session segment. Agent heartbeats and analysis
//! results go to `solsage/agents/{agent_id}/reports`.

use chrono::{DateTime, Utc};
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::MqttConfig;

/// One piece of chat content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatContent {
    Text { text: String },
    StartSession,
    EndSession,
    /// Unrecognized content kinds parse to this and are ignored.
    #[serde(other)]
    Unknown,
}

/// A chat message, inbound or outbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub msg_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub content: Vec<ChatContent>,
}

impl ChatMessage {
    /// A fresh message with a single text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            msg_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            content: vec![ChatContent::Text { text: text.into() }],
        }
    }
}

/// Acknowledgement for an inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAck {
    pub acknowledged_msg_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Agent-to-orchestrator report envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReport {
    pub agent_id: String,
    pub report_type: String, // "result", "error", "heartbeat"
    pub payload: serde_json::Value,
    pub timestamp: u64,
}

pub struct ChatClient {
    client: AsyncClient,
    agent_id: String,
}

impl ChatClient {
    /// Create a new chat client.
    pub fn new(
        config: &MqttConfig,
        agent_id: String,
    ) -> Result<(Self, EventLoop), Box<dyn std::error::Error>> {
        let mut mqttoptions =
            MqttOptions::new(format!("solsage-{}", agent_id), &config.broker, config.port);
        mqttoptions.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, eventloop) = AsyncClient::new(mqttoptions, 100);

        Ok((Self { client, agent_id }, eventloop))
    }

    /// Subscribe to inbound session messages and broadcasts.
    pub async fn subscribe(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.client
            .subscribe("solsage/sessions/+/in", QoS::AtLeastOnce)
            .await?;

        self.client
            .subscribe("solsage/broadcast".to_string(), QoS::AtLeastOnce)
            .await?;

        info!(agent_id = %self.agent_id, "subscribed to chat topics");
        Ok(())
    }

    /// Publish a message to a session's outbound topic.
    pub async fn send_message(
        &self,
        sender: &str,
        message: &ChatMessage,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let payload = serde_json::to_vec(message)?;
        self.client
            .publish(
                format!("solsage/sessions/{}/out", sender),
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .await?;
        Ok(())
    }

    /// Publish a single text reply.
    pub async fn send_text(
        &self,
        sender: &str,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.send_message(sender, &ChatMessage::text(text)).await
    }

    /// Acknowledge an inbound message.
    pub async fn ack(
        &self,
        sender: &str,
        msg_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let ack = ChatAck {
            acknowledged_msg_id: msg_id,
            timestamp: Utc::now(),
        };
        let payload = serde_json::to_vec(&ack)?;
        self.client
            .publish(
                format!("solsage/sessions/{}/ack", sender),
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .await?;
        Ok(())
    }

    /// Publish a report to the orchestrator.
    pub async fn publish_report(
        &self,
        report_type: &str,
        payload: serde_json::Value,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let report = AgentReport {
            agent_id: self.agent_id.clone(),
            report_type: report_type.to_string(),
            payload,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)?
                .as_secs(),
        };

        let payload = serde_json::to_vec(&report)?;
        self.client
            .publish(
                format!("solsage/agents/{}/reports", self.agent_id),
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .await?;

        Ok(())
    }
}

/// Parse an inbound payload as a ChatMessage.
pub fn parse_message(payload: &[u8]) -> Result<ChatMessage, serde_json::Error> {
    serde_json::from_slice(payload)
}

/// Extract the sender segment from an inbound session topic.
pub fn sender_from_topic(topic: &str) -> Option<&str> {
    let mut parts = topic.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("solsage"), Some("sessions"), Some(sender), Some("in")) if !sender.is_empty() => {
            Some(sender)
        }
        _ => None,
    }
}
