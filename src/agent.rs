use std::time::Duration;
use tracing::{error, info, warn};

use crate::advisor::Advisor;
use crate::analyzer::WalletAnalyzer;
use crate::chat::{parse_message, sender_from_topic, ChatClient};
use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::metrics::Metrics;
use crate::session::TranscriptStore;

pub struct AdvisorAgent {
    pub config: Config,
    pub chat: ChatClient,
    pub metrics: Metrics,
    pub analyzer: WalletAnalyzer,
    pub advisor: Advisor,
    pub transcript: Option<TranscriptStore>,
}

impl AdvisorAgent {
    /// Create a new advisor agent
    pub async fn new(
        config: Config,
    ) -> Result<(Self, rumqttc::EventLoop), Box<dyn std::error::Error>> {
        let agent_id = config.agent_id.clone();

        let (chat, eventloop) = ChatClient::new(&config.mqtt, agent_id.clone())?;

        let analyzer = WalletAnalyzer::new(&config);
        let advisor = Advisor::new(KnowledgeBase::builtin(), config.advisor.clone());

        let transcript = match &config.session_dir {
            Some(dir) => match TranscriptStore::open(dir, &agent_id) {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!(error = %e, "failed to open transcript store, continuing without");
                    None
                }
            },
            None => None,
        };

        let agent = Self {
            config,
            chat,
            metrics: Metrics::new(),
            analyzer,
            advisor,
            transcript,
        };

        Ok((agent, eventloop))
    }

    /// Subscribe to chat topics
    pub async fn subscribe(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.chat.subscribe().await
    }

    /// Send heartbeat with metrics
    pub async fn heartbeat(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.metrics.increment_uptime(30); // Called every 30s
        self.metrics.update_memory();

        let metrics_json = serde_json::to_value(&self.metrics)?;
        self.chat.publish_report("heartbeat", metrics_json).await?;

        Ok(())
    }

    /// Main event loop
    pub async fn run(
        mut self,
        mut eventloop: rumqttc::EventLoop,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.subscribe().await?;
        info!("agent ready, entering main loop");

        // Heartbeat timer
        let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(30));

        loop {
            tokio::select! {
                // Process MQTT events
                event = eventloop.poll() => {
                    match event {
                        Ok(rumqttc::Event::Incoming(rumqttc::Packet::Publish(publish))) => {
                            let topic = publish.topic.clone();
                            let Some(sender) = sender_from_topic(&topic) else {
                                continue;
                            };
                            let sender = sender.to_string();
                            match parse_message(&publish.payload) {
                                Ok(msg) => self.handle_message(&sender, msg).await,
                                Err(e) => warn!(topic = %topic, error = %e, "failed to parse chat message"),
                            }
                        }
                        Ok(rumqttc::Event::Incoming(rumqttc::Packet::ConnAck(_))) => {
                            info!("connected to MQTT broker");
                        }
                        Err(e) => {
                            error!(error = %e, "MQTT error, reconnecting...");
                            tokio::time::sleep(Duration::from_secs(5)).await;
                        }
                        _ => {}
                    }
                }
                // Send heartbeat
                _ = heartbeat_interval.tick() => {
                    if let Err(e) = self.heartbeat().await {
                        warn!(error = %e, "failed to send heartbeat");
                    }
                }
            }
        }
    }
}
