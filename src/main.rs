use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use solsage_agent::agent::AdvisorAgent;
use solsage_agent::config::Config;

/// SolSage Advisor Agent - Solana wallet analysis and staking recommendations
#[derive(Parser, Debug)]
#[command(name = "solsage-agent", version, about)]
struct Args {
    /// Agent ID (unique identifier)
    #[arg(short, long)]
    id: String,

    /// Configuration file (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// MQTT broker address
    #[arg(short, long)]
    broker: Option<String>,

    /// MQTT broker port
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for chat transcripts
    #[arg(long)]
    session_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")] // Single request flow, no need for a thread pool
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default_agent(args.id.clone()),
    };

    // CLI flags win over file values
    config.agent_id = args.id;
    if let Some(broker) = args.broker {
        config.mqtt.broker = broker;
    }
    if let Some(port) = args.port {
        config.mqtt.port = port;
    }
    if let Some(dir) = args.session_dir {
        config.session_dir = Some(dir);
    }

    info!(
        agent_id = %config.agent_id,
        broker = %config.mqtt.broker,
        rpc_endpoints = config.rpc.endpoints.len(),
        "🔮 SolSage Advisor Agent starting"
    );

    let (agent, eventloop) = AdvisorAgent::new(config).await?;
    agent.run(eventloop).await
}
