//! SASP command-line client

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sasp_client::{SaspClient, TrustPolicy};
use sasp_core::config::{self, ClientConfig};
use sasp_protocol::RoleBinding;

#[derive(Parser)]
#[command(name = "sasp-client")]
#[command(about = "Send commands to a SASP server")]
#[command(version)]
struct Args {
    /// Commands to send, in order (e.g. START STOP)
    #[arg(required = true)]
    commands: Vec<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server address (overrides config)
    #[arg(short, long, env = "SASP_SERVER")]
    server: Option<String>,

    /// Name to verify in the server certificate (overrides config)
    #[arg(long)]
    server_name: Option<String>,

    /// Stream role binding: announced or accept_order (overrides config)
    #[arg(long)]
    role_binding: Option<RoleBinding>,

    /// Skip server certificate verification
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config: ClientConfig = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => config::load_or_default(&config::default_client_config_path())?,
    };
    if let Some(server) = args.server {
        config.server_address = server;
    }
    if let Some(server_name) = args.server_name {
        config.server_name = server_name;
    }
    if let Some(role_binding) = args.role_binding {
        config.role_binding = role_binding;
    }
    config.insecure |= args.insecure;

    // The server's certificate is regenerated on every start, so there is
    // nothing to pin from the command line.
    if !config.insecure {
        anyhow::bail!("The server uses an ephemeral self-signed certificate; pass --insecure");
    }

    let mut client = SaspClient::connect(&config, TrustPolicy::Insecure)
        .await
        .with_context(|| format!("Failed to connect to {}", config.server_address))?;

    for command in &args.commands {
        let response = client
            .send_command(command.as_bytes())
            .await
            .with_context(|| format!("Command {} failed", command))?;
        println!("{}", String::from_utf8_lossy(&response));
    }

    let code = client.finish().await?;
    tracing::info!("Server closed the connection: {}", code);
    Ok(())
}
