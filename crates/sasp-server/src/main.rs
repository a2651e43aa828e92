//! SASP server daemon
//!
//! Accepts QUIC connections carrying a media and a control stream and
//! answers commands on the control stream.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sasp_core::config::{self, ServerConfig};
use sasp_protocol::RoleBinding;
use sasp_server::lifecycle::install_signal_handlers;
use sasp_server::meta::{bind_meta_listener, run_meta_server};
use sasp_server::{SaspServer, ServerLifecycle, ServerState, TlsIdentity};

#[derive(Parser)]
#[command(name = "sasp-server")]
#[command(about = "SASP QUIC server")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// QUIC bind address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Meta HTTP bind address (overrides config)
    #[arg(short, long)]
    meta: Option<String>,

    /// Stream role binding: announced or accept_order (overrides config)
    #[arg(long)]
    role_binding: Option<RoleBinding>,

    /// Do not start the meta HTTP server
    #[arg(long)]
    no_meta: bool,

    /// Run in foreground with verbose output
    #[arg(short, long)]
    foreground: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.foreground { "debug" } else { &args.log_level };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("SASP server starting...");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(meta) = args.meta {
        config.meta_address = meta;
    }
    if let Some(role_binding) = args.role_binding {
        config.role_binding = role_binding;
    }
    config.validate().context("Invalid configuration")?;

    let lifecycle = ServerLifecycle::new();
    install_signal_handlers(lifecycle.clone());

    let identity = TlsIdentity::generate_self_signed(&config.certificate_names)?;

    let meta_listener = if args.no_meta {
        None
    } else {
        Some(bind_meta_listener(&config.meta_address).await?)
    };

    let state = Arc::new(ServerState::with_lifecycle(config, lifecycle.clone()));
    tracing::info!("Stream role binding: {}", state.config.role_binding);

    let server = SaspServer::bind(Arc::clone(&state), &identity)?;

    let meta_task = meta_listener.map(|listener| {
        let lifecycle = lifecycle.clone();
        tokio::spawn(async move {
            if let Err(e) = run_meta_server(listener, lifecycle.clone()).await {
                tracing::error!("{:#}", e);
                lifecycle.shutdown();
            }
        })
    });

    let result = server.run().await;
    // The listener can also stop on its own; make sure the meta server follows
    lifecycle.shutdown();

    if let Some(task) = meta_task {
        if let Err(e) = task.await {
            tracing::error!("Meta server task failed: {}", e);
        }
    }

    result?;
    tracing::info!("SASP server shutdown complete");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<ServerConfig> {
    match path {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let default_path = config::default_server_config_path();
            Ok(config::load_or_default(&default_path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                ServerConfig::default()
            }))
        }
    }
}
