use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use futures::FutureExt;
use iris_dispatch::{HandlerRegistry, Method};
use iris_dispatch_http::{config::BotConfig, run_app};
use strum::IntoEnumIterator;
use tracing::info;

/// Webhook receiver that logs every event it gets
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, env = "IRIS_CONFIG")]
    config: Option<PathBuf>,

    /// Webhook secret (required without --config)
    #[arg(long, env = "IRIS_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Bot owner id (required without --config)
    #[arg(long, env = "IRIS_USER_ID")]
    user_id: Option<i64>,

    /// Host address to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path the platform POSTs to
    #[arg(long)]
    path: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn load_config(cli: Cli) -> anyhow::Result<BotConfig> {
    let mut config = match &cli.config {
        Some(path) => BotConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let (Some(secret), Some(user_id)) = (cli.secret.clone(), cli.user_id) else {
                bail!("--secret and --user-id are required when no --config is given");
            };
            BotConfig::new(secret, user_id)
        }
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(path) = cli.path {
        config.server.path = path;
    }
    if let Some(level) = cli.log_level {
        config.dispatch.log.level = level;
    }
    Ok(config)
}

fn tap_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for method in Method::iter() {
        registry.register_fn(method, "tap", |event| {
            async move {
                info!("{:?}", event);
                Ok(())
            }
            .boxed()
        });
    }
    registry
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli)?;

    run_app(tap_registry(), config).await?;
    Ok(())
}
