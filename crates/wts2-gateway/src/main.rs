//! WTS2 Gateway: HTTP front end for directory provisioning and top-10 renumbering

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wts2_core::Wts2Config;
use wts2_gateway::{start_gateway, BindMode, ServeConfig};

#[derive(Parser)]
#[command(
    name = "wts2-gateway",
    about = "WTS2: Jira project directories and per-PI renumbering over HTTP",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Port to listen on
    #[arg(short, long, default_value = "8280")]
    port: u16,

    /// Bind mode: lan or loopback
    #[arg(short, long, default_value = "lan")]
    bind: String,

    /// TOML config file; environment variables override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as TOML (token included)
    Config,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wts2=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Some(Commands::Version) => {
            println!("wts2-gateway v{}", env!("CARGO_PKG_VERSION"));
        }

        Some(Commands::Config) => {
            let config = Wts2Config::load(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
        }

        None => {
            let config = Wts2Config::load(cli.config.as_deref())?;
            let bind = match cli.bind.as_str() {
                "loopback" | "localhost" | "127.0.0.1" => BindMode::Loopback,
                _ => BindMode::Lan,
            };
            start_gateway(&config, ServeConfig { port: cli.port, bind }).await?;
        }
    }

    Ok(())
}
