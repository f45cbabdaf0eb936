//! wts2: CGI entrypoint for Jira project directories and top-10 renumbering
//!
//! Usage (as a CGI script):
//!   ?cmd=new&key=WTS2-10      → create the project directory, JSON reply
//!   ?cmd=renumber             → renumber every PI in the top-10, HTML transcript
//!   wts2 <pi> ?cmd=renumber   → renumber only groups containing <pi>
//!
//! The response goes to stdout; logs go to stderr.

use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wts2_core::Wts2Config;
use wts2_gateway::{failure_reply, Action, ActionForm, Dispatcher, Reply};

#[derive(Parser)]
#[command(
    name = "wts2",
    about = "WTS2: Jira project directories and per-PI renumbering (CGI)",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// PI token restricting which groups a renumber updates
    group_filter: Option<String>,

    /// TOML config file; environment variables override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let form = read_form().await;
    let reply = serve(&cli, form).await;
    print!("{}", reply.to_cgi());
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wts2=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// The form is validated before configuration is read, so a bad request
/// gets its own reply even when the environment is incomplete.
async fn serve(cli: &Cli, form: ActionForm) -> Reply {
    let action = match Action::from_form(form.clone(), cli.group_filter.as_deref()) {
        Ok(action) => action,
        Err(e) => {
            tracing::info!("Rejected request: {}", e);
            return e.into_reply();
        }
    };
    let config = match Wts2Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration unusable: {}", e);
            return failure_reply(&form, &format!("Configuration error: {}", e));
        }
    };
    let dispatcher = match Dispatcher::from_config(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            tracing::error!("Jira client unavailable: {}", e);
            return failure_reply(&form, &format!("Tracker unavailable: {}", e));
        }
    };
    dispatcher.run(action).await
}

/// Form fields from `QUERY_STRING`, plus the request body for POST. Body
/// fields take precedence. Anything unparseable reads as an empty form.
async fn read_form() -> ActionForm {
    let query = std::env::var("QUERY_STRING").unwrap_or_default();
    let from_query = parse_form(&query);

    let is_post = std::env::var("REQUEST_METHOD")
        .map(|m| m.eq_ignore_ascii_case("POST"))
        .unwrap_or(false);
    if !is_post {
        return from_query;
    }

    let length: u64 = std::env::var("CONTENT_LENGTH")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    let mut body = String::new();
    if let Err(e) = tokio::io::stdin()
        .take(length)
        .read_to_string(&mut body)
        .await
    {
        tracing::warn!("Could not read request body: {}", e);
    }
    parse_form(&body).or(from_query)
}

fn parse_form(encoded: &str) -> ActionForm {
    serde_urlencoded::from_str(encoded).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed form data: {}", e);
        ActionForm::default()
    })
}
