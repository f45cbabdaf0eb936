//! HTTP front end
//!
//! `GET /?cmd=...` and `POST /` with a form body both reach the dispatcher.
//! Each request runs to completion on its own; only configuration and the
//! HTTP client are shared.

use crate::dispatch::{ActionForm, Dispatcher};
use crate::reply::Reply;
use axum::{
    extract::{Form, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use wts2_core::Wts2Config;

/// Bind mode for the gateway
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    Loopback,
    #[default]
    Lan,
}

impl BindMode {
    pub fn to_addr(&self) -> &str {
        match self {
            BindMode::Loopback => "127.0.0.1",
            BindMode::Lan => "0.0.0.0",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub port: u16,
    pub bind: BindMode,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 8280,
            bind: BindMode::default(),
        }
    }
}

pub fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(query_handler).post(form_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

pub async fn start_gateway(config: &Wts2Config, serve: ServeConfig) -> anyhow::Result<()> {
    let dispatcher = Arc::new(Dispatcher::from_config(config)?);
    let app = build_router(dispatcher);

    let bind_addr: SocketAddr = format!("{}:{}", serve.bind.to_addr(), serve.port).parse()?;

    info!("WTS2 Gateway v{} starting", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", bind_addr);
    info!("  Jira:         {}", config.tracker.base_url);
    info!("  Directories:  {}", config.directories.root.display());
    info!("  Top-10 queue: {}", config.renumber.queue_id);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn query_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(form): Query<ActionForm>,
) -> Reply {
    dispatcher.dispatch(form, None).await
}

async fn form_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(query): Query<ActionForm>,
    Form(form): Form<ActionForm>,
) -> Reply {
    dispatcher.dispatch(form.or(query), None).await
}

async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
