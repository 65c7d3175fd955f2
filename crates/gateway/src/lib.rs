//! HTTP API gateway for Slugline.
//!
//! Exposes the assist endpoint (NDJSON streaming), a tool listing, and a
//! health check. Built on Axum.

pub mod assist;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use slugline_agent::{PhaseProfile, RunConfig};
use slugline_config::AppConfig;
use slugline_core::provider::CompletionProvider;
use slugline_core::tool::ToolRegistry;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application state for the gateway.
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn CompletionProvider>,
    pub tools: Arc<ToolRegistry>,
}

pub type SharedState = Arc<AppState>;

/// Map the agent section of the config onto a run configuration.
pub fn run_config(config: &AppConfig) -> RunConfig {
    let profile = |phase: &slugline_config::PhaseConfig| PhaseProfile {
        model: phase.model.clone(),
        temperature: phase.temperature,
        max_tokens: phase.max_tokens,
    };
    RunConfig {
        plan: profile(&config.agent.plan),
        execute: profile(&config.agent.execute),
        max_iterations: config.agent.max_iterations,
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/tools", get(tools_handler))
        .route("/v1/assist", post(assist::assist_handler))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    let addr = format!("{host}:{port}");

    let provider = slugline_providers::from_config(&config)?;
    let tools = Arc::new(slugline_tools::default_registry());

    let state = Arc::new(AppState {
        config,
        provider,
        tools,
    });

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Gateway listening");
    axum::serve(listener, router).await?;
    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
}

async fn tools_handler(State(state): State<SharedState>) -> Json<Vec<ToolInfo>> {
    let mut tools: Vec<ToolInfo> = state
        .tools
        .definitions()
        .into_iter()
        .map(|d| ToolInfo {
            name: d.name,
            description: d.description,
        })
        .collect();
    tools.sort_by(|a, b| a.name.cmp(&b.name));
    Json(tools)
}
