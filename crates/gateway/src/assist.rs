//! `POST /v1/assist` — run the agent, stream progress as NDJSON.
//!
//! The request is validated before the stream starts, so malformed input
//! gets a plain 400 JSON error. Once streaming begins the response is
//! always 200; failures mid-run arrive as an `error` event line.

use crate::{SharedState, run_config};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use slugline_agent::{AgentRunner, AssistRequest};
use slugline_config::AppConfig;
use slugline_core::message::Message;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct AssistPayload {
    /// What the user wants done
    pub message: String,

    /// The current screenplay text. Required; empty string for a blank
    /// screenplay.
    #[serde(default)]
    pub document: Option<String>,

    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<HistoryTurn>,

    /// Named writing voice from the `[voices]` config section. Unknown
    /// names fall back to the built-in prompts.
    #[serde(default)]
    pub voice: Option<String>,

    /// Tool manifest selector. Only the built-in screenplay set exists,
    /// so the value is accepted and ignored.
    #[serde(default)]
    pub tool_set: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Turn a wire payload into an agent request, rejecting malformed input.
fn validate(config: &AppConfig, payload: AssistPayload) -> Result<AssistRequest, String> {
    if payload.message.trim().is_empty() {
        return Err("'message' must not be empty".into());
    }

    let document = payload
        .document
        .ok_or("'document' is required; send an empty string for a blank screenplay")?;

    let mut history = Vec::with_capacity(payload.history.len());
    for turn in payload.history {
        match turn.role.as_str() {
            "user" => history.push(Message::user(turn.content)),
            "assistant" => history.push(Message::assistant(turn.content)),
            other => return Err(format!("unknown history role '{other}'")),
        }
    }

    let system_prompt = payload.voice.as_ref().and_then(|name| {
        let prompt = config.voices.get(name).cloned();
        if prompt.is_none() {
            debug!(voice = %name, "Unknown voice, using built-in prompts");
        }
        prompt
    });

    Ok(AssistRequest {
        message: payload.message,
        document,
        history,
        system_prompt,
    })
}

pub async fn assist_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AssistPayload>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    info!("v1/assist request");

    let request = validate(&state.config, payload)
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })))?;

    let runner = AgentRunner::new(
        state.provider.clone(),
        state.tools.clone(),
        run_config(&state.config),
    );
    let rx = runner.run(request);

    let stream =
        ReceiverStream::new(rx).map(|event| event.to_ndjson_line().map(Bytes::from));

    Ok((
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(stream),
    )
        .into_response())
}
