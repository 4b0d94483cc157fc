//! Relay HTTP endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tdk_chat::FormattedReply;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::classify::user_facing_error;
use crate::config::RelayConfig;
use crate::gemini::{ModelError, StrategyModel};
use crate::prompt::build_prompt;

pub const CHAT_PATH: &str = "/api/gemini";
pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
struct RelayState {
    model: Arc<dyn StrategyModel>,
    request_timeout: Duration,
}

/// `?render=plain` asks for terminal text instead of markup.
#[derive(Deserialize, Default)]
struct RenderQuery {
    render: Option<String>,
}

impl RenderQuery {
    fn render(&self, text: &str) -> String {
        let reply = FormattedReply::parse(text);
        match self.render.as_deref() {
            Some("plain") => reply.to_plain(),
            _ => reply.to_markup(),
        }
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

pub fn router(model: Arc<dyn StrategyModel>, request_timeout: Duration) -> Router {
    Router::new()
        .route(CHAT_PATH, post(handle_chat))
        .route(HEALTH_PATH, get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(RelayState {
            model,
            request_timeout,
        })
}

async fn handle_chat(
    State(state): State<RelayState>,
    Query(query): Query<RenderQuery>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let message = match body {
        Ok(Json(ChatRequest {
            message: Some(message),
        })) if !message.is_empty() => message,
        Ok(_) => return reply(StatusCode::BAD_REQUEST, "Message is required"),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected chat request body");
            return reply(StatusCode::BAD_REQUEST, "Message is required");
        }
    };
    debug!(chars = message.chars().count(), "Chat request received");

    let prompt = build_prompt(&message);
    let outcome = match tokio::time::timeout(state.request_timeout, state.model.generate(&prompt))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(ModelError::Timeout(state.request_timeout.as_secs())),
    };

    match outcome {
        Ok(text) => reply(StatusCode::OK, &query.render(&text)),
        Err(error) => {
            warn!(model = state.model.name(), error = %error, "Model call failed");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                user_facing_error(&error.to_string()),
            )
        }
    }
}

async fn handle_health(State(state): State<RelayState>) -> Json<Value> {
    Json(json!({"status": "ok", "model": state.model.name()}))
}

fn reply(status: StatusCode, text: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "response": text })))
}

/// A running relay. Dropping it does not stop the server; call
/// [`RelayEndpoint::shutdown`].
#[derive(Debug)]
pub struct RelayEndpoint {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
    server_task: tokio::task::JoinHandle<()>,
}

impl RelayEndpoint {
    pub async fn start(cfg: &RelayConfig, model: Arc<dyn StrategyModel>) -> Result<Self> {
        let bind_addr = cfg.resolve_bind_addr().await?;
        let listener = tokio::net::TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("failed to bind relay at {bind_addr}"))?;
        let local_addr = listener
            .local_addr()
            .context("failed to resolve local relay address")?;

        let model_name = model.name().to_string();
        let app = router(model, cfg.request_timeout());
        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();
        let server_task = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    server_shutdown.cancelled().await;
                })
                .await
            {
                warn!(error = %error, "Relay server stopped with error");
            }
        });

        info!(addr = %local_addr, model = %model_name, "Relay listening");
        Ok(Self {
            addr: local_addr,
            shutdown,
            server_task,
        })
    }

    pub fn chat_url(&self) -> String {
        format!("http://{}{}", self.addr, CHAT_PATH)
    }

    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(error) = self.server_task.await {
            debug!(error = %error, "Relay server join failed");
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
