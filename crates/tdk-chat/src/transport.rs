//! Outbound chat calls.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Why one outbound chat call did not produce a reply.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatFailure {
    /// Non-2xx status. `detail` is the `response` field of the body, if any.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, detail: Option<String> },

    /// 2xx status but the body was not a `{"response": string}` object.
    #[error("malformed reply: {0}")]
    Malformed(String),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

impl ChatFailure {
    /// User-facing message carried inside the failure payload.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Upstream { detail, .. } => detail.as_deref().filter(|d| !d.is_empty()),
            _ => None,
        }
    }
}

/// One request/response exchange with whatever answers chat messages.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, ChatFailure>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<T> {
    async fn send(&self, message: &str) -> Result<String, ChatFailure> {
        (**self).send(message).await
    }
}

#[derive(Deserialize)]
struct ReplyBody {
    response: Option<String>,
}

/// Posts `{"message": ...}` to the relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Add `render=plain` to a relay endpoint so replies come back without
/// markup. Unparseable endpoints are returned unchanged.
pub fn with_plain_rendering(endpoint: &str) -> String {
    match reqwest::Url::parse(endpoint) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("render", "plain");
            url.into()
        }
        Err(_) => endpoint.to_string(),
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, message: &str) -> Result<String, ChatFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatFailure::Timeout
                } else {
                    ChatFailure::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatFailure::Transport(e.to_string()))?;
        let parsed = serde_json::from_str::<ReplyBody>(&body);
        debug!(status = status.as_u16(), bytes = body.len(), "Chat relay replied");

        if !status.is_success() {
            return Err(ChatFailure::Upstream {
                status: status.as_u16(),
                detail: parsed.ok().and_then(|b| b.response),
            });
        }

        match parsed {
            Ok(ReplyBody {
                response: Some(text),
            }) => Ok(text),
            Ok(_) => Err(ChatFailure::Malformed("missing `response` field".into())),
            Err(e) => Err(ChatFailure::Malformed(e.to_string())),
        }
    }
}
