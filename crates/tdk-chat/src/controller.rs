//! Failover state machine for one chat session.
//!
//! The session starts live. Every failed call bumps a consecutive-failure
//! counter; a success resets it. Once the counter reaches the threshold the
//! session switches to demo mode for good and all further answers come from
//! [`demo_response`].

use std::time::Duration;

use serde::Serialize;
use tdk_config::ChatSettings;
use tdk_core::{AppError, ChatMode};
use tracing::{info, warn};

use crate::demo::demo_response;
use crate::transport::{ChatFailure, ChatTransport};

pub const SWITCH_NOTICE: &str =
    "API connection issues detected. Switching to demo mode for example strategies.";
pub const GENERIC_FAILURE: &str =
    "Sorry, I encountered an error generating your strategy. Please try again.";
pub const TIMEOUT_FAILURE: &str =
    "Request timed out. The server might be busy or unavailable. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailoverPolicy {
    /// Consecutive failures that trigger the switch to demo mode.
    pub threshold: u32,
    /// Bound on a single outbound call.
    pub timeout: Duration,
}

impl Default for FailoverPolicy {
    fn default() -> Self {
        Self {
            threshold: 2,
            timeout: Duration::from_secs(15),
        }
    }
}

impl FailoverPolicy {
    /// Policy from `[chat]`. Rejects a zero wait or a zero threshold.
    pub fn from_settings(settings: &ChatSettings) -> Result<Self, AppError> {
        if settings.timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "chat.timeout_secs must be > 0".to_string(),
            ));
        }
        if settings.failure_threshold == 0 {
            return Err(AppError::ConfigError(
                "chat.failure_threshold must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            threshold: settings.failure_threshold,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

/// How a reply was produced, so the surface can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Upstream,
    Demo,
    SwitchedToDemo,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub kind: ReplyKind,
}

impl ChatReply {
    fn new(text: impl Into<String>, kind: ReplyKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

pub struct FailoverChatController<T> {
    transport: T,
    policy: FailoverPolicy,
    mode: ChatMode,
    failure_count: u32,
}

impl<T: ChatTransport> FailoverChatController<T> {
    pub fn new(transport: T, policy: FailoverPolicy) -> Self {
        Self {
            transport,
            policy,
            mode: ChatMode::Live,
            failure_count: 0,
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn policy(&self) -> FailoverPolicy {
        self.policy
    }

    /// Answer one message. Never fails: upstream problems become reply text.
    pub async fn send(&mut self, message: &str) -> ChatReply {
        if self.mode == ChatMode::Demo {
            return ChatReply::new(demo_response(message), ReplyKind::Demo);
        }

        let outcome = match tokio::time::timeout(self.policy.timeout, self.transport.send(message))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ChatFailure::Timeout),
        };

        match outcome {
            Ok(text) => {
                self.failure_count = 0;
                ChatReply::new(text, ReplyKind::Upstream)
            }
            Err(failure) => self.record_failure(message, failure),
        }
    }

    fn record_failure(&mut self, message: &str, failure: ChatFailure) -> ChatReply {
        self.failure_count += 1;
        warn!(
            failures = self.failure_count,
            threshold = self.policy.threshold,
            error = %failure,
            "Chat call failed"
        );

        if self.failure_count >= self.policy.threshold {
            self.mode = ChatMode::Demo;
            info!(
                failures = self.failure_count,
                "Failover: switching chat session to demo mode"
            );
            return ChatReply::new(
                format!("{SWITCH_NOTICE}\n\n{}", demo_response(message)),
                ReplyKind::SwitchedToDemo,
            );
        }

        let text = match (&failure, failure.detail()) {
            (_, Some(detail)) => detail.to_string(),
            (ChatFailure::Timeout, None) => TIMEOUT_FAILURE.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        };
        ChatReply::new(text, ReplyKind::Failure)
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
