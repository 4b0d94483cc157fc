//! Strategy chat: the failover controller, its local demo responder, the
//! HTTP transport to the relay, and reply formatting.

pub mod controller;
pub mod demo;
pub mod format;
pub mod transport;

pub use controller::{ChatReply, FailoverChatController, FailoverPolicy, ReplyKind};
pub use demo::demo_response;
pub use format::{FormattedReply, StrategyCard, format};
pub use transport::{ChatFailure, ChatTransport, HttpChatTransport, with_plain_rendering};
