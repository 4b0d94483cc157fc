use anyhow::{Context, Result};
use tdk_chat::{
    ChatReply, ChatTransport, FailoverChatController, FailoverPolicy, HttpChatTransport,
    with_plain_rendering,
};
use tdk_config::GlobalConfig;
use tdk_core::OutputFormat;
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) async fn handle_chat(
    endpoint: Option<String>,
    message: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let config = GlobalConfig::load_validated()?;
    let endpoint = endpoint.unwrap_or_else(|| config.chat.endpoint.clone());
    let endpoint = match format {
        OutputFormat::Text => with_plain_rendering(&endpoint),
        OutputFormat::Json => endpoint,
    };
    tracing::debug!(endpoint = %endpoint, "Starting chat session");

    let mut chat = FailoverChatController::new(
        HttpChatTransport::new(endpoint),
        FailoverPolicy::from_settings(&config.chat)?,
    );

    if let Some(message) = message {
        if let Some(reply) = exchange(&mut chat, &message).await {
            print_reply(&reply, &format)?;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if let Some(reply) = exchange(&mut chat, &line).await {
            print_reply(&reply, &format)?;
        }
    }
    Ok(())
}

/// Blank input is ignored, as in the chat widget.
async fn exchange<T: ChatTransport>(
    chat: &mut FailoverChatController<T>,
    input: &str,
) -> Option<ChatReply> {
    let message = input.trim();
    if message.is_empty() {
        return None;
    }
    Some(chat.send(message).await)
}

fn print_reply(reply: &ChatReply, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(reply)?),
        OutputFormat::Text => println!("{}\n", reply.text),
    }
    Ok(())
}
