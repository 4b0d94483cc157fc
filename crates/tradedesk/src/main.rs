use anyhow::Result;
use clap::Parser;

mod chat_cmd;
mod cli;
mod config_cmds;
mod logging;
mod quote_cmd;
mod relay_cmd;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_format = cli.format.clone();

    // Only the relay writes a log file; the guard must live until exit.
    let _log_guard = match &cli.command {
        Commands::Relay {
            log_dir: Some(dir), ..
        } => {
            let (writer, guard) = logging::create_log_writer(dir, "relay")?;
            logging::init(Some(writer));
            Some(guard)
        }
        _ => {
            logging::init(None);
            None
        }
    };

    match cli.command {
        Commands::Quote { symbol, range } => {
            quote_cmd::handle_quote(symbol, range, output_format).await?;
        }
        Commands::Suggest { query } => {
            quote_cmd::handle_suggest(query, output_format)?;
        }
        Commands::Chat { endpoint, message } => {
            chat_cmd::handle_chat(endpoint, message, output_format).await?;
        }
        Commands::Relay { bind, port, .. } => {
            relay_cmd::handle_relay(bind, port).await?;
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config_cmds::handle_config_show(output_format)?,
            ConfigCommands::Init { force } => config_cmds::handle_config_init(force)?,
            ConfigCommands::Validate => config_cmds::handle_config_validate()?,
        },
    }

    Ok(())
}
