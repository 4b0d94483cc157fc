use clap::{Parser, Subcommand};
use tdk_core::{OutputFormat, TimeRange};

#[derive(Parser)]
#[command(name = "tdk")]
#[command(about = "TradeDesk: stock quotes and trading strategy chat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show quote, price history and news for a symbol
    Quote {
        /// Ticker symbol (case-insensitive)
        symbol: String,

        /// Chart window
        #[arg(long, value_enum, default_value = "1M")]
        range: TimeRange,
    },

    /// Suggest popular symbols matching a partial ticker or company name
    Suggest {
        query: String,
    },

    /// Chat with the strategy assistant; reads lines from stdin if no message
    Chat {
        /// Relay endpoint (defaults to [chat].endpoint)
        #[arg(long)]
        endpoint: Option<String>,

        /// Single message to send
        message: Option<String>,
    },

    /// Run the chat relay in the foreground until Ctrl-C
    Relay {
        /// Bind address (defaults to [relay].bind)
        #[arg(long)]
        bind: Option<String>,

        /// Port; 0 picks a free port (defaults to [relay].port)
        #[arg(long)]
        port: Option<u16>,

        /// Also write logs to relay-{timestamp}.log in this directory
        #[arg(long)]
        log_dir: Option<std::path::PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Write the default configuration template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate configuration file
    Validate,
}
