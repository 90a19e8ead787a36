use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bangbang::config::BangbangConfig;
use bangbang::logging::{LogFormat, init_logging};

mod cmd;

#[derive(Parser)]
#[command(name = "bangbang")]
#[command(version, about = "Kanban board with drag-and-drop reordering and replace-order sync")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format: pretty or json
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Board directory (holds .bangbang.md and bangbang.toml)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Base URL of the board authority. Overrides bangbang.toml and BANGBANG_URL.
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the board over HTTP
    Serve {
        /// Port to serve on (defaults to bangbang.toml / BANGBANG_PORT / 9000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind on all interfaces and allow cross-origin requests
        #[arg(long)]
        dev: bool,
    },
    /// Fetch and print the board from the authority
    Board {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace an ordering on the authority
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum OrderCommands {
    /// Replace the board's column order
    Columns {
        /// Every column id, in the new order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Replace one column's card order
    Cards {
        /// Column whose cards are replaced
        #[arg(short, long)]
        column: String,
        /// Card ids, in the new order
        ids: Vec<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Write a default bangbang.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    let dir = match cli.dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    if let Commands::Config { command } = &cli.command {
        // Works without a valid config, so `init` can repair a broken one.
        return cmd::cmd_config(&dir, command.clone());
    }

    let config = BangbangConfig::load(dir)?
        .with_base_url(cli.url.clone())
        .with_verbose(cli.verbose);

    match &cli.command {
        Commands::Serve { port, dev } => {
            cmd::cmd_serve(config.with_port(*port), *dev).await?;
        }
        Commands::Board { json } => cmd::cmd_board(&config, *json).await?,
        Commands::Order { command } => cmd::cmd_order(&config, command.clone()).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
