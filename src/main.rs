//! chatview CLI - Browse Open WebUI chat databases.
//!
//! Read-only: the databases are owned by Open WebUI and never modified.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("chatview={}", log_level).parse()?),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { force } => cli::commands::init(cli.config, force),
        Commands::Inspect { path, json } => cli::commands::inspect(&path, json),
        Commands::Serve { host, port } => {
            cli::commands::serve(cli::commands::load_config(cli.config)?, host, port)
        }
        Commands::Stores => cli::commands::stores(&cli::commands::load_config(cli.config)?),
        Commands::List { db } => cli::commands::list(&cli::commands::load_config(cli.config)?, db),
        Commands::Show { id, db } => {
            cli::commands::show(&cli::commands::load_config(cli.config)?, &id, db)
        }
    }
}
