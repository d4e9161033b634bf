//! CLI definitions and command implementations for chatview.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chatview - Browse Open WebUI chat databases
#[derive(Parser)]
#[command(name = "chatview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/chatview/chatview.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Serve the chat API over HTTP
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List registered databases
    Stores,

    /// List chats in a database, newest first
    List {
        /// Store name (default: configured default store)
        #[arg(short, long)]
        db: Option<String>,
    },

    /// Show one chat as JSON
    Show {
        /// Chat id
        id: String,

        /// Store name (default: configured default store)
        #[arg(short, long)]
        db: Option<String>,
    },

    /// Inspect the structure of a database file
    Inspect {
        /// Path to the database file
        path: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
