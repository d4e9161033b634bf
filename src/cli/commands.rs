//! Command implementations for the chatview CLI.
//!
//! Main commands:
//! - init: write a default config file
//! - serve: run the HTTP API
//! - stores / list / show: read chats from the terminal
//! - inspect: structural report of a database file

use anyhow::{Context, Result};
use chatview::chats::ChatAccessor;
use chatview::config::{default_config_path, Config};
use chatview::inspect::{
    inspect as inspect_db, Extraction, InspectionReport, PayloadReport, SampleValue,
};
use chatview::locator::StoreLocator;
use chatview::server::{self, AppState};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Load the config from `path`, or the default location if present.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(&path),
        None => {
            let path = default_config_path();
            tracing::debug!("Using config {}", path.display());
            Config::load_or_default(&path)
        }
    }
}

/// Write a default config file.
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(default_config_path);

    if Config::init(&path, force)? {
        println!("{} Wrote {}", "✓".green(), path.display());
        println!(
            "  Add stores under {} and run {}",
            "[stores]".cyan(),
            "chatview serve".cyan()
        );
    } else {
        println!(
            "{} {} already exists (use --force to overwrite)",
            "!".yellow(),
            path.display()
        );
    }
    Ok(())
}

fn accessor(config: &Config) -> ChatAccessor {
    ChatAccessor::new(StoreLocator::new(config.registry()))
}

/// Run the HTTP API until interrupted.
pub fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    for (name, path) in config.registry().iter() {
        if !path.exists() {
            tracing::warn!("Store '{}' points at missing file {}", name, path.display());
        }
    }

    let state = AppState {
        accessor: accessor(&config),
        default_store: config.default_store.clone(),
    };

    let runtime = tokio::runtime::Runtime::new().context("Cannot start async runtime")?;
    runtime.block_on(server::serve(state, &server_config.bind_addr()))
}

/// Print all registered stores.
pub fn stores(config: &Config) -> Result<()> {
    let registry = config.registry();
    if registry.is_empty() {
        println!("{}", "No databases configured.".yellow());
        return Ok(());
    }

    println!(
        "\n{} {} database(s):\n",
        "Found".green(),
        registry.len().to_string().green().bold()
    );

    for (name, path) in registry.iter() {
        let marker = if name == config.default_store {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        let status = if path.exists() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {} {}{}", status, name.white().bold(), marker);
        println!("     {}", path.display().to_string().dimmed());
    }

    println!();
    Ok(())
}

/// Print chat summaries of one store.
pub fn list(config: &Config, db: Option<String>) -> Result<()> {
    let store = db.unwrap_or_else(|| config.default_store.clone());
    let summaries = accessor(config)
        .list_summaries(&store)
        .with_context(|| format!("Cannot list chats in '{}'", store))?;

    if summaries.is_empty() {
        println!("{}", "No chats found.".yellow());
        return Ok(());
    }

    println!(
        "\n{} {} chat(s) in {}:\n",
        "Found".green(),
        summaries.len().to_string().green().bold(),
        store.cyan()
    );

    for (idx, chat) in summaries.iter().enumerate() {
        let updated = chat
            .updated_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "?".to_string());

        println!(
            "  {}. {} [{}]",
            (idx + 1).to_string().cyan(),
            chat.title.white().bold(),
            updated.dimmed()
        );
        println!("     {}", chat.id.dimmed());
    }

    println!();
    Ok(())
}

/// Print one chat as pretty JSON.
pub fn show(config: &Config, id: &str, db: Option<String>) -> Result<()> {
    let store = db.unwrap_or_else(|| config.default_store.clone());
    let detail = accessor(config)
        .get_detail(&store, id)
        .with_context(|| format!("Cannot read chat '{}' in '{}'", id, store))?;

    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

/// Inspect a database file and print the report.
pub fn inspect(path: &Path, as_json: bool) -> Result<()> {
    let report =
        inspect_db(path).with_context(|| format!("Cannot inspect {}", path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn rule(title: &str) {
    println!("{}", "=".repeat(80));
    println!("{}", title.cyan().bold());
    println!("{}", "=".repeat(80));
    println!();
}

fn print_report(report: &InspectionReport) {
    rule("Open WebUI Database Inspector");

    println!("Found {} tables:", report.tables.len().to_string().green());
    for table in &report.tables {
        println!("  - {}", table);
    }
    println!();

    let Some(chat) = &report.chat_table else {
        println!("{}", "No 'chat' table in this database.".yellow());
        return;
    };

    rule("Inspecting 'chat' table");

    println!("Columns:");
    for col in &chat.columns {
        println!("  - {}: {}", col.name, col.decl_type.dimmed());
    }
    println!();
    println!("Total chats: {}", chat.row_count.to_string().green());
    println!();

    let Some(sample) = &chat.sample else {
        return;
    };

    rule("Sample Chat Record");

    for (name, value) in &sample.fields {
        match value {
            SampleValue::Text(text) => println!("{}: {}", name, text),
            SampleValue::Payload(payload) => {
                println!("{}:", name);
                print_payload(payload);
            }
        }
    }

    if let Some(PayloadReport::Parsed(overview)) = sample.payload() {
        print_extraction(&overview.extraction);
    }
}

fn print_payload(payload: &PayloadReport) {
    match payload {
        PayloadReport::Invalid { error, raw_preview } => {
            println!("  {} Failed to parse JSON: {}", "ERROR:".red(), error);
            println!("  Raw value (first 200 chars): {}", raw_preview);
        }
        PayloadReport::Parsed(overview) => {
            println!("  Type: {}", overview.json_type);
            if !overview.keys.is_empty() {
                println!("  Keys: [{}]", overview.keys.join(", "));
            }
            println!();
            println!("  Structure:");
            for line in &overview.structure {
                println!("    {}", line);
            }
            println!();
            println!("  Full JSON structure (first 1000 chars):");
            println!("{}", overview.preview);
            if overview.truncated {
                println!("  ...");
            }
            println!();
        }
    }
}

fn print_extraction(extraction: &Extraction) {
    rule("Attempting to Extract Messages");

    match extraction.location {
        Some(location) => println!("{} Found messages in '{}'", "✓".green(), location),
        None => println!("{} No 'messages' or 'history' key found", "⚠".yellow()),
    }

    match &extraction.first_message {
        Some(first) => {
            println!("\nFound {} message(s)", extraction.message_count);
            println!("\nFirst message structure:");
            println!(
                "{}",
                serde_json::to_string_pretty(first).unwrap_or_default()
            );
        }
        None => println!(
            "{} Could not find messages in the expected locations",
            "✗".red()
        ),
    }
}
