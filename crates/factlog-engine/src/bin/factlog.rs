//! `factlog` -- inspect the fact logs in a data directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use factlog_engine::config::{JournalConfig, DATA_DIR_ENV};
use factlog_engine::factlog_journal::document::LogDocument;
use factlog_engine::factlog_journal::store::LogStore;
use factlog_engine::view::JournalView;

#[derive(Debug, Parser)]
#[command(name = "factlog", about = "Inspect per-profile fact logs")]
struct Cli {
    /// Directory holding the profile logs.
    #[arg(long, global = true, env = DATA_DIR_ENV, default_value = "mod-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a profile's log as a table.
    Show {
        profile: String,
        /// Table width in characters.
        #[arg(long, default_value_t = 100)]
        width: usize,
    },
    /// Write a profile's HTML report and print its path.
    Report { profile: String },
    /// Print a profile's entries as JSON lines.
    Entries { profile: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = JournalConfig::with_data_dir(&cli.data_dir).store();

    match cli.command {
        Command::Show { profile, width } => {
            let document = load(&store, &profile)?;
            print!("{}", JournalView::new(&document).render_text(width));
        }
        Command::Report { profile } => {
            let document = load(&store, &profile)?;
            let path = store
                .write_report(&document)
                .with_context(|| format!("writing report for profile '{profile}'"))?;
            println!("{}", path.display());
        }
        Command::Entries { profile } => {
            let document = load(&store, &profile)?;
            for entry in document.entries() {
                println!("{}", serde_json::to_string(entry)?);
            }
        }
    }
    Ok(())
}

/// Load an existing log without creating one.
fn load(store: &LogStore, profile: &str) -> anyhow::Result<LogDocument> {
    store
        .try_load(profile)
        .with_context(|| format!("reading fact log for profile '{profile}'"))?
        .with_context(|| {
            format!(
                "no fact log for profile '{profile}' at {}",
                store.document_path(profile).display()
            )
        })
}
