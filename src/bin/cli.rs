// CLI binary: panicking on unrecoverable errors is fine here.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::unreachable, clippy::indexing_slicing)]

use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use script_designer::library::JsonFileStore;
use script_designer::model::Catalog;
use script_designer::registry::params::{CommandRefParams, HelpParams, SearchCatalogParams};
use script_designer::registry::{self, Command, CommandOutput};
use script_designer::settings::{self, AppSettings};
use script_designer::state::AppState;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "script-designer-cli",
    about = "Build PowerShell scripts from a command catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory override (favorites and recent commands live here)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog categories and commands
    Catalog {
        /// Only show commands matching this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a command's parameters
    Describe { name: String },
    /// List favorite commands
    Favorites,
    /// List recently selected commands
    Recent,
    /// Star or unstar a command
    ToggleFavorite { name: String },
    /// Select a command (records it as recent)
    Select { name: String },
    /// Run any session command by name
    Run {
        command: String,
        /// JSON object with the command's parameters
        #[arg(long)]
        params: Option<String>,
    },
    /// Read one JSON command per line from stdin and run them in one session
    Session,
    /// Discover session commands
    Help { topic: Option<String> },
    /// Serve the session over HTTP on 127.0.0.1
    #[cfg(feature = "http-api")]
    Serve {
        #[arg(long, default_value = "0")]
        port: u16,
    },
}

// ── State initialization ─────────────────────────────────────────

fn initialize_state(data_dir_override: Option<&str>) -> Arc<AppState> {
    let app_config_dir = script_designer::paths::default_config_dir();
    let mut loaded = settings::load_settings(&app_config_dir)
        .unwrap_or_else(|| AppSettings::new(app_config_dir.clone()));

    if let Some(dd) = data_dir_override {
        loaded.data_dir = PathBuf::from(dd);
    }
    tracing::debug!(data_dir = %loaded.data_dir.display(), "initializing session");

    let catalog = Catalog::builtin().expect("built-in catalog is valid");
    let store = JsonFileStore::new(loaded.data_dir.clone());
    Arc::new(AppState::new(Arc::new(catalog), Box::new(store), loaded))
}

// ── Command building ─────────────────────────────────────────────

fn by_name(name: &str) -> CommandRefParams {
    CommandRefParams {
        name: name.to_string(),
        category: None,
    }
}

fn build_command(cmd: &Commands) -> Command {
    match cmd {
        Commands::Catalog { search: None } => Command::ListCatalog,
        Commands::Catalog { search: Some(term) } => {
            Command::SearchCatalog(SearchCatalogParams { term: term.clone() })
        }
        Commands::Describe { name } => Command::DescribeCommand(by_name(name)),
        Commands::Favorites => Command::ListFavorites,
        Commands::Recent => Command::ListRecent,
        Commands::ToggleFavorite { name } => Command::ToggleFavorite(by_name(name)),
        Commands::Select { name } => Command::SelectCommand(by_name(name)),
        Commands::Help { topic } => Command::Help(HelpParams {
            topic: topic.clone(),
        }),
        Commands::Run { command, params } => {
            let params: Value = match params {
                Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                    eprintln!("Error: --params is not valid JSON: {e}");
                    process::exit(1);
                }),
                None => Value::Null,
            };
            Command::from_tool_call(command, &params).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                process::exit(1);
            })
        }
        Commands::Session => unreachable!("session is handled before command building"),
        #[cfg(feature = "http-api")]
        Commands::Serve { .. } => unreachable!("serve is handled before command building"),
    }
}

// ── Output ──────────────────────────────────────────────────────

fn print_output(output: &CommandOutput, raw_json: bool) {
    if raw_json {
        let json = serde_json::json!({
            "message": output.message,
            "result": output.result,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return;
    }

    println!("{}", output.message);
}

// ── Session mode ────────────────────────────────────────────────

#[derive(Deserialize)]
struct SessionLine {
    command: String,
    #[serde(default)]
    params: Value,
}

/// Runs every stdin line against one state, so script edits carry over from
/// line to line. Bad lines are reported and skipped.
fn run_session(state: &Arc<AppState>, raw: bool) {
    let stdin = std::io::stdin();
    for (n, line) in stdin.lock().lines().enumerate() {
        let line = line.expect("read stdin");
        if line.trim().is_empty() {
            continue;
        }
        let parsed: SessionLine = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("Error (line {}): {e}", n + 1);
                continue;
            }
        };
        match registry::execute::execute_named(state, &parsed.command, &parsed.params) {
            Ok(output) => print_output(&output, raw),
            Err(e) => eprintln!("Error (line {}): {e}", n + 1),
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let state = initialize_state(cli.data_dir.as_deref());
    let raw = cli.json;

    match &cli.command {
        Commands::Session => {
            run_session(&state, raw);
            return;
        }
        #[cfg(feature = "http-api")]
        Commands::Serve { port } => {
            if let Err(e) = script_designer::api::serve(state, *port).await {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return;
        }
        _ => {}
    }

    let cmd = build_command(&cli.command);
    match registry::execute::execute(&state, cmd) {
        Ok(output) => print_output(&output, raw),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
