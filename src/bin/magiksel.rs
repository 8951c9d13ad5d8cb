//! magiksel - pod and container selection CLI
//!
//! Resolves `--all`, `--latest` or a list of names/IDs against a state root
//! and prints what was selected.
//!
//! ## Usage
//!
//! ```sh
//! magiksel pods --all
//! magiksel containers --latest
//! magiksel containers web db 3f2a --format json
//! magiksel --root /run/magiksel -v pods web
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: every requested entity was resolved
//! - `1`: some identifiers failed; the rest were printed
//! - `125`: nothing could be selected (runtime error, or every identifier failed)

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Table, presets::NOTHING};
use magiksel::state::short_id;
use magiksel::{
    Config, Container, Pod, Resolution, SelectionRequest, StateDirRuntime, resolve_containers,
    resolve_pods,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

// =============================================================================
// Constants
// =============================================================================

/// Some identifiers failed to resolve.
const EXIT_PARTIAL: u8 = 1;

/// Nothing could be selected.
const EXIT_RUNTIME_ERROR: u8 = 125;

// =============================================================================
// CLI Parsing
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "magiksel")]
#[command(version, about = "Select pods and containers by --all, --latest or name/ID")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// State root directory
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select pods
    Pods(SelectArgs),
    /// Select containers
    Containers(SelectArgs),
}

#[derive(clap::Args, Debug)]
struct SelectArgs {
    /// Select every entity
    #[arg(short, long)]
    all: bool,

    /// Select the most recently created entity
    #[arg(short, long)]
    latest: bool,

    /// Names, full IDs or unique ID prefixes
    ids: Vec<String>,
}

impl SelectArgs {
    fn into_request(self) -> SelectionRequest {
        SelectionRequest::new(self.all, self.latest, self.ids)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    let level_override = args
        .log_level
        .clone()
        .or_else(|| args.verbose.then(|| "debug".to_string()));
    let config = Config::from_env()
        .with_state_root(args.root.clone())
        .with_log_level(level_override);

    let level = match config.level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };
    init_tracing(level);

    debug!(root = %config.state_root.display(), "opening state root");
    let runtime = StateDirRuntime::new(&config.state_root);

    match args.command {
        Command::Pods(select) => report(
            resolve_pods(&select.into_request(), &runtime),
            args.format,
            render_pods,
        ),
        Command::Containers(select) => report(
            resolve_containers(&select.into_request(), &runtime),
            args.format,
            render_containers,
        ),
    }
}

fn init_tracing(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

// =============================================================================
// Reporting
// =============================================================================

fn report<E>(
    resolved: magiksel::Result<Resolution<Arc<E>>>,
    format: OutputFormat,
    render: fn(&[Arc<E>], OutputFormat) -> magiksel::Result<String>,
) -> ExitCode {
    let resolution = match resolved {
        Ok(resolution) => resolution,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let (entities, failures) = resolution.into_inner();
    if !entities.is_empty() || failures.is_empty() {
        match render(&entities, format) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
    }

    for failure in &failures {
        eprintln!("Error: {}", failure.error);
    }

    match (entities.is_empty(), failures.is_empty()) {
        (_, true) => ExitCode::SUCCESS,
        (false, false) => ExitCode::from(EXIT_PARTIAL),
        (true, false) => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

fn render_pods(pods: &[Arc<Pod>], format: OutputFormat) -> magiksel::Result<String> {
    if format == OutputFormat::Json {
        let pods: Vec<&Pod> = pods.iter().map(Arc::as_ref).collect();
        return Ok(serde_json::to_string_pretty(&pods)?);
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["POD ID", "NAME", "NAMESPACE", "STATUS", "CREATED"]);
    for pod in pods {
        table.add_row(vec![
            short_id(&pod.id).to_string(),
            pod.name.clone(),
            pod.namespace.clone(),
            pod.status.to_string(),
            pod.created_at.to_rfc3339(),
        ]);
    }
    Ok(table.to_string())
}

fn render_containers(
    containers: &[Arc<Container>],
    format: OutputFormat,
) -> magiksel::Result<String> {
    if format == OutputFormat::Json {
        let containers: Vec<&Container> = containers.iter().map(Arc::as_ref).collect();
        return Ok(serde_json::to_string_pretty(&containers)?);
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["CONTAINER ID", "NAME", "IMAGE", "STATUS", "POD ID"]);
    for ctr in containers {
        table.add_row(vec![
            short_id(&ctr.id).to_string(),
            ctr.name.clone(),
            ctr.image.clone(),
            ctr.status.to_string(),
            ctr.pod_id.as_deref().map(short_id).unwrap_or("").to_string(),
        ]);
    }
    Ok(table.to_string())
}
