//! duckwrangler CLI Entry Point
//!
//! Three subcommands:
//! - `check` - Validate a secrets document
//! - `render` - Print the registration statement for every secret
//! - `plan` - Load a request envelope, render its registrations and bind its sources
//!
//! All output to stdout is JSON-only. Logs go to stderr.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use duckwrangler::{
    render_document, ConfigDocument, Disclosure, ErrorEnvelope, Metadata, ProcessEnv, Request,
    SuccessEnvelope, WranglerError,
};

/// duckwrangler - credential registration for embedded DuckDB sessions
#[derive(Parser)]
#[command(name = "duckwrangler")]
#[command(about = "Validate secrets documents and render DuckDB CREATE SECRET statements")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a secrets document (`-` reads stdin)
    Check { file: PathBuf },

    /// Render registration statements for every secret
    Render {
        file: PathBuf,

        /// Include credential values instead of `***`
        #[arg(long)]
        reveal: bool,
    },

    /// Plan a request envelope read from stdin
    Plan {
        /// Read the request from a file instead of stdin
        #[arg(long)]
        request: Option<PathBuf>,
    },
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Check { .. } => "check",
            Self::Render { .. } => "render",
            Self::Plan { .. } => "plan",
        }
    }
}

#[derive(Serialize)]
struct EntrySummary {
    name: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.name();
    let started = Instant::now();

    let printed = match run(cli.command, started) {
        Ok(json) => print_line(&json).map(|()| ExitCode::SUCCESS),
        Err(err) => {
            tracing::debug!(code = err.error_code(), "command failed");
            serde_json::to_string(&ErrorEnvelope::from_error(command, &err))
                .context("serializing error envelope")
                .and_then(|json| print_line(&json))
                .map(|()| ExitCode::FAILURE)
        }
    };

    printed.unwrap_or_else(|err| {
        eprintln!("duckwrangler: {err:#}");
        ExitCode::from(2)
    })
}

fn run(command: Commands, started: Instant) -> duckwrangler::Result<String> {
    let name = command.name();
    match command {
        Commands::Check { file } => {
            let document = load(&file)?;
            let entries: Vec<_> = document
                .iter()
                .map(|(name, d)| EntrySummary {
                    name: name.to_string(),
                    kind: d.kind(),
                })
                .collect();
            let data = serde_json::json!({ "valid": true, "secrets": entries });
            envelope(name, data, Metadata::new(elapsed_ms(started)))
        }
        Commands::Render { file, reveal } => {
            let document = load(&file)?;
            let disclosure = if reveal {
                Disclosure::Reveal
            } else {
                Disclosure::Redact
            };
            let statements = render_document(&document, disclosure);
            let meta = Metadata::with_statements(elapsed_ms(started), statements.len());
            envelope(name, statements, meta)
        }
        Commands::Plan { request } => {
            let text = match request {
                Some(path) => read_request_file(&path)?,
                None => read_stdin()?,
            };
            let plan = Request::from_json(&text)?.plan()?;
            let report = plan.report();
            let meta = Metadata::with_statements(elapsed_ms(started), report.secrets.len());
            envelope(name, report, meta)
        }
    }
}

fn load(file: &Path) -> duckwrangler::Result<ConfigDocument> {
    if file == Path::new("-") {
        return ConfigDocument::from_str_with_env(&read_stdin()?, &ProcessEnv);
    }
    ConfigDocument::load(file)
}

fn read_stdin() -> duckwrangler::Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| WranglerError::invalid_request(format!("could not read stdin: {err}")))?;
    Ok(text)
}

fn read_request_file(path: &Path) -> duckwrangler::Result<String> {
    std::fs::read_to_string(path).map_err(|err| {
        WranglerError::invalid_request(format!("could not read request {}: {err}", path.display()))
    })
}

fn envelope<T: Serialize>(
    command: &str,
    data: T,
    meta: Metadata,
) -> duckwrangler::Result<String> {
    serde_json::to_string(&SuccessEnvelope::new(command, data, meta))
        .map_err(|err| WranglerError::invalid_request(format!("could not encode output: {err}")))
}

fn print_line(json: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("writing to stdout")?;
    stdout.flush().context("flushing stdout")
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
