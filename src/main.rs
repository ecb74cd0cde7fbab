//! `bkb` command-line entry point.
//!
//! This module is the thin layer between the shell and the library: it parses
//! arguments, loads the configuration, picks a build source and hands the
//! terminal to a [`Session`].
//!
//! # Commands
//!
//! - `bkb`: fetch recent builds and browse them
//! - `bkb --from-file builds.json`: browse a saved API response instead
//! - `bkb init`: store the organization and API token in the config file
//! - `bkb show`: print the stored organization and a token preview
//!
//! # Keybindings
//!
//! - `Down`/`Ctrl+n`, `Up`/`Ctrl+p`: Move the cursor
//! - `Right`/`Ctrl+f`, `Left`/`Ctrl+b`: Page forward and back
//! - `/`: Toggle search mode
//! - `Enter`: Open the selected build in the browser
//! - `Esc`: Leave search, or quit
//! - `q` (normal mode), `Ctrl+c`, `Ctrl+d`: Quit

#![allow(clippy::multiple_crate_versions)]

use build_beaver::app::{CrosstermKeys, RawModeGuard};
use build_beaver::infrastructure::{paths, SystemBrowser};
use build_beaver::source::{BuildSource, BuildkiteClient, JsonFileSource};
use build_beaver::ui::Terminal;
use build_beaver::{initialize, mask_token, BeaverError, Build, Config, Result, Session, TOKEN_URL};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Browse recent Buildkite builds in the terminal.
#[derive(Debug, Parser)]
#[command(name = "bkb", version, about)]
struct Cli {
    /// Read builds from a saved API response instead of the API.
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Number of builds visible at once.
    #[arg(long, short, value_name = "N")]
    size: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store the organization and API token in the config file.
    Init,
    /// Print the configured organization and a token preview.
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "bkb failed");
            eprintln!("bkb: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = paths::config_file()?;
    let mut config = Config::load(&config_path)?;

    if let Some(Command::Init) = cli.command {
        return init(config, &config_path);
    }

    config.apply_env();
    if let Some(log_file) = build_beaver::observability::init_tracing(&config) {
        tracing::debug!(log_file = %log_file.display(), "logging initialized");
    }

    match cli.command {
        Some(Command::Show) => show(&config),
        _ => browse(&cli, config),
    }
}

/// Fetches builds and runs the interactive list.
fn browse(cli: &Cli, mut config: Config) -> Result<()> {
    if let Some(size) = cli.size {
        config.list_size = size;
    }

    let builds = fetch(cli.from_file.as_deref(), &config)?;
    let (state, templates) = initialize(&config, builds)?;

    let _raw = RawModeGuard::enable()?;
    let mut session = Session::new(state, templates, Terminal::new(io::stdout()), SystemBrowser);
    session.run(&mut CrosstermKeys)
}

fn fetch(from_file: Option<&Path>, config: &Config) -> Result<Vec<Build>> {
    if let Some(path) = from_file {
        return JsonFileSource::new(path).fetch();
    }

    let (org, token) = config.credentials()?;
    let client = BuildkiteClient::new(org, token)?.with_paging(config.per_page, config.page_limit);
    tracing::info!(source = %client.describe(), "fetching builds");
    client.fetch()
}

/// Prompts for credentials and saves them.
///
/// Pressing Enter keeps a value that is already configured.
fn init(mut config: Config, path: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    config.org = Some(prompt(&mut input, "Organization slug", config.org.as_deref())?);

    println!("Create an API token with the read_builds scope at {TOKEN_URL}");
    let current = config.token.as_deref().map(mask_token);
    let token = prompt(&mut input, "API token", current.as_deref())?;
    if current.as_deref() != Some(token.as_str()) {
        config.token = Some(token);
    }

    config.save(path)?;
    println!("Saved {}", path.display());
    Ok(())
}

/// Reads one trimmed line, falling back to `current` when it is blank.
fn prompt(input: &mut impl BufRead, label: &str, current: Option<&str>) -> Result<String> {
    match current {
        Some(current) => print!("{label} [{current}]: "),
        None => print!("{label}: "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let line = line.trim();

    if !line.is_empty() {
        return Ok(line.to_string());
    }
    current
        .map(str::to_string)
        .ok_or_else(|| BeaverError::Credentials(format!("{label} is required")))
}

fn show(config: &Config) -> Result<()> {
    let (org, token) = config.credentials()?;
    println!("Organization: {org}");
    println!("Token: {}", mask_token(token));
    Ok(())
}
