//! ccview - ClearCase adapter
//!
//! Binary entry point: a thin command-line front-end over the library.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ccview::cleartool::ClearTool;
use ccview::vob::VobRegistry;
use ccview::{ClearCaseRepository, Config, Dispatcher, SyncOutcome, revision};

#[derive(Parser, Debug)]
#[command(name = "ccview")]
#[command(version)]
#[command(about = "Read history, annotations and old revisions from ClearCase views")]
struct Cli {
    /// cleartool executable (default: $CCVIEW_CLEARTOOL, then cleartool from PATH)
    #[arg(long, global = true)]
    cleartool: Option<PathBuf>,

    /// Log every cleartool invocation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a directory is the root of a ClearCase repository
    Detect { path: PathBuf },

    /// List the history of a file or directory
    History { repo: PathBuf, path: PathBuf },

    /// Show who last changed each line of a file
    Annotate {
        repo: PathBuf,
        file: PathBuf,
        #[arg(short, long)]
        rev: Option<String>,
    },

    /// Write a historical revision of a file to stdout
    Get {
        repo: PathBuf,
        file: PathBuf,
        rev: String,
    },

    /// Refresh a snapshot view
    Update { repo: PathBuf },

    /// List known VOB roots
    Vobs,

    /// Show the ClearCase release
    Version,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let result = run(cli);
    let left = revision::purge_deferred();
    if left > 0 {
        tracing::warn!(count = left, "temporary files could not be deleted");
    }
    result
}

/// Install a tracing subscriber honoring `RUST_LOG`
///
/// Defaults to `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) -> color_eyre::Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(true).compact())
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> color_eyre::Result<()> {
    let mut config = Config::from_env();
    if let Some(command) = cli.cleartool {
        config = config.with_command(command);
    }
    if cli.verbose {
        config = config.with_verbose(true);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Detect { path } => {
            let registry = Arc::new(VobRegistry::new(ClearTool::new(config.command.clone())));
            let dispatcher = Dispatcher::new(config, registry);
            match dispatcher.detect(&path) {
                Some(kind) => writeln!(out, "{}: {}", path.display(), kind)?,
                None => writeln!(out, "{}: not a repository", path.display())?,
            }
        }

        Commands::History { repo, path } => {
            let repo = ClearCaseRepository::open(&repo, &config)?;
            let history = repo
                .history(&path)
                .wrap_err_with(|| format!("history of {}", path.display()))?;
            for entry in &history.entries {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    entry.date.format("%Y-%m-%d %H:%M:%S"),
                    entry.author,
                    entry.revision,
                    entry.event,
                    entry.summary()
                )?;
            }
        }

        Commands::Annotate { repo, file, rev } => {
            let repo = ClearCaseRepository::open(&repo, &config)?;
            let annotation = repo.annotate(&file, rev.as_deref())?;
            for (index, line) in annotation.lines.iter().enumerate() {
                writeln!(out, "{:>6} {:<16} {}", index + 1, line.author, line.revision)?;
            }
        }

        Commands::Get { repo, file, rev } => {
            let repo = ClearCaseRepository::open(&repo, &config)?;
            let mut blob = repo
                .get_revision(&file, &rev)?
                .ok_or_else(|| eyre!("cleartool could not get {}@@{}", file.display(), rev))?;
            io::copy(&mut blob, &mut out)?;
            blob.close()?;
        }

        Commands::Update { repo } => {
            let repo = ClearCaseRepository::open(&repo, &config)?;
            let message = match repo.update()? {
                SyncOutcome::DynamicView => "dynamic view, nothing to update".to_string(),
                SyncOutcome::SnapshotUpdated => "snapshot view updated".to_string(),
                SyncOutcome::SnapshotIncomplete { exit_code } => {
                    format!("snapshot view update incomplete (exit code {exit_code})")
                }
                SyncOutcome::ConfigSpecUnavailable { exit_code } => {
                    format!("could not read config spec (exit code {exit_code})")
                }
            };
            writeln!(out, "{message}")?;
        }

        Commands::Vobs => {
            let registry = VobRegistry::new(ClearTool::new(config.command));
            for vob in registry.all_vobs().iter() {
                writeln!(out, "{vob}")?;
            }
        }

        Commands::Version => {
            let cleartool = ClearTool::new(config.command);
            writeln!(out, "{}", cleartool.version()?)?;
        }
    }

    out.flush()?;
    Ok(())
}
