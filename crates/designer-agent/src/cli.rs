//! Command line interface
//!
//! Unknown `--flags` and stray words are dropped before clap sees the
//! arguments, so they are ignored instead of failing the run.

use anyhow::Context;
use clap::{Parser, Subcommand};
use design_compliance::check::{CheckOptions, run_check};
use design_compliance::config::ConfigOverrides;
use design_compliance::constants::{CHECK_REPORT_FILENAME, DEFAULT_CHECK_TARGET};
use design_compliance::logging::init_logging;
use design_compliance::{AgentConfig, AgentRunner, ConfigLoader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Flags followed by a value
const VALUE_FLAGS: &[&str] = &["--watch", "--interval", "--format", "--config"];

/// Flags standing alone
const SWITCH_FLAGS: &[&str] = &["--auto-fix", "--help", "-h", "--version", "-V"];

/// Value flag only understood by `check`
const REPORT_FLAG: &str = "--report";

const CHECK_COMMAND: &str = "check";

/// Command line interface for the Designer Agent
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "designer-agent")]
#[command(about = "Designer Agent - Design Compliance Validator")]
#[command(version)]
#[command(after_help = "Examples:
  designer-agent
  designer-agent --watch src,public --interval 10000
  designer-agent --auto-fix --format html
  designer-agent check src/components")]
pub struct Cli {
    /// Comma-separated list of directories to watch
    #[arg(long, value_name = "DIRS", global = true)]
    pub watch: Option<String>,

    /// Check interval in milliseconds (default: 30000)
    #[arg(long, value_name = "MS", global = true)]
    pub interval: Option<String>,

    /// Enable automatic fixing of violations
    #[arg(long, global = true)]
    pub auto_fix: bool,

    /// Report format: json, html, console (default: console)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate a directory once; exit 1 on any error-severity violation
    Check {
        /// Directory to validate
        #[arg(default_value = DEFAULT_CHECK_TARGET)]
        dir: PathBuf,

        /// Where the JSON report is written
        #[arg(long, value_name = "PATH", default_value = CHECK_REPORT_FILENAME)]
        report: PathBuf,
    },
}

impl Cli {
    /// Overrides to layer on top of the loaded configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            watch: self.watch.clone(),
            interval: self.interval.clone(),
            auto_fix: self.auto_fix,
            format: self.format.clone(),
        }
    }
}

/// Arguments left for clap, and the ones dropped on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredArgs {
    pub args: Vec<String>,
    pub ignored: Vec<String>,
}

/// Drop unknown flags, value flags missing their value, and stray words
///
/// The first item is the program name and is always kept.
pub fn filter_args<I, S>(raw: I) -> FilteredArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut iter = raw.into_iter().map(Into::into).peekable();
    let mut filtered = FilteredArgs {
        args: iter.next().into_iter().collect(),
        ignored: Vec::new(),
    };
    let mut in_check = false;
    let mut check_dir_seen = false;

    while let Some(arg) = iter.next() {
        let (name, inline_value) = match arg.split_once('=') {
            Some((name, _)) if arg.starts_with("--") => (name.to_string(), true),
            _ => (arg.clone(), false),
        };

        let takes_value =
            VALUE_FLAGS.contains(&name.as_str()) || (in_check && name == REPORT_FLAG);
        if takes_value && inline_value {
            filtered.args.push(arg);
        } else if takes_value {
            // A flag without a value is dropped; the next flag stays intact
            match iter.next_if(|next| !next.starts_with("--")) {
                Some(value) => {
                    filtered.args.push(arg);
                    filtered.args.push(value);
                }
                None => filtered.ignored.push(arg),
            }
        } else if SWITCH_FLAGS.contains(&name.as_str()) {
            filtered.args.push(arg);
        } else if arg.starts_with('-') {
            filtered.ignored.push(arg);
        } else if !in_check && arg == CHECK_COMMAND {
            in_check = true;
            filtered.args.push(arg);
        } else if in_check && !check_dir_seen {
            check_dir_seen = true;
            filtered.args.push(arg);
        } else {
            filtered.ignored.push(arg);
        }
    }

    filtered
}

/// Filter then parse process arguments
///
/// Returns the parsed CLI and the ignored arguments. `--help` and
/// `--version` come back as clap errors whose `exit()` prints and exits 0.
pub fn parse_args<I, S>(raw: I) -> Result<(Cli, Vec<String>), clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let filtered = filter_args(raw);
    let cli = Cli::try_parse_from(&filtered.args)?;
    Ok((cli, filtered.ignored))
}

/// Load configuration for this invocation
pub fn load_config(cli: &Cli) -> anyhow::Result<AgentConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    loader.load().context("Failed to load configuration")
}

/// Run the parsed command; the returned code becomes the process exit code
pub async fn run(cli: Cli, ignored: &[String]) -> anyhow::Result<u8> {
    let config = load_config(&cli)?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    for arg in ignored {
        warn!(argument = %arg, "Ignoring unrecognized argument");
    }

    match &cli.command {
        Some(Command::Check { dir, report }) => run_check_mode(dir, report, config.rules_file),
        None => {
            run_watch_mode(cli.overrides().apply(config)).await?;
            Ok(0)
        }
    }
}

/// Validate `dir` once and write the JSON report to `report`
pub fn run_check_mode(
    dir: &Path,
    report: &Path,
    rules_file: Option<PathBuf>,
) -> anyhow::Result<u8> {
    let options = CheckOptions::new(dir)
        .with_report_path(report)
        .with_rules_file(rules_file);
    let outcome = run_check(&options)
        .with_context(|| format!("Design check of {} failed", dir.display()))?;
    Ok(outcome.exit_code())
}

/// Run scheduled passes until Ctrl+C
pub async fn run_watch_mode(config: AgentConfig) -> anyhow::Result<()> {
    let runner = AgentRunner::new(config).context("Failed to create designer agent")?;
    runner
        .start()
        .await
        .context("Failed to start designer agent")?;
    info!("Designer agent running; press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down designer agent");
    runner.stop().await;
    Ok(())
}
