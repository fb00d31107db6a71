use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use smtpscout::{
    config::{CliOverrides, ColorChoice, EncodingMode, OutputFormat},
    report::{render_json, render_text, ReportOptions},
    scan, ScanConfig,
};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::{num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Search a tree of SMTP logs for records mentioning an email address
#[derive(Parser)]
#[command(name = "smtpscout", author, version, about, long_about = None)]
struct Cli {
    /// Folder with SMTP logs (searched recursively)
    #[arg(short = 'f', long)]
    folder: Option<PathBuf>,

    /// Email address to search for
    #[arg(short = 'e', long)]
    email: Option<String>,

    /// Date to search for (format: YYYY-MM-DD)
    #[arg(short = 'd', long)]
    date: Option<String>,

    /// Number of files scanned concurrently
    #[arg(short = 'j', long)]
    workers: Option<NonZeroUsize>,

    /// Capacity of the internal path and result queues
    #[arg(long)]
    queue_capacity: Option<NonZeroUsize>,

    /// Configuration file (YAML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// When to color the report
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Sort results by file path
    #[arg(long)]
    sort: bool,

    /// Show only the summary, not the matched records
    #[arg(short = 's', long)]
    stats: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// How to handle invalid UTF-8 in logs
    #[arg(long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Lossy,
    Failfast,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

impl From<EncodingArg> for EncodingMode {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Lossy => Self::Lossy,
            EncodingArg::Failfast => Self::FailFast,
        }
    }
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_path: self.folder.clone(),
            email: self.email.clone(),
            date: self.date.clone(),
            pool_size: self.workers,
            queue_capacity: self.queue_capacity,
            encoding_mode: self.encoding.map(Into::into),
            color: self.color.map(Into::into),
            sort_by_path: self.sort,
            stats_only: self.stats,
            output_format: self.format.map(Into::into),
            log_level: self.log_level.clone(),
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// NO_COLOR only counts when set to a non-empty value
fn no_color_requested(value: Option<OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn use_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            !no_color_requested(std::env::var_os("NO_COLOR")) && std::io::stdout().is_terminal()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ScanConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());

    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    config
        .validate()
        .context("please provide both a folder path and an email address")?;

    let report = scan(&config)
        .with_context(|| format!("scan of {} failed", config.root_path.display()))?;

    match config.output_format {
        OutputFormat::Json => {
            println!("{}", render_json(&report).context("failed to encode report")?);
        }
        OutputFormat::Text => {
            let options = ReportOptions {
                color: use_color(config.color),
                stats_only: config.stats_only,
            };
            print!("{}", render_text(&report, &config.email, options));
        }
    }

    Ok(())
}
