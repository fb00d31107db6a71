use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};

/// Default number of concurrent file workers
pub const DEFAULT_POOL_SIZE: usize = 50;
/// Default capacity of the path and outcome queues
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// How bytes that are not valid UTF-8 are handled while reading a log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Replace invalid sequences with U+FFFD and keep scanning
    #[default]
    Lossy,
    /// Stop reading the file and record an encoding error on its outcome
    FailFast,
}

/// When the text report uses ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for a scan run.
///
/// Values are read, in increasing precedence, from
/// `$CONFIG_DIR/smtpscout/config.yaml`, `./.smtpscout.yaml` and an explicit
/// file, then overlaid with command-line values via [`ScanConfig::merge_with_cli`].
///
/// ```yaml
/// root_path: "/var/log/mail"
/// email: "alice@example.com"
/// date: "2024-01-02"
/// pool_size: 16
/// queue_capacity: 100
/// encoding_mode: lossy
/// color: auto
/// sort_by_path: true
/// output_format: text
/// log_level: warn
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory tree (or single file) to scan
    #[serde(default)]
    pub root_path: PathBuf,

    /// Email substring a record must contain
    #[serde(default)]
    pub email: String,

    /// Optional date substring; `None` or empty matches any date
    #[serde(default)]
    pub date: Option<String>,

    /// Number of concurrent file workers
    #[serde(default = "default_pool_size")]
    pub pool_size: NonZeroUsize,

    /// Capacity of the bounded path and outcome queues
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: NonZeroUsize,

    #[serde(default)]
    pub encoding_mode: EncodingMode,

    #[serde(default)]
    pub color: ColorChoice,

    /// Sort outcomes by path before reporting
    #[serde(default)]
    pub sort_by_path: bool,

    /// Only print the summary, not the matched records
    #[serde(default)]
    pub stats_only: bool,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_pool_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_POOL_SIZE).unwrap_or(NonZeroUsize::MIN)
}

fn default_queue_capacity() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_QUEUE_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::new(),
            email: String::new(),
            date: None,
            pool_size: default_pool_size(),
            queue_capacity: default_queue_capacity(),
            encoding_mode: EncodingMode::default(),
            color: ColorChoice::default(),
            sort_by_path: false,
            stats_only: false,
            output_format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Creates a configuration for scanning `root_path` for `email`
    pub fn new(root_path: impl Into<PathBuf>, email: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from the default locations plus an explicit file.
    ///
    /// The explicit file must exist; the default locations are optional.
    pub fn load_from(config_path: Option<&Path>) -> ScanResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("smtpscout/config.yaml")),
            Some(PathBuf::from(".smtpscout.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Overlays values given on the command line onto file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(email) = cli.email {
            self.email = email;
        }
        if cli.date.is_some() {
            self.date = cli.date;
        }
        if let Some(pool_size) = cli.pool_size {
            self.pool_size = pool_size;
        }
        if let Some(capacity) = cli.queue_capacity {
            self.queue_capacity = capacity;
        }
        if let Some(mode) = cli.encoding_mode {
            self.encoding_mode = mode;
        }
        if let Some(color) = cli.color {
            self.color = color;
        }
        if cli.sort_by_path {
            self.sort_by_path = true;
        }
        if cli.stats_only {
            self.stats_only = true;
        }
        if let Some(format) = cli.output_format {
            self.output_format = format;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Rejects configurations that cannot start a scan
    pub fn validate(&self) -> ScanResult<()> {
        if self.root_path.as_os_str().is_empty() {
            return Err(ScanError::config_error("a folder path is required"));
        }
        if self.email.is_empty() {
            return Err(ScanError::invalid_criteria("an email address is required"));
        }
        Ok(())
    }
}

/// Values supplied on the command line; `None`/`false` leaves the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub pool_size: Option<NonZeroUsize>,
    pub queue_capacity: Option<NonZeroUsize>,
    pub encoding_mode: Option<EncodingMode>,
    pub color: Option<ColorChoice>,
    pub sort_by_path: bool,
    pub stats_only: bool,
    pub output_format: Option<OutputFormat>,
    pub log_level: Option<String>,
}
