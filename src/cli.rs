//! Command-line interface for repldiff

use crate::sql::AttachTarget;
use crate::DEFAULT_MAX_DIFFERENCES;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repldiff")]
#[command(about = "A streaming consistency checker for read-accelerated table replicas")]
#[command(version)]
pub struct Cli {
    /// Schema of the table to check
    #[arg(short = 's', long)]
    pub table_schema: Option<String>,

    /// Name of the table to check
    #[arg(short = 'n', long)]
    pub table_name: Option<String>,

    /// User for connecting to a remote store
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Password for connecting to a remote store
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Authoritative store: host:port/database (e.g. 192.168.178.10:5432/sales),
    /// or a path to a database file
    #[arg(short = 'c', long)]
    pub connection_url: Option<String>,

    /// Replica to compare with: host:port/database, or a path to a database file
    #[arg(short = 'a', long)]
    pub replica: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(short = 'f', long)]
    pub output: Option<PathBuf>,

    /// Output format: "pretty", "json"
    #[arg(long, default_value = "pretty")]
    pub format: String,

    /// Print debug information
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Maximum number of differences to collect before checking stops
    #[arg(short = 'm', long)]
    pub max_differences: Option<String>,
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// A single option-validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing { option: &'static str },
    NotAnInteger { option: &'static str, value: String },
    NotPositive { option: &'static str },
    InvalidFormat { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { option } => write!(f, "No {} was specified.", option),
            Self::NotAnInteger { option, value } => {
                write!(f, "The {} is not an integer number: '{}'.", option, value)
            }
            Self::NotPositive { option } => {
                write!(f, "The {} must be greater than 0.", option)
            }
            Self::InvalidFormat { message } => write!(f, "{}", message),
        }
    }
}

/// Validated runtime configuration for one check
#[derive(Debug, Clone)]
pub struct Config {
    pub table_schema: String,
    pub table_name: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connection_url: String,
    pub replica: String,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub debug: bool,
    pub max_differences: usize,
}

impl Config {
    /// Validate the parsed command line, collecting every violation before
    /// reporting any of them.
    pub fn from_cli(cli: Cli) -> std::result::Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let table_schema = require(&cli.table_schema, "table schema", &mut errors);
        let table_name = require(&cli.table_name, "table name", &mut errors);
        let connection_url = require(&cli.connection_url, "connection URL", &mut errors);
        let replica = require(&cli.replica, "replica", &mut errors);

        let user = normalize(&cli.user);
        let password = normalize(&cli.password);
        let remote = [&cli.connection_url, &cli.replica]
            .iter()
            .any(|t| t.as_deref().map(AttachTarget::looks_remote).unwrap_or(false));
        if remote {
            if user.is_none() {
                errors.push(ConfigError::Missing { option: "user name" });
            }
            if password.is_none() {
                errors.push(ConfigError::Missing { option: "password" });
            }
        }

        let max_differences = match &cli.max_differences {
            None => DEFAULT_MAX_DIFFERENCES,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => {
                    errors.push(ConfigError::NotPositive {
                        option: "maximum number of differences",
                    });
                    0
                }
                Ok(n) => n,
                Err(_) => {
                    errors.push(ConfigError::NotAnInteger {
                        option: "maximum number of differences",
                        value: raw.clone(),
                    });
                    0
                }
            },
        };

        let format = match OutputFormat::parse(&cli.format) {
            Ok(format) => format,
            Err(message) => {
                errors.push(ConfigError::InvalidFormat { message });
                OutputFormat::Pretty
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            table_schema,
            table_name,
            user,
            password,
            connection_url,
            replica,
            output: cli.output,
            format,
            debug: cli.debug,
            max_differences,
        })
    }
}

/// Record a missing-option error for blank values; the placeholder returned
/// on failure is discarded with the rest of the config.
fn require(value: &Option<String>, option: &'static str, errors: &mut Vec<ConfigError>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            errors.push(ConfigError::Missing { option });
            String::new()
        }
    }
}

fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
