//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use repldiff::cli::{Cli, Config, ConfigError, OutputFormat};

#[test]
fn test_cli_short_flags() {
    let cli = Cli::try_parse_from([
        "repldiff", "-s", "SALES", "-n", "ORDERS", "-u", "checker", "-p", "secret", "-c",
        "db.example.com:5432/prod", "-a", "replica.duckdb", "-m", "50", "-d",
    ])
    .unwrap();

    assert_eq!(cli.table_schema.as_deref(), Some("SALES"));
    assert_eq!(cli.table_name.as_deref(), Some("ORDERS"));
    assert_eq!(cli.user.as_deref(), Some("checker"));
    assert_eq!(cli.password.as_deref(), Some("secret"));
    assert_eq!(cli.connection_url.as_deref(), Some("db.example.com:5432/prod"));
    assert_eq!(cli.replica.as_deref(), Some("replica.duckdb"));
    assert_eq!(cli.max_differences.as_deref(), Some("50"));
    assert!(cli.debug);
    assert!(cli.output.is_none());
}

#[test]
fn test_cli_output_flag() {
    let cli = Cli::try_parse_from([
        "repldiff", "-s", "main", "-n", "t", "-c", "a.duckdb", "-a", "b.duckdb", "-f",
        "diffs.txt",
    ])
    .unwrap();
    assert_eq!(cli.output.unwrap().to_string_lossy(), "diffs.txt");
}

#[test]
fn test_cli_format_default_is_pretty() {
    let cli = Cli::try_parse_from([
        "repldiff", "-s", "main", "-n", "t", "-c", "a.duckdb", "-a", "b.duckdb",
    ])
    .unwrap();
    assert_eq!(cli.format, "pretty");

    let config = Config::from_cli(cli).unwrap();
    assert_eq!(config.format, OutputFormat::Pretty);
}

#[test]
fn test_validation_reports_everything_at_once() {
    let cli = Cli::try_parse_from(["repldiff", "-m", "many"]).unwrap();
    let errors = Config::from_cli(cli).unwrap_err();

    assert_eq!(errors.len(), 5);
    assert!(errors.contains(&ConfigError::Missing { option: "table schema" }));
    assert!(errors.contains(&ConfigError::Missing { option: "table name" }));
    assert!(errors.contains(&ConfigError::Missing { option: "connection URL" }));
    assert!(errors.contains(&ConfigError::Missing { option: "replica" }));
    assert!(errors.contains(&ConfigError::NotAnInteger {
        option: "maximum number of differences",
        value: "many".to_string(),
    }));
}

#[test]
fn test_validation_messages_are_user_readable() {
    let error = ConfigError::Missing { option: "table schema" };
    assert_eq!(error.to_string(), "No table schema was specified.");

    let error = ConfigError::NotAnInteger {
        option: "maximum number of differences",
        value: "many".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "The maximum number of differences is not an integer number: 'many'."
    );
}

#[test]
fn test_invalid_format_is_collected() {
    let cli = Cli::try_parse_from([
        "repldiff", "-s", "main", "-n", "t", "-c", "a.duckdb", "-a", "b.duckdb", "--format",
        "xml",
    ])
    .unwrap();
    let errors = Config::from_cli(cli).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ConfigError::InvalidFormat { .. }));
}
