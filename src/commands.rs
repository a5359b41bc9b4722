//! Check orchestration for the repldiff CLI

use crate::cli::{Config, OutputFormat};
use crate::connect;
use crate::diff::DiffEngine;
use crate::error::{RepldiffError, Result};
use crate::metadata::{self, OrderKey};
use crate::progress::ProgressReporter;
use crate::report::{DiffReport, JsonFormatter};
use crate::rowsource::{DbRowSource, Side};
use crate::sql::{self, TableRef};
use duckdb::Connection;

/// How a completed check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    InSync,
    DifferencesFound,
}

/// Run one comparison of the configured table across both sides
pub fn run_check(config: &Config) -> Result<CheckOutcome> {
    let source = connect::open_source(config)?;
    let replica = connect::open_replica(config)?;

    let table = TableRef::new(&config.table_schema, &config.table_name);
    let order_key = metadata::derive_order_key(&source, &table)?;
    let query = sql::build_ordered_select(&table, &order_key);
    log::debug!("comparison query: {}", query);

    let report = stream_comparison(&source, &replica, &query, &order_key, config.max_differences)?;

    let rendered = match config.format {
        OutputFormat::Pretty => report.render(),
        OutputFormat::Json => JsonFormatter::format(&report)?,
    };

    match &config.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(if report.is_empty() {
        CheckOutcome::InSync
    } else {
        CheckOutcome::DifferencesFound
    })
}

/// Open one ordered cursor per side and run the merge walk.
///
/// Statements and cursors live inside this scope, so both sides are
/// released on every exit path, including errors and budget stops.
fn stream_comparison(
    source: &Connection,
    replica: &Connection,
    query: &str,
    order_key: &OrderKey,
    budget: usize,
) -> Result<DiffReport> {
    let mut progress = ProgressReporter::new_for_check();

    let mut source_stmt = source
        .prepare(query)
        .map_err(|e| RepldiffError::source_read(Side::Source.as_str(), e.to_string()))?;
    let mut replica_stmt = replica
        .prepare(query)
        .map_err(|e| RepldiffError::source_read(Side::Replica.as_str(), e.to_string()))?;

    let source_rows = source_stmt
        .query([])
        .map_err(|e| RepldiffError::source_read(Side::Source.as_str(), e.to_string()))?;
    let replica_rows = replica_stmt
        .query([])
        .map_err(|e| RepldiffError::source_read(Side::Replica.as_str(), e.to_string()))?;

    let mut left = DbRowSource::new(Side::Source, source_rows, order_key.column_count());
    let mut right = DbRowSource::new(Side::Replica, replica_rows, order_key.column_count());

    let engine = DiffEngine::new(order_key, budget);
    let report = engine.compare(&mut left, &mut right, &progress)?;

    progress.finish("Comparison complete");
    Ok(report)
}
