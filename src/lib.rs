//! # repldiff
//!
//! A streaming consistency checker that validates a read-accelerated replica
//! of a relational table against its authoritative source, reporting rows
//! present on only one side.

pub mod cli;
pub mod commands;
pub mod connect;
pub mod diff;
pub mod error;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod rowsource;
pub mod sql;

pub use error::{RepldiffError, Result};

/// Default ceiling on collected differences before checking stops
pub const DEFAULT_MAX_DIFFERENCES: usize = 100;

/// Rows between progress updates while streaming
pub const PROGRESS_UPDATE_INTERVAL: u64 = 10_000;

/// Alias both sides are attached under, so one query text serves both connections
pub const ATTACH_ALIAS: &str = "db";
