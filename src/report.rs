//! Accumulation and rendering of detected differences

use crate::error::Result;
use crate::rowsource::{Row, Side};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Render a row as its column values joined by `" | "`
pub fn render_row(row: &Row) -> String {
    row.iter()
        .map(|v| v.as_deref().unwrap_or("NULL"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Bounded accumulator for the rows found on only one side.
///
/// Discovery order is preserved; the difference budget is enforced here,
/// not by callers.
#[derive(Debug)]
pub struct DiffReport {
    left_only: Vec<Row>,
    right_only: Vec<Row>,
    budget: usize,
    truncated: bool,
}

impl DiffReport {
    pub fn new(budget: usize) -> Self {
        Self {
            left_only: Vec::new(),
            right_only: Vec::new(),
            budget,
            truncated: false,
        }
    }

    /// Record a row seen on exactly one side. Ignored once the budget is full.
    pub fn record(&mut self, side: Side, row: Row) {
        if self.budget_reached() {
            return;
        }
        match side {
            Side::Source => self.left_only.push(row),
            Side::Replica => self.right_only.push(row),
        }
    }

    pub fn len(&self) -> usize {
        self.left_only.len() + self.right_only.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }

    pub fn budget_reached(&self) -> bool {
        self.len() >= self.budget
    }

    /// Mark that the scan stopped on the budget rather than on end-of-data
    pub fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Rows present only in the authoritative store, in discovery order
    pub fn left_only(&self) -> &[Row] {
        &self.left_only
    }

    /// Rows present only on the replica, in discovery order
    pub fn right_only(&self) -> &[Row] {
        &self.right_only
    }

    /// Human-readable summary of the check
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "✅ Source and replica are in sync.".to_string();
        }

        let mut out = String::new();
        if self.truncated {
            out.push_str(&format!(
                "❌ Source and replica are NOT in sync. Showing the first {} differences; more may exist.\n",
                self.len()
            ));
        } else {
            out.push_str(&format!(
                "❌ Source and replica are NOT in sync. Found {} difference{}.\n",
                self.len(),
                if self.len() == 1 { "" } else { "s" }
            ));
        }

        if !self.left_only.is_empty() {
            out.push_str("Rows missing from the replica:\n");
            for row in &self.left_only {
                out.push_str(&render_row(row));
                out.push('\n');
            }
        }
        if !self.right_only.is_empty() {
            out.push_str("Rows missing from the source:\n");
            for row in &self.right_only {
                out.push_str(&render_row(row));
                out.push('\n');
            }
        }

        if out.ends_with('\n') {
            out.pop();
        }
        out
    }
}

/// JSON rendering of a report
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    checked_at: DateTime<Utc>,
    in_sync: bool,
    differences_shown: usize,
    truncated: bool,
    missing_from_replica: &'a [Row],
    missing_from_source: &'a [Row],
}

impl JsonFormatter {
    pub fn format(report: &DiffReport) -> Result<String> {
        let doc = JsonReport {
            checked_at: Utc::now(),
            in_sync: report.is_empty(),
            differences_shown: report.len(),
            truncated: report.truncated(),
            missing_from_replica: report.left_only(),
            missing_from_source: report.right_only(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}
