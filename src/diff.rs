//! Dual-cursor streaming diff over two ordered row sources

use crate::error::Result;
use crate::metadata::OrderKey;
use crate::progress::ProgressReporter;
use crate::report::{render_row, DiffReport};
use crate::rowsource::{Row, RowSource, Side};
use crate::PROGRESS_UPDATE_INTERVAL;
use std::cmp::Ordering;

/// Merge-join diff of two row streams sorted by the same ordering key.
///
/// Each side is consumed once, in order; memory stays bounded by the
/// difference budget.
pub struct DiffEngine {
    compare_order: Vec<usize>,
    budget: usize,
}

/// What to do with the current pair of cursors
enum Step {
    Done,
    MatchedBoth,
    TakeLeft,
    TakeRight,
}

impl DiffEngine {
    pub fn new(order_key: &OrderKey, budget: usize) -> Self {
        Self {
            compare_order: order_key.comparison_order(),
            budget,
        }
    }

    /// Walk both sources in lock-step, classifying every row, until both
    /// are exhausted or the difference budget is reached. A read failure
    /// on either side aborts the whole comparison.
    pub fn compare<L, R>(
        &self,
        left: &mut L,
        right: &mut R,
        progress: &ProgressReporter,
    ) -> Result<DiffReport>
    where
        L: RowSource,
        R: RowSource,
    {
        let mut report = DiffReport::new(self.budget);
        let mut rows_seen: u64 = 0;

        loop {
            if report.budget_reached() {
                report.mark_truncated();
                break;
            }

            let step = {
                match (left.current()?, right.current()?) {
                    (None, None) => Step::Done,
                    (None, Some(_)) => Step::TakeRight,
                    (Some(_), None) => Step::TakeLeft,
                    (Some(l), Some(r)) => match self.compare_rows(l, r) {
                        Ordering::Equal => Step::MatchedBoth,
                        Ordering::Less => Step::TakeLeft,
                        Ordering::Greater => Step::TakeRight,
                    },
                }
            };

            match step {
                Step::Done => break,
                Step::MatchedBoth => {
                    left.advance()?;
                    right.advance()?;
                }
                Step::TakeLeft => {
                    if let Some(row) = left.advance()? {
                        log::debug!("row missing from replica: {}", render_row(&row));
                        report.record(Side::Source, row);
                    }
                }
                Step::TakeRight => {
                    if let Some(row) = right.advance()? {
                        log::debug!("row missing from source: {}", render_row(&row));
                        report.record(Side::Replica, row);
                    }
                }
            }

            rows_seen += 1;
            if rows_seen % PROGRESS_UPDATE_INTERVAL == 0 {
                progress.update_rows(rows_seen);
            }
        }

        progress.update_rows(rows_seen);
        Ok(report)
    }

    /// Compare two rows column-by-column in key-then-remaining order,
    /// stopping at the first differing column.
    fn compare_rows(&self, left: &Row, right: &Row) -> Ordering {
        for &idx in &self.compare_order {
            let ord = compare_values(&left[idx], &right[idx]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Ordinal comparison of two nullable values. NULL collates after any
/// value, matching the NULLS LAST ordering both streams are produced with.
fn compare_values(left: &Option<String>, right: &Option<String>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => l.as_bytes().cmp(r.as_bytes()),
    }
}
