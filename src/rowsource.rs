//! Ordered single-pass row cursors over each side of a check

use crate::error::{RepldiffError, Result};
use duckdb::types::ValueRef;
use duckdb::Rows;
use std::collections::VecDeque;
use std::fmt;

/// An ordered, fixed-length sequence of nullable text-typed column values
pub type Row = Vec<Option<String>>;

/// Which side of the check a source streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Replica,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Replica => "replica",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pull-based ordered cursor over one side's rows.
///
/// The caller must have issued a query ordered by the shared ordering key;
/// the source itself performs no sorting.
pub trait RowSource {
    /// The row under the cursor, or `None` once the source is exhausted.
    /// The first call after construction or `advance` performs the
    /// underlying fetch; repeated calls return the same row.
    fn current(&mut self) -> Result<Option<&Row>>;

    /// Consume the current row, returning it, without fetching the next
    /// one. A no-op returning `Ok(None)` once exhausted.
    fn advance(&mut self) -> Result<Option<Row>>;
}

enum Slot {
    Pending,
    Ready(Row),
    Exhausted,
}

/// Streaming source over a DuckDB cursor.
///
/// Holds at most one buffered row; the cursor is only read when the engine
/// asks for the next row, so stopping on the difference budget leaves the
/// remainder of the result set untouched.
pub struct DbRowSource<'stmt> {
    rows: Rows<'stmt>,
    side: Side,
    column_count: usize,
    slot: Slot,
}

impl<'stmt> DbRowSource<'stmt> {
    pub fn new(side: Side, rows: Rows<'stmt>, column_count: usize) -> Self {
        Self {
            rows,
            side,
            column_count,
            slot: Slot::Pending,
        }
    }

    fn ensure_fetched(&mut self) -> Result<()> {
        if !matches!(self.slot, Slot::Pending) {
            return Ok(());
        }

        let side = self.side;
        let column_count = self.column_count;
        let next = self
            .rows
            .next()
            .map_err(|e| RepldiffError::source_read(side.as_str(), e.to_string()))?;

        self.slot = match next {
            Some(row) => {
                let rendered = render_db_row(row, column_count)
                    .map_err(|e| RepldiffError::source_read(side.as_str(), e.to_string()))?;
                Slot::Ready(rendered)
            }
            None => Slot::Exhausted,
        };
        Ok(())
    }
}

impl RowSource for DbRowSource<'_> {
    fn current(&mut self) -> Result<Option<&Row>> {
        self.ensure_fetched()?;
        match &self.slot {
            Slot::Ready(row) => Ok(Some(row)),
            _ => Ok(None),
        }
    }

    fn advance(&mut self) -> Result<Option<Row>> {
        self.ensure_fetched()?;
        match std::mem::replace(&mut self.slot, Slot::Pending) {
            Slot::Ready(row) => Ok(Some(row)),
            _ => {
                self.slot = Slot::Exhausted;
                Ok(None)
            }
        }
    }
}

/// Render a database row to owned nullable text values.
///
/// Both sides go through this one conversion, so equal stored values always
/// render to equal text.
fn render_db_row(
    row: &duckdb::Row<'_>,
    column_count: usize,
) -> std::result::Result<Row, duckdb::Error> {
    let mut values = Vec::with_capacity(column_count);
    for i in 0..column_count {
        let value = match row.get_ref(i)? {
            ValueRef::Null => None,
            other => Some(render_value(other)),
        };
        values.push(value);
    }
    Ok(values)
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Boolean(b) => b.to_string(),
        ValueRef::TinyInt(i) => i.to_string(),
        ValueRef::SmallInt(i) => i.to_string(),
        ValueRef::Int(i) => i.to_string(),
        ValueRef::BigInt(i) => i.to_string(),
        ValueRef::HugeInt(i) => i.to_string(),
        ValueRef::UTinyInt(i) => i.to_string(),
        ValueRef::USmallInt(i) => i.to_string(),
        ValueRef::UInt(i) => i.to_string(),
        ValueRef::UBigInt(i) => i.to_string(),
        ValueRef::Float(f) => f.to_string(),
        ValueRef::Double(f) => f.to_string(),
        ValueRef::Decimal(d) => d.to_string(),
        ValueRef::Text(s) => String::from_utf8_lossy(s).to_string(),
        ValueRef::Blob(b) => format!("<blob:{} bytes>", b.len()),
        ValueRef::Date32(d) => format!("{:?}", d),
        ValueRef::Time64(t, _) => format!("{:?}", t),
        ValueRef::Timestamp(ts, _) => format!("{:?}", ts),
        _ => "<unknown>".to_string(),
    }
}

/// In-memory source used to exercise the engine without a database
pub struct MemoryRowSource {
    rows: VecDeque<Row>,
}

impl MemoryRowSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows: rows.into() }
    }
}

impl RowSource for MemoryRowSource {
    fn current(&mut self) -> Result<Option<&Row>> {
        Ok(self.rows.front())
    }

    fn advance(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
