//! Ordering-key derivation from catalog metadata

use crate::error::{RepldiffError, Result};
use crate::sql::TableRef;
use crate::ATTACH_ALIAS;
use duckdb::{params, Connection};

/// Ordered 1-based column positions both row streams are sorted and
/// compared by, together with the table's total column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    positions: Vec<usize>,
    column_count: usize,
}

impl OrderKey {
    /// Key over the columns of a unique constraint, in definition order
    pub fn from_unique_key(positions: Vec<usize>, column_count: usize) -> Self {
        Self {
            positions,
            column_count,
        }
    }

    /// Fallback ordering over the full natural column order
    pub fn full_row(column_count: usize) -> Self {
        Self {
            positions: (1..=column_count).collect(),
            column_count,
        }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// True when the key is the full natural column order
    pub fn is_full_row(&self) -> bool {
        self.positions.len() == self.column_count
            && self.positions.iter().enumerate().all(|(i, &p)| p == i + 1)
    }

    /// 0-based column visit order for row comparison: key columns first, in
    /// key order, then every remaining column in natural order. The streams
    /// are sorted by the key alone, so the key columns must be compared
    /// before any others.
    pub fn comparison_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self.positions.iter().map(|&p| p - 1).collect();
        for idx in 0..self.column_count {
            if !self.positions.contains(&(idx + 1)) {
                order.push(idx);
            }
        }
        order
    }

    /// `1, 3` form used in debug traces
    pub fn describe(&self) -> String {
        self.positions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Derive the ordering key for a table from the authoritative side's catalog.
///
/// Prefers the unique constraint (primary key or unique) with the fewest
/// columns, ties broken by the first one defined; falls back to the full
/// natural column order when the table has no unique constraint.
pub fn derive_order_key(conn: &Connection, table: &TableRef) -> Result<OrderKey> {
    let columns = column_names(conn, table)?;
    if columns.is_empty() {
        return Err(RepldiffError::metadata_not_found(
            &table.schema,
            &table.name,
        ));
    }

    let key_columns = shortest_unique_key(conn, table)?;
    if key_columns.is_empty() {
        log::debug!(
            "no unique constraint on {}, ordering by all {} columns",
            table,
            columns.len()
        );
        return Ok(OrderKey::full_row(columns.len()));
    }

    let mut positions = Vec::with_capacity(key_columns.len());
    for name in &key_columns {
        let position = columns.iter().position(|c| c == name).ok_or_else(|| {
            RepldiffError::metadata_not_found(&table.schema, &table.name)
        })?;
        positions.push(position + 1);
    }

    let key = OrderKey::from_unique_key(positions, columns.len());
    log::debug!("unique key criteria for {}: {}", table, key.describe());
    Ok(key)
}

/// Column names in physical order; empty when the table is unknown
fn column_names(conn: &Connection, table: &TableRef) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT column_name FROM duckdb_columns() \
         WHERE database_name = ? AND schema_name = ? AND table_name = ? \
         ORDER BY column_index",
    )?;

    let rows = stmt.query_map(params![ATTACH_ALIAS, table.schema, table.name], |row| {
        row.get::<_, String>(0)
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

/// Column names of the unique constraint with the fewest columns, in
/// definition order; empty when the table has none.
fn shortest_unique_key(conn: &Connection, table: &TableRef) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "WITH shortest AS ( \
             SELECT constraint_column_names AS names \
             FROM duckdb_constraints() \
             WHERE database_name = ? AND schema_name = ? AND table_name = ? \
               AND constraint_type IN ('PRIMARY KEY', 'UNIQUE') \
             ORDER BY len(constraint_column_names), constraint_index \
             LIMIT 1 \
         ) \
         SELECT UNNEST(names) FROM shortest",
    )?;

    let rows = stmt.query_map(params![ATTACH_ALIAS, table.schema, table.name], |row| {
        row.get::<_, String>(0)
    })?;

    let mut key_columns = Vec::new();
    for row in rows {
        key_columns.push(row?);
    }
    Ok(key_columns)
}
