//! Connection-target parsing and query construction

use crate::error::{RepldiffError, Result};
use crate::metadata::OrderKey;
use crate::ATTACH_ALIAS;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Schema-qualified identity of the table under check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Fully qualified name under the shared attach alias
    pub fn qualified(&self) -> String {
        format!(
            "{}.{}.{}",
            quote_ident(ATTACH_ALIAS),
            quote_ident(&self.schema),
            quote_ident(&self.name)
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Double-quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Build the ordered query both sides run.
///
/// Sort positions are 1-based ordinals; NULLS LAST is explicit so the SQL
/// sort and the engine's value comparison collate NULLs identically on any
/// store.
pub fn build_ordered_select(table: &TableRef, key: &OrderKey) -> String {
    let order_by = key
        .positions()
        .iter()
        .map(|p| format!("{} NULLS LAST", p))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT * FROM {} ORDER BY {}", table.qualified(), order_by)
}

/// Substitute `{VAR}` placeholders in a connection target from the environment
pub fn substitute_env_vars(target: &str) -> Result<String> {
    let mut result = target.to_string();
    let mut start = 0;

    while let Some(open) = result[start..].find('{') {
        let open = start + open;
        match result[open..].find('}') {
            Some(close) => {
                let close = open + close;
                let var_name = result[open + 1..close].to_string();
                let value = env::var(&var_name).map_err(|_| {
                    RepldiffError::config(format!(
                        "Environment variable '{}' not found. Make sure it's set in your environment.",
                        var_name
                    ))
                })?;
                result.replace_range(open..=close, &value);
                start = open + value.len();
            }
            None => start = open + 1,
        }
    }

    Ok(result)
}

/// Parsed form of a connection target string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachTarget {
    /// A database file readable by DuckDB
    File(PathBuf),
    /// A remote store reached through the postgres extension
    Remote {
        host: String,
        port: u16,
        database: String,
    },
}

impl AttachTarget {
    /// Parse a target string: `host:port/database` means a remote store,
    /// anything else is a database file path.
    pub fn parse(raw: &str) -> Self {
        if let Some((host, rest)) = raw.split_once(':') {
            if let Some((port, database)) = rest.split_once('/') {
                if !host.is_empty() && !database.is_empty() {
                    if let Ok(port) = port.parse::<u16>() {
                        return Self::Remote {
                            host: host.to_string(),
                            port,
                            database: database.to_string(),
                        };
                    }
                }
            }
        }
        Self::File(PathBuf::from(raw))
    }

    pub fn looks_remote(raw: &str) -> bool {
        matches!(Self::parse(raw), Self::Remote { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Render the read-only ATTACH statement for this target
    pub fn attach_sql(&self, user: Option<&str>, password: Option<&str>) -> String {
        match self {
            Self::File(path) => format!(
                "ATTACH '{}' AS {} (READ_ONLY)",
                escape_literal(&path.to_string_lossy()),
                ATTACH_ALIAS
            ),
            Self::Remote {
                host,
                port,
                database,
            } => {
                let mut options = format!("host={} port={} dbname={}", host, port, database);
                if let Some(user) = user {
                    options.push_str(&format!(" user={}", user));
                }
                if let Some(password) = password {
                    options.push_str(&format!(" password={}", password));
                }
                format!(
                    "ATTACH '{}' AS {} (TYPE postgres, READ_ONLY)",
                    escape_literal(&options),
                    ATTACH_ALIAS
                )
            }
        }
    }
}
