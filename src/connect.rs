//! Connection setup for the two sides of a check

use crate::cli::Config;
use crate::error::{RepldiffError, Result};
use crate::rowsource::Side;
use crate::sql::{substitute_env_vars, AttachTarget};
use duckdb::Connection;

/// Open a connection with the authoritative store attached
pub fn open_source(config: &Config) -> Result<Connection> {
    open_side(
        &config.connection_url,
        config.user.as_deref(),
        config.password.as_deref(),
        Side::Source,
    )
}

/// Open a connection with the replica attached
pub fn open_replica(config: &Config) -> Result<Connection> {
    open_side(
        &config.replica,
        config.user.as_deref(),
        config.password.as_deref(),
        Side::Replica,
    )
}

/// Open an in-memory connection and attach one side's database read-only
/// under the shared alias. Each side owns its connection exclusively.
pub fn open_side(
    target: &str,
    user: Option<&str>,
    password: Option<&str>,
    side: Side,
) -> Result<Connection> {
    let target = substitute_env_vars(target)?;
    let target = AttachTarget::parse(&target);
    log::debug!("{} target: {:?}", side, target);

    let conn = Connection::open_in_memory()
        .map_err(|e| RepldiffError::connection(side.as_str(), e.to_string()))?;

    if target.is_remote() {
        conn.execute_batch("INSTALL postgres; LOAD postgres;")
            .map_err(|e| {
                RepldiffError::connection(
                    side.as_str(),
                    format!("postgres extension unavailable: {}", e),
                )
            })?;
    }

    conn.execute_batch(&target.attach_sql(user, password))
        .map_err(|e| RepldiffError::connection(side.as_str(), e.to_string()))?;

    Ok(conn)
}
