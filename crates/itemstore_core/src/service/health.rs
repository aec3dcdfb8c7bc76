//! Store health probe.
//!
//! # Invariants
//! - Probes are read-only.

use crate::repo::RepoResult;
use rusqlite::Connection;

/// Outcome of a health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthReport {
    Healthy,
    Unhealthy { error: String },
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub(crate) fn from_probe(result: RepoResult<()>) -> Self {
        match result {
            Ok(()) => Self::Healthy,
            Err(err) => Self::Unhealthy {
                error: err.to_string(),
            },
        }
    }
}

/// Runs a trivial existence read against the `items` table.
pub fn probe_connection(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare("SELECT 1 FROM items LIMIT 1;")?;
    let mut rows = stmt.query([])?;
    rows.next()?;
    Ok(())
}
