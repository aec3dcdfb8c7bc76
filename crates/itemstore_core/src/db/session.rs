//! Request-scoped unit of work over one SQLite transaction.
//!
//! # Invariants
//! - The transaction is committed only when the work returns `Ok`.
//! - Any `Err` from the work rolls the transaction back before the error is
//!   returned, so no partial mutation is visible to later reads.
//! - A failed commit surfaces as an error; the transaction is rolled back by
//!   SQLite in that case.

use super::DbError;
use log::{debug, error};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::Display;

/// Runs `work` inside one immediate transaction on `conn`.
///
/// `scope` names the unit of work in log events (for example `items`).
pub fn run_in_session<T, E>(
    conn: &mut Connection,
    scope: &str,
    work: impl FnOnce(&Transaction<'_>) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DbError> + Display,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| E::from(DbError::from(err)))?;

    match work(&tx) {
        Ok(value) => {
            tx.commit().map_err(|err| {
                error!(
                    "event=session_commit module=db status=error scope={} error={}",
                    scope, err
                );
                E::from(DbError::from(err))
            })?;
            Ok(value)
        }
        Err(err) => {
            match tx.rollback() {
                Ok(()) => debug!(
                    "event=session_rollback module=db status=ok scope={} reason={}",
                    scope, err
                ),
                Err(rollback_err) => error!(
                    "event=session_rollback module=db status=error scope={} reason={} error={}",
                    scope, err, rollback_err
                ),
            }
            Err(err)
        }
    }
}
