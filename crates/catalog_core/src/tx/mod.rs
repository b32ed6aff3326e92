//! Transaction wrapper shared by all catalog services.
//!
//! # Responsibility
//! - Run one unit of work against a repository handle bound to a fresh
//!   SQLite transaction.
//! - Commit on success; roll back on failure and hand the original error
//!   back to the caller.
//!
//! # Invariants
//! - `work` runs exactly once. Nothing here retries.
//! - Error values pass through untouched, so callers can still branch on
//!   their kind after a rollback.
//! - Units of work do not nest: SQLite refuses `BEGIN` inside an open
//!   transaction and that refusal surfaces as a `DbError`.

use crate::db::DbError;
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Runs units of work atomically against a repository handle.
pub trait TransactionManager {
    /// Repository handle handed to each unit of work.
    type Repo;

    /// Executes `work` inside one transaction.
    ///
    /// # Errors
    /// - Whatever `work` returns, unchanged, after a rollback.
    /// - `E::from(DbError)` when the transaction cannot begin or commit.
    fn do_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self::Repo) -> Result<T, E>,
        E: From<DbError>;
}

/// SQLite transaction manager parameterized by repository type.
///
/// The same begin/commit/rollback path serves category and product
/// repositories; only `repo_factory` differs.
pub struct SqliteTransactionManager<'db, R> {
    conn: &'db Connection,
    repo_factory: fn(&'db Connection) -> R,
}

impl<'db, R> SqliteTransactionManager<'db, R> {
    /// Creates a manager that builds one repository handle per transaction.
    pub fn new(conn: &'db Connection, repo_factory: fn(&'db Connection) -> R) -> Self {
        Self { conn, repo_factory }
    }
}

impl<R> TransactionManager for SqliteTransactionManager<'_, R> {
    type Repo = R;

    fn do_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self::Repo) -> Result<T, E>,
        E: From<DbError>,
    {
        let started_at = Instant::now();
        // Immediate: the write lock is held from the first read on.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(|err| {
                warn!("event=tx_begin module=tx status=error error={err}");
                E::from(DbError::from(err))
            })?;

        let repo = (self.repo_factory)(self.conn);
        match work(&repo) {
            Ok(value) => {
                tx.commit().map_err(|err| {
                    warn!("event=tx_commit module=tx status=error error={err}");
                    E::from(DbError::from(err))
                })?;
                debug!(
                    "event=tx_commit module=tx status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("event=tx_rollback module=tx status=error error={rollback_err}");
                } else {
                    debug!(
                        "event=tx_rollback module=tx status=ok duration_ms={}",
                        started_at.elapsed().as_millis()
                    );
                }
                Err(err)
            }
        }
    }
}
