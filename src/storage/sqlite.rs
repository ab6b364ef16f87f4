//! SQLite connection ownership.
//!
//! [`SqliteStorage`] owns the connection, applies schema on open and hands
//! out the table stores, which borrow the connection for their lifetime.

use crate::error::Result;
use crate::storage::category::CategoryStore;
use crate::storage::schema::apply_schema;
use crate::storage::step::StepStore;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Busy timeout used when the caller does not supply one.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let timeout = timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        conn.busy_timeout(Duration::from_millis(timeout))?;

        debug!(path = %path.display(), timeout_ms = timeout, "Opened database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, applying schema and migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Category store over this connection.
    #[must_use]
    pub fn categories(&self) -> CategoryStore<'_> {
        CategoryStore::new(&self.conn)
    }

    /// Step store over this connection.
    #[must_use]
    pub fn steps(&self) -> StepStore<'_> {
        StepStore::new(&self.conn)
    }

    /// Run `f` inside an IMMEDIATE transaction.
    ///
    /// The write lock is taken up front so a check followed by a mutation
    /// inside `f` sees no interleaved writer. Commits on `Ok`, rolls back
    /// when `f` returns an error.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or an error if the transaction fails.
    pub fn transaction<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        debug!(op, "Begin transaction");
        let result = f(&tx)?;
        tx.commit()?;
        debug!(op, "Committed transaction");

        Ok(result)
    }
}
