//! Command implementations.

pub mod category;
pub mod completions;
pub mod init;
pub mod step;
pub mod version;

use crate::config::{busy_timeout_ms, resolve_db_path};
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use std::path::PathBuf;

/// Open the database for a command that needs an initialized store.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] if the database file does not exist,
/// or an error if it cannot be opened.
pub(crate) fn open_storage(db_path: Option<&PathBuf>) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or(Error::NotInitialized)?;

    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    SqliteStorage::open_with_timeout(&db_path, busy_timeout_ms()?)
}
