//! Initialize the stepbook database.
//!
//! Creates the data directory, the database file and the schema. Every
//! other command refuses to run until this has happened.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    recreated: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if the database exists and `force`
/// is not set, or an error if the directory or database cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or_else(|| {
        Error::Config("Could not determine a database location".to_string())
    })?;

    let recreated = init_database(&db_path, force)?;

    if json {
        let output = InitOutput {
            database: db_path,
            recreated,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !crate::is_silent() {
        println!("Initialized stepbook database");
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: sb category create <name>");
    }

    Ok(())
}

/// Create (or with `force`, recreate) the database at `db_path`.
///
/// Returns whether an existing database was replaced.
fn init_database(db_path: &Path, force: bool) -> Result<bool> {
    let exists = db_path.exists();
    if exists && !force {
        return Err(Error::AlreadyInitialized {
            path: db_path.to_path_buf(),
        });
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    if exists {
        fs::remove_file(db_path)?;
        for suffix in ["-wal", "-shm"] {
            let sidecar = PathBuf::from(format!("{}{suffix}", db_path.display()));
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
        }
    }

    SqliteStorage::open(db_path)?;
    info!(path = %db_path.display(), recreated = exists, "Initialized database");

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_database_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("stepbook.db");

        let recreated = init_database(&path, false).unwrap();
        assert!(!recreated);
        assert!(path.exists());

        let storage = SqliteStorage::open(&path).unwrap();
        assert!(storage.categories().search_by_name("").unwrap().is_empty());
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepbook.db");

        init_database(&path, false).unwrap();
        let result = init_database(&path, false);
        assert!(matches!(result, Err(Error::AlreadyInitialized { .. })));
    }

    #[test]
    fn test_init_force_recreates_empty_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepbook.db");

        init_database(&path, false).unwrap();
        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.categories().create("Kitchen", None).unwrap();
        }

        assert!(init_database(&path, true).unwrap());

        let storage = SqliteStorage::open(&path).unwrap();
        assert!(storage.categories().search_by_name("").unwrap().is_empty());
    }
}
