//! Database schema definitions.
//!
//! This module contains the base SQLite schema for stepbook. Later
//! changes live in [`super::migrations`].

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The base SQL schema for the stepbook database.
///
/// `steps.category_id` deliberately has no `REFERENCES` clause: referential
/// integrity is checked by callers before deletes, and a step whose category
/// disappeared out-of-band must still be readable.
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- ====================
-- Core Tables
-- ====================

-- Categories: named groupings of steps
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT
);

-- Steps: units of work, each belonging to one category
CREATE TABLE IF NOT EXISTS steps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    category_id INTEGER NOT NULL
);

-- Project assignments: owned by the project side, read here only for
-- the step reference check
CREATE TABLE IF NOT EXISTS project_steps (
    project_id INTEGER NOT NULL,
    step_id INTEGER NOT NULL,
    PRIMARY KEY (project_id, step_id)
);
";

/// Apply the schema to the database.
///
/// Idempotent: every statement uses `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // In-memory databases report "memory" and ignore WAL; that is fine.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    super::migrations::run_migrations(conn)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Failed to apply schema");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"categories".to_string()));
        assert!(tables.contains(&"steps".to_string()));
        assert!(tables.contains(&"project_steps".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_schema(&conn).expect("First apply failed");
        apply_schema(&conn).expect("Second apply failed");
    }

    #[test]
    fn test_name_is_required() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let result = conn.execute("INSERT INTO categories (name) VALUES (NULL)", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_steps_accept_dangling_category() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        // No storage-level foreign key: callers own the reference checks
        let result = conn.execute(
            "INSERT INTO steps (name, category_id) VALUES ('Orphan', 999)",
            [],
        );
        assert!(result.is_ok());
    }
}
