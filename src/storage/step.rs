//! Step table access.
//!
//! Reads LEFT JOIN `categories` so a step whose category was removed
//! out-of-band still comes back, with `category_name` set to `None`.

use crate::error::{Error, Result};
use crate::model::Step;
use crate::storage::like_pattern;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

const SELECT_STEP: &str = "SELECT s.id, s.name, s.description, s.category_id, c.name
     FROM steps s
     LEFT JOIN categories c ON c.id = s.category_id";

/// Borrowing store over the `steps` table.
#[derive(Debug, Clone, Copy)]
pub struct StepStore<'c> {
    conn: &'c Connection,
}

impl<'c> StepStore<'c> {
    /// Create a store over an open connection (or transaction).
    #[must_use]
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a step and return its generated id.
    ///
    /// The category reference is stored as given; resolving it is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create(&self, name: &str, description: Option<&str>, category_id: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO steps (name, description, category_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, description, category_id],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, name, category_id, "Created step");
        Ok(id)
    }

    /// Steps whose name contains `fragment`, ordered by step name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_by_name(&self, fragment: &str) -> Result<Vec<Step>> {
        debug!(fragment, "Searching steps");

        let sql = format!("{SELECT_STEP} WHERE s.name LIKE ?1 ESCAPE '\\' ORDER BY s.name ASC");
        let mut stmt = self.conn.prepare(&sql)?;

        let steps = stmt
            .query_map([like_pattern(fragment)], map_step_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(steps)
    }

    /// Get a step by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepNotFound`] if no row has this id, or an error if
    /// the query fails.
    pub fn search_by_id(&self, id: i64) -> Result<Step> {
        let sql = format!("{SELECT_STEP} WHERE s.id = ?1");
        self.conn
            .query_row(&sql, [id], map_step_row)
            .optional()?
            .ok_or(Error::StepNotFound { id })
    }

    /// Replace name, description and category of an existing step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepNotFound`] if no row has this id, or an error if
    /// the update fails.
    pub fn update(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
        category_id: i64,
    ) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE steps SET name = ?1, description = ?2, category_id = ?3 WHERE id = ?4",
            rusqlite::params![name, description, category_id, id],
        )?;

        if affected == 0 {
            return Err(Error::StepNotFound { id });
        }

        info!(id, name, category_id, "Updated step");
        Ok(())
    }

    /// Delete a step by id, returning whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM steps WHERE id = ?1", [id])?;

        info!(id, removed = affected > 0, "Removed step");
        Ok(affected > 0)
    }

    /// Whether at least one project assignment references this step.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_projects(&self, step_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM project_steps WHERE step_id = ?1",
            [step_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn map_step_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
    Ok(Step {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        category_name: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::storage::SqliteStorage;

    fn assign_to_project(storage: &SqliteStorage, project_id: i64, step_id: i64) {
        storage
            .conn()
            .execute(
                "INSERT INTO project_steps (project_id, step_id) VALUES (?1, ?2)",
                [project_id, step_id],
            )
            .unwrap();
    }

    #[test]
    fn test_create_then_fetch_joins_category_name() {
        let storage = SqliteStorage::open_memory().unwrap();
        let kitchen = storage.categories().create("Kitchen", None).unwrap();

        let id = storage.steps().create("Prep", Some("Mise en place"), kitchen).unwrap();
        let step = storage.steps().search_by_id(id).unwrap();

        assert_eq!(step.name, "Prep");
        assert_eq!(step.description.as_deref(), Some("Mise en place"));
        assert_eq!(step.category_id, kitchen);
        assert_eq!(step.category_name.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_search_by_id_missing_is_not_found() {
        let storage = SqliteStorage::open_memory().unwrap();
        let result = storage.steps().search_by_id(12);
        assert!(matches!(result, Err(Error::StepNotFound { id: 12 })));
    }

    #[test]
    fn test_search_by_name_orders_and_filters() {
        let storage = SqliteStorage::open_memory().unwrap();
        let cat = storage.categories().create("Site", None).unwrap();
        let steps = storage.steps();
        steps.create("Survey", None, cat).unwrap();
        steps.create("Excavation", None, cat).unwrap();
        steps.create("Foundation survey", None, cat).unwrap();

        let all: Vec<String> = steps
            .search_by_name("")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(all, vec!["Excavation", "Foundation survey", "Survey"]);

        let hits: Vec<String> = steps
            .search_by_name("urvey")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(hits, vec!["Foundation survey", "Survey"]);
    }

    #[test]
    fn test_orphaned_step_has_no_category_name() {
        let storage = SqliteStorage::open_memory().unwrap();
        let cat = storage.categories().create("Temporary", None).unwrap();
        let id = storage.steps().create("Leftover", None, cat).unwrap();

        // Out-of-band removal bypassing the guard
        storage.categories().remove(cat).unwrap();

        let step = storage.steps().search_by_id(id).unwrap();
        assert_eq!(step.category_id, cat);
        assert!(step.category_name.is_none());

        let listed = storage.steps().search_by_name("Left").unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].category_name.is_none());
    }

    #[test]
    fn test_update_moves_step_between_categories() {
        let storage = SqliteStorage::open_memory().unwrap();
        let a = storage.categories().create("A", None).unwrap();
        let b = storage.categories().create("B", None).unwrap();
        let id = storage.steps().create("Paint", None, a).unwrap();

        storage.steps().update(id, "Paint walls", Some("two coats"), b).unwrap();

        let step = storage.steps().search_by_id(id).unwrap();
        assert_eq!(step.name, "Paint walls");
        assert_eq!(step.category_name.as_deref(), Some("B"));
        assert!(storage.categories().has_steps(b).unwrap());
        assert!(!storage.categories().has_steps(a).unwrap());
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let storage = SqliteStorage::open_memory().unwrap();
        let result = storage.steps().update(5, "Nope", None, 1);
        assert!(matches!(result, Err(Error::StepNotFound { id: 5 })));
    }

    #[test]
    fn test_has_projects() {
        let storage = SqliteStorage::open_memory().unwrap();
        let cat = storage.categories().create("Site", None).unwrap();
        let id = storage.steps().create("Survey", None, cat).unwrap();
        assert!(!storage.steps().has_projects(id).unwrap());

        assign_to_project(&storage, 1, id);
        assert!(storage.steps().has_projects(id).unwrap());
    }

    #[test]
    fn test_remove() {
        let storage = SqliteStorage::open_memory().unwrap();
        let cat = storage.categories().create("Site", None).unwrap();
        let id = storage.steps().create("Survey", None, cat).unwrap();

        assert!(storage.steps().remove(id).unwrap());
        assert!(!storage.steps().remove(id).unwrap());
        assert!(storage.steps().search_by_id(id).unwrap_err().is_not_found());
    }
}
