//! Category table access.
//!
//! Every statement binds its arguments; none is built by string
//! concatenation. The store performs no validation and no referential
//! enforcement: callers check [`CategoryStore::has_steps`] before removing.

use crate::error::{Error, Result};
use crate::model::Category;
use crate::storage::like_pattern;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

/// Borrowing store over the `categories` table.
#[derive(Debug, Clone, Copy)]
pub struct CategoryStore<'c> {
    conn: &'c Connection,
}

impl<'c> CategoryStore<'c> {
    /// Create a store over an open connection (or transaction).
    #[must_use]
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a category and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create(&self, name: &str, description: Option<&str>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, description) VALUES (?1, ?2)",
            rusqlite::params![name, description],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, name, "Created category");
        Ok(id)
    }

    /// Categories whose name contains `fragment`, ordered by name.
    ///
    /// An empty fragment lists every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_by_name(&self, fragment: &str) -> Result<Vec<Category>> {
        debug!(fragment, "Searching categories");

        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM categories
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name ASC",
        )?;

        let categories = stmt
            .query_map([like_pattern(fragment)], map_category_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by id, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_by_id(&self, id: i64) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, description FROM categories WHERE id = ?1",
                [id],
                map_category_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Replace name and description of an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] if no row has this id, or an
    /// error if the update fails.
    pub fn update(&self, id: i64, name: &str, description: Option<&str>) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE categories SET name = ?1, description = ?2 WHERE id = ?3",
            rusqlite::params![name, description, id],
        )?;

        if affected == 0 {
            return Err(Error::CategoryNotFound { id });
        }

        info!(id, name, "Updated category");
        Ok(())
    }

    /// Delete a category by id, returning whether a row was removed.
    ///
    /// Steps referencing the category are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;

        info!(id, removed = affected > 0, "Removed category");
        Ok(affected > 0)
    }

    /// Whether at least one step references this category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_steps(&self, category_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM steps WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn map_category_row(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::storage::SqliteStorage;

    fn names(categories: &[crate::model::Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_create_then_fetch_by_id() {
        let storage = SqliteStorage::open_memory().unwrap();
        let store = storage.categories();

        let id = store.create("Kitchen", Some("Cooking area")).unwrap();
        let fetched = store.search_by_id(id).unwrap().unwrap();

        assert_eq!(fetched.id, id);
        assert_eq!(fetched.name, "Kitchen");
        assert_eq!(fetched.description.as_deref(), Some("Cooking area"));
    }

    #[test]
    fn test_search_by_id_absent() {
        let storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.categories().search_by_id(404).unwrap().is_none());
    }

    #[test]
    fn test_empty_fragment_lists_all_ordered_by_name() {
        let storage = SqliteStorage::open_memory().unwrap();
        let store = storage.categories();
        store.create("Plumbing", None).unwrap();
        store.create("Electrical", None).unwrap();
        store.create("Masonry", None).unwrap();

        let all = store.search_by_name("").unwrap();
        assert_eq!(names(&all), vec!["Electrical", "Masonry", "Plumbing"]);
    }

    #[test]
    fn test_fragment_matches_substrings_only() {
        let storage = SqliteStorage::open_memory().unwrap();
        let store = storage.categories();
        store.create("Kitchen", None).unwrap();
        store.create("Kitchenette", None).unwrap();
        store.create("Bathroom", None).unwrap();

        let hits = store.search_by_name("itchen").unwrap();
        assert_eq!(names(&hits), vec!["Kitchen", "Kitchenette"]);

        assert!(store.search_by_name("Garage").unwrap().is_empty());
    }

    #[test]
    fn test_wildcards_in_fragment_are_literal() {
        let storage = SqliteStorage::open_memory().unwrap();
        let store = storage.categories();
        store.create("100% done", None).unwrap();
        store.create("Finishing", None).unwrap();
        store.create("snake_case", None).unwrap();

        assert_eq!(names(&store.search_by_name("%").unwrap()), vec!["100% done"]);
        assert_eq!(names(&store.search_by_name("_").unwrap()), vec!["snake_case"]);
    }

    #[test]
    fn test_update_replaces_fields() {
        let storage = SqliteStorage::open_memory().unwrap();
        let store = storage.categories();
        let id = store.create("Kitchen", Some("old")).unwrap();

        store.update(id, "Kitchen & Pantry", None).unwrap();

        let fetched = store.search_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.name, "Kitchen & Pantry");
        assert!(fetched.description.is_none());
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let storage = SqliteStorage::open_memory().unwrap();
        let result = storage.categories().update(77, "Ghost", None);
        assert!(matches!(result, Err(Error::CategoryNotFound { id: 77 })));
    }

    #[test]
    fn test_remove_and_has_steps() {
        let storage = SqliteStorage::open_memory().unwrap();
        let categories = storage.categories();
        let id = categories.create("Kitchen", None).unwrap();
        assert!(!categories.has_steps(id).unwrap());

        let step_id = storage.steps().create("Prep", None, id).unwrap();
        assert!(categories.has_steps(id).unwrap());

        storage.steps().remove(step_id).unwrap();
        assert!(!categories.has_steps(id).unwrap());

        assert!(categories.remove(id).unwrap());
        assert!(!categories.remove(id).unwrap());
        assert!(categories.search_by_name("").unwrap().is_empty());
    }

    #[test]
    fn test_raw_remove_ignores_referencing_steps() {
        let storage = SqliteStorage::open_memory().unwrap();
        let id = storage.categories().create("Kitchen", None).unwrap();
        storage.steps().create("Prep", None, id).unwrap();

        // The store itself does not guard; callers must check has_steps
        assert!(storage.categories().remove(id).unwrap());
        assert_eq!(storage.steps().search_by_name("").unwrap().len(), 1);
    }
}
