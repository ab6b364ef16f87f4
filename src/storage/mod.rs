//! SQLite storage layer for stepbook.
//!
//! # Submodules
//!
//! - [`category`] - `categories` table store
//! - [`step`] - `steps` table store (joined reads)
//! - [`schema`] - Database schema definitions
//! - [`migrations`] - Embedded schema migrations
//! - [`sqlite`] - Connection ownership and transactions

pub mod category;
pub mod migrations;
pub mod schema;
pub mod sqlite;
pub mod step;

pub use category::CategoryStore;
pub use sqlite::SqliteStorage;
pub use step::StepStore;

/// Build a `LIKE` pattern matching `fragment` anywhere in the column.
///
/// `%`, `_` and the escape character itself are escaped so the fragment is
/// matched literally; queries pair this with `ESCAPE '\'`.
pub(crate) fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("Kit"), "%Kit%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
