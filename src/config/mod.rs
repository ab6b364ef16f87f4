//! Configuration management.
//!
//! Resolves where the database lives and how the connection is tuned.
//! stepbook keeps one local database per user at
//! `~/.stepbook/data/stepbook.db` unless told otherwise.

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "stepbook.db";

/// Get the global stepbook directory location (`~/.stepbook/`).
#[must_use]
pub fn global_stepbook_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".stepbook"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `SB_TEST_DB=1` (or any non-empty value
/// other than `0` / `false`). It redirects the database to an isolated
/// location.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("SB_TEST_DB").is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Get the test database path (`~/.stepbook/test/stepbook.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_stepbook_dir().map(|dir| dir.join("test").join(DB_FILE_NAME))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided (`--db` / `SB_DB`), use it directly
/// 2. `SB_TEST_DB` environment variable → uses test database
/// 3. `STEPBOOK_DB` environment variable
/// 4. Global location: `~/.stepbook/data/stepbook.db`
///
/// Returns `None` if no home directory can be determined.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    let env_path = std::env::var("STEPBOOK_DB").ok();
    resolve_db_path_with(explicit_path, is_test_mode(), env_path.as_deref())
}

fn resolve_db_path_with(
    explicit_path: Option<&Path>,
    test_mode: bool,
    env_path: Option<&str>,
) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if test_mode {
        return test_db_path();
    }

    if let Some(db_path) = env_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(db_path));
    }

    global_stepbook_dir().map(|dir| dir.join("data").join(DB_FILE_NAME))
}

/// Busy timeout override from `SB_BUSY_TIMEOUT_MS`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable is set but not a number.
pub fn busy_timeout_ms() -> Result<Option<u64>> {
    match std::env::var("SB_BUSY_TIMEOUT_MS") {
        Ok(raw) => parse_timeout(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::Config(format!(
            "SB_BUSY_TIMEOUT_MS must be a whole number of milliseconds, got '{raw}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/db.sqlite");
        let result = resolve_db_path(Some(&explicit));
        assert_eq!(result, Some(explicit));
    }

    #[test]
    fn test_resolve_db_path_default_location() {
        let path = resolve_db_path_with(None, false, None).unwrap();
        assert_eq!(path, global_stepbook_dir().unwrap().join("data").join(DB_FILE_NAME));

        let blank = resolve_db_path_with(None, false, Some("  ")).unwrap();
        assert_eq!(blank, path);
    }

    #[test]
    fn test_resolve_db_path_priority() {
        let explicit = PathBuf::from("/flag/stepbook.db");
        let from_env = "/env/other.sqlite";

        assert_eq!(
            resolve_db_path_with(Some(&explicit), true, Some(from_env)),
            Some(explicit)
        );
        assert_eq!(resolve_db_path_with(None, true, Some(from_env)), test_db_path());
        assert_eq!(
            resolve_db_path_with(None, false, Some(from_env)),
            Some(PathBuf::from(from_env))
        );
    }

    #[test]
    fn test_test_db_path_is_separate() {
        let global = global_stepbook_dir().unwrap();
        let test = test_db_path().unwrap();

        assert!(test.to_string_lossy().contains("test"));
        assert!(test.ends_with(DB_FILE_NAME));
        assert_ne!(global.join("data").join(DB_FILE_NAME), test);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("FALSE"));

        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("yes"));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("250").unwrap(), 250);
        assert_eq!(parse_timeout(" 10 ").unwrap(), 10);
        assert!(matches!(parse_timeout("soon"), Err(Error::Config(_))));
    }
}
