//! Error types for stepbook.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, 5=dependents, ...)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stepbook operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    CategoryNotFound,
    StepNotFound,
    AmbiguousName,

    // Validation (exit 4)
    RequiredField,

    // Dependency (exit 5)
    HasDependents,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::StepNotFound => "STEP_NOT_FOUND",
            Self::AmbiguousName => "AMBIGUOUS_NAME",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::HasDependents => "HAS_DEPENDENTS",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::CategoryNotFound | Self::StepNotFound | Self::AmbiguousName => 3,
            Self::RequiredField => 4,
            Self::HasDependents => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller can succeed by retrying with corrected input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RequiredField | Self::AmbiguousName)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in stepbook operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `sb init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: i64 },

    #[error("Category not found: '{name}'")]
    CategoryNameNotFound { name: String, similar: Vec<String> },

    #[error("Category name '{name}' matches {} categories", ids.len())]
    AmbiguousCategoryName { name: String, ids: Vec<i64> },

    #[error("Step not found: {id}")]
    StepNotFound { id: i64 },

    #[error("Field '{field}' is required")]
    RequiredField { field: &'static str },

    /// A delete was refused because other rows still reference the target.
    #[error("Cannot delete {entity} {id}: still referenced by {dependents}")]
    HasDependents {
        entity: &'static str,
        id: i64,
        dependents: &'static str,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::CategoryNotFound { .. } | Self::CategoryNameNotFound { .. } => {
                ErrorCode::CategoryNotFound
            }
            Self::AmbiguousCategoryName { .. } => ErrorCode::AmbiguousName,
            Self::StepNotFound { .. } => ErrorCode::StepNotFound,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::HasDependents { .. } => ErrorCode::HasDependents,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Whether this is one of the not-found variants.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound { .. }
                | Self::CategoryNameNotFound { .. }
                | Self::StepNotFound { .. }
        )
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => Some("Run `sb init` to create the database".to_string()),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::CategoryNotFound { id } => Some(format!(
                "No category with ID {id}. Use `sb category list` to see available categories."
            )),

            Self::CategoryNameNotFound { similar, .. } if !similar.is_empty() => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }
            Self::CategoryNameNotFound { .. } => Some(
                "Use `sb category list` to see available categories, or pass the category ID."
                    .to_string(),
            ),

            Self::AmbiguousCategoryName { ids, .. } => {
                let ids: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
                Some(format!("Pass one of these category IDs instead: {}", ids.join(", ")))
            }

            Self::StepNotFound { id } => Some(format!(
                "No step with ID {id}. Use `sb step list` to see available steps."
            )),

            Self::RequiredField { field } => Some(format!("Provide a non-blank {field}.")),

            Self::HasDependents {
                entity: "category",
                id,
                ..
            } => Some(format!(
                "Move or delete the steps of category {id} first. \
                 Use `sb step list --grouped` to find them."
            )),
            Self::HasDependents { .. } => {
                Some("Remove the step from its projects before deleting it.".to_string())
            }

            Self::Database(_) | Self::Io(_) | Self::Json(_) | Self::Config(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::NotInitialized.exit_code(), 2);
        assert_eq!(Error::StepNotFound { id: 1 }.exit_code(), 3);
        assert_eq!(Error::RequiredField { field: "name" }.exit_code(), 4);
        let refused = Error::HasDependents {
            entity: "category",
            id: 7,
            dependents: "steps",
        };
        assert_eq!(refused.exit_code(), 5);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::CategoryNotFound { id: 42 };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "CATEGORY_NOT_FOUND");
        assert_eq!(json["error"]["exit_code"], 3);
        assert_eq!(json["error"]["retryable"], false);
        assert!(json["error"]["hint"].as_str().unwrap().contains("42"));
    }

    #[test]
    fn test_has_dependents_hint_depends_on_entity() {
        let category = Error::HasDependents {
            entity: "category",
            id: 3,
            dependents: "steps",
        };
        assert!(category.hint().unwrap().contains("category 3"));

        let step = Error::HasDependents {
            entity: "step",
            id: 3,
            dependents: "projects",
        };
        assert!(step.hint().unwrap().contains("projects"));
    }

    #[test]
    fn test_ambiguous_name_hint_lists_prefixed_ids() {
        let err = Error::AmbiguousCategoryName {
            name: "1".to_string(),
            ids: vec![1, 2],
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.hint().unwrap().contains("#1, #2"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::CategoryNotFound { id: 1 }.is_not_found());
        assert!(Error::StepNotFound { id: 1 }.is_not_found());
        assert!(!Error::NotInitialized.is_not_found());
    }
}
