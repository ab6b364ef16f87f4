//! Step model.
//!
//! A step is a named unit of work belonging to exactly one category.
//! Reads carry the denormalized `category_name` from a left join; it is
//! `None` when the referenced category no longer exists.

use serde::Serialize;

/// Section title for steps whose category is missing.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A step row joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Generated row id
    pub id: i64,

    /// Display name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Referenced category id
    pub category_id: i64,

    /// Name of the referenced category (derived, not stored)
    pub category_name: Option<String>,
}

impl Step {
    /// Category name for display, falling back to [`UNCATEGORIZED`].
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Steps sharing one category label, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSection {
    pub title: String,
    pub steps: Vec<Step>,
}
