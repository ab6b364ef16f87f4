//! Category model.
//!
//! Categories are named groupings under which steps are organized.

use serde::Serialize;

/// A category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Generated row id
    pub id: i64,

    /// Display name (non-empty, checked before it reaches storage)
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,
}

impl Category {
    /// Description for display, `-` when absent or blank.
    #[must_use]
    pub fn description_or_dash(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "-",
        }
    }
}
