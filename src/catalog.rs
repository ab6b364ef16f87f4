//! Caller-level catalog operations.
//!
//! The stores in [`crate::storage`] are thin pass-throughs. This module is
//! the layer above them: it validates input, resolves category references,
//! refuses deletes of rows that are still referenced, and provides the
//! autocomplete and grouping queries used by the front end.
//!
//! Guarded deletes run the reference check and the delete inside one
//! IMMEDIATE transaction, so no writer can slip in between them.

use crate::error::{Error, Result};
use crate::model::{Category, Step, StepSection};
use crate::storage::{CategoryStore, SqliteStorage, StepStore};
use crate::validate::{find_similar_names, normalize_description, require_name};
use tracing::{info, warn};

/// Shortest query that produces autocomplete suggestions.
pub const MIN_SUGGEST_LEN: usize = 2;

/// Maximum "did you mean" names attached to a failed name lookup.
const MAX_SIMILAR: usize = 3;

// ── Categories ───────────────────────────────────────────────

/// Validate and insert a category.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] for a blank name, or a storage error.
pub fn create_category(
    storage: &SqliteStorage,
    name: &str,
    description: Option<&str>,
) -> Result<Category> {
    let name = require_name("name", name)?;
    let description = normalize_description(description);

    let id = storage.categories().create(name, description)?;
    Ok(Category {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
    })
}

/// Validate and replace a category's fields.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] for a blank name,
/// [`Error::CategoryNotFound`] if the id does not exist, or a storage error.
pub fn update_category(
    storage: &SqliteStorage,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Category> {
    let name = require_name("name", name)?;
    let description = normalize_description(description);

    storage.categories().update(id, name, description)?;
    Ok(Category {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
    })
}

/// Fetch a category that must exist.
///
/// # Errors
///
/// Returns [`Error::CategoryNotFound`] if absent, or a storage error.
pub fn get_category(storage: &SqliteStorage, id: i64) -> Result<Category> {
    storage
        .categories()
        .search_by_id(id)?
        .ok_or(Error::CategoryNotFound { id })
}

/// Delete a category that no step references.
///
/// # Errors
///
/// Returns [`Error::CategoryNotFound`] if absent, [`Error::HasDependents`]
/// if steps still reference it, or a storage error.
pub fn delete_category(storage: &mut SqliteStorage, id: i64) -> Result<Category> {
    storage.transaction("delete_category", |tx| {
        let store = CategoryStore::new(tx);
        let category = store.search_by_id(id)?.ok_or(Error::CategoryNotFound { id })?;

        if store.has_steps(id)? {
            warn!(id, "Refusing to delete category referenced by steps");
            return Err(Error::HasDependents {
                entity: "category",
                id,
                dependents: "steps",
            });
        }

        store.remove(id)?;
        info!(id, name = %category.name, "Deleted category");
        Ok(category)
    })
}

/// Autocomplete suggestions for a partially typed category name.
///
/// Queries shorter than [`MIN_SUGGEST_LEN`] characters yield no
/// suggestions. The query is used as typed; whitespace counts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn suggest_categories(store: &CategoryStore<'_>, query: &str) -> Result<Vec<Category>> {
    if query.chars().count() < MIN_SUGGEST_LEN {
        return Ok(Vec::new());
    }
    store.search_by_name(query)
}

/// Resolve a category given either its numeric id or its exact name.
///
/// Name matching ignores ASCII case. A bare number is checked both as an
/// id and as a name, and a reference that matches more than one row is
/// rejected rather than guessed. `#<id>` always means the id.
///
/// # Errors
///
/// Returns [`Error::CategoryNotFound`] / [`Error::CategoryNameNotFound`]
/// (with similar names) if nothing matches, [`Error::AmbiguousCategoryName`]
/// if several do, or a storage error.
pub fn resolve_category(store: &CategoryStore<'_>, reference: &str) -> Result<Category> {
    let reference = require_name("category", reference)?;

    if let Some(id) = reference.strip_prefix('#').and_then(|r| r.parse::<i64>().ok()) {
        return store.search_by_id(id)?.ok_or(Error::CategoryNotFound { id });
    }

    let mut exact: Vec<Category> = store
        .search_by_name(reference)?
        .into_iter()
        .filter(|c| c.name.eq_ignore_ascii_case(reference))
        .collect();

    let numeric_id = reference.parse::<i64>().ok();
    if let Some(id) = numeric_id {
        if let Some(by_id) = store.search_by_id(id)? {
            if !exact.iter().any(|c| c.id == by_id.id) {
                exact.insert(0, by_id);
            }
        }
    }

    match (exact.len(), numeric_id) {
        (1, _) => Ok(exact.remove(0)),
        (0, Some(id)) => Err(Error::CategoryNotFound { id }),
        (0, None) => {
            let all: Vec<String> = store
                .search_by_name("")?
                .into_iter()
                .map(|c| c.name)
                .collect();
            Err(Error::CategoryNameNotFound {
                name: reference.to_string(),
                similar: find_similar_names(reference, &all, MAX_SIMILAR),
            })
        }
        _ => Err(Error::AmbiguousCategoryName {
            name: reference.to_string(),
            ids: exact.into_iter().map(|c| c.id).collect(),
        }),
    }
}

// ── Steps ────────────────────────────────────────────────────

/// Validate and insert a step under an existing category.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] for a blank name,
/// [`Error::CategoryNotFound`] if the category does not exist, or a
/// storage error.
pub fn create_step(
    storage: &SqliteStorage,
    name: &str,
    description: Option<&str>,
    category_id: i64,
) -> Result<Step> {
    let name = require_name("name", name)?;
    let description = normalize_description(description);
    let category = get_category(storage, category_id)?;

    let id = storage.steps().create(name, description, category.id)?;
    Ok(Step {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
        category_id: category.id,
        category_name: Some(category.name),
    })
}

/// Validate and replace a step's fields.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] for a blank name,
/// [`Error::CategoryNotFound`] if the new category does not exist,
/// [`Error::StepNotFound`] if the step does not exist, or a storage error.
pub fn update_step(
    storage: &SqliteStorage,
    id: i64,
    name: &str,
    description: Option<&str>,
    category_id: i64,
) -> Result<Step> {
    let name = require_name("name", name)?;
    let description = normalize_description(description);
    get_category(storage, category_id)?;

    storage.steps().update(id, name, description, category_id)?;
    storage.steps().search_by_id(id)
}

/// Delete a step that no project references.
///
/// # Errors
///
/// Returns [`Error::StepNotFound`] if absent, [`Error::HasDependents`] if a
/// project still references it, or a storage error.
pub fn delete_step(storage: &mut SqliteStorage, id: i64) -> Result<Step> {
    storage.transaction("delete_step", |tx| {
        let store = StepStore::new(tx);
        let step = store.search_by_id(id)?;

        if store.has_projects(id)? {
            warn!(id, "Refusing to delete step referenced by projects");
            return Err(Error::HasDependents {
                entity: "step",
                id,
                dependents: "projects",
            });
        }

        store.remove(id)?;
        info!(id, name = %step.name, "Deleted step");
        Ok(step)
    })
}

/// Group steps into sections by category label, keeping first-seen order.
///
/// Steps whose category is missing land in the
/// [`UNCATEGORIZED`](crate::model::UNCATEGORIZED) section.
#[must_use]
pub fn group_by_category(steps: Vec<Step>) -> Vec<StepSection> {
    let mut sections: Vec<StepSection> = Vec::new();

    for step in steps {
        let title = step.category_label().to_string();
        match sections.iter_mut().find(|s| s.title == title) {
            Some(section) => section.steps.push(step),
            None => sections.push(StepSection {
                title,
                steps: vec![step],
            }),
        }
    }

    sections
}
