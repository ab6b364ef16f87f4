//! Category management commands.
//!
//! - `sb category create <name>` - Create a category
//! - `sb category list [query]` - List / search categories by name
//! - `sb category show <id>` - Show category details
//! - `sb category update <id> <name>` - Replace name and description
//! - `sb category delete <id>` - Delete a category with no steps
//! - `sb category suggest <query>` - Autocomplete by partial name

use crate::catalog;
use crate::cli::CategoryCommands;
use crate::error::Result;
use crate::model::Category;
use crate::storage::SqliteStorage;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct CategoryListOutput {
    categories: Vec<Category>,
    count: usize,
}

#[derive(Serialize)]
struct CategoryShowOutput {
    #[serde(flatten)]
    category: Category,
    has_steps: bool,
}

#[derive(Serialize)]
struct DeletedOutput {
    deleted: bool,
    id: i64,
    name: String,
}

/// Execute a category command.
///
/// # Errors
///
/// Returns an error if the database is missing or the operation fails.
pub fn execute(command: &CategoryCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = super::open_storage(db_path)?;

    match command {
        CategoryCommands::Create(args) => {
            let category =
                catalog::create_category(&storage, &args.name, args.description.as_deref())?;
            print_saved(&category, "Created", json)
        }
        CategoryCommands::List { query } => {
            let categories = storage.categories().search_by_name(query)?;
            print_list(categories, json)
        }
        CategoryCommands::Show { id } => execute_show(&storage, *id, json),
        CategoryCommands::Update { id, args } => {
            let category =
                catalog::update_category(&storage, *id, &args.name, args.description.as_deref())?;
            print_saved(&category, "Updated", json)
        }
        CategoryCommands::Delete { id } => {
            let category = catalog::delete_category(&mut storage, *id)?;
            if json {
                let output = DeletedOutput {
                    deleted: true,
                    id: category.id,
                    name: category.name,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Deleted category: {} ({})", category.name, category.id);
            }
            Ok(())
        }
        CategoryCommands::Suggest { query } => {
            let categories = catalog::suggest_categories(&storage.categories(), query)?;
            print_list(categories, json)
        }
    }
}

fn execute_show(storage: &SqliteStorage, id: i64, json: bool) -> Result<()> {
    let category = catalog::get_category(storage, id)?;
    let has_steps = storage.categories().has_steps(id)?;

    if json {
        let output = CategoryShowOutput {
            category,
            has_steps,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Category:".bold(), category.name);
        println!("  ID:          {}", category.id);
        println!("  Description: {}", category.description_or_dash());
        println!("  In use:      {}", if has_steps { "yes" } else { "no" });
    }

    Ok(())
}

fn print_saved(category: &Category, verb: &str, json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{}", category.id);
    } else if json {
        println!("{}", serde_json::to_string_pretty(category)?);
    } else {
        println!("{} category: {}", verb, category.name.green());
        println!("  ID: {}", category.id);
        if let Some(desc) = &category.description {
            println!("  Description: {desc}");
        }
    }
    Ok(())
}

fn print_list(categories: Vec<Category>, json: bool) -> Result<()> {
    if json {
        let output = CategoryListOutput {
            count: categories.len(),
            categories,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if categories.is_empty() {
        println!("{}", "No categories found.".dimmed());
    } else {
        println!("Categories ({}):\n", categories.len());
        for category in &categories {
            println!("  {:>4}  {}", category.id, category.name.bold());
            if let Some(desc) = &category.description {
                println!("        {}", desc.dimmed());
            }
        }
    }
    Ok(())
}
