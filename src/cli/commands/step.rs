//! Step management commands.
//!
//! - `sb step create <name> -c <category>` - Create a step
//! - `sb step list [query] [--grouped]` - List / search steps by name
//! - `sb step show <id>` - Show step details
//! - `sb step update <id> <name> -c <category>` - Replace a step's fields
//! - `sb step delete <id>` - Delete a step no project uses

use crate::catalog;
use crate::cli::{StepArgs, StepCommands};
use crate::error::Result;
use crate::model::{Step, StepSection};
use crate::storage::SqliteStorage;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct StepListOutput {
    steps: Vec<Step>,
    count: usize,
}

#[derive(Serialize)]
struct StepGroupedOutput {
    sections: Vec<StepSection>,
    count: usize,
}

#[derive(Serialize)]
struct StepShowOutput {
    #[serde(flatten)]
    step: Step,
    has_projects: bool,
}

#[derive(Serialize)]
struct DeletedOutput {
    deleted: bool,
    id: i64,
    name: String,
}

/// Execute a step command.
///
/// # Errors
///
/// Returns an error if the database is missing or the operation fails.
pub fn execute(command: &StepCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = super::open_storage(db_path)?;

    match command {
        StepCommands::Create(args) => {
            let category_id = resolve_category_id(&storage, args)?;
            let step = catalog::create_step(
                &storage,
                &args.name,
                args.description.as_deref(),
                category_id,
            )?;
            print_saved(&step, "Created", json)
        }
        StepCommands::List { query, grouped } => {
            let steps = storage.steps().search_by_name(query)?;
            if *grouped {
                print_grouped(steps, json)
            } else {
                print_list(steps, json)
            }
        }
        StepCommands::Show { id } => execute_show(&storage, *id, json),
        StepCommands::Update { id, args } => {
            let category_id = resolve_category_id(&storage, args)?;
            let step = catalog::update_step(
                &storage,
                *id,
                &args.name,
                args.description.as_deref(),
                category_id,
            )?;
            print_saved(&step, "Updated", json)
        }
        StepCommands::Delete { id } => {
            let step = catalog::delete_step(&mut storage, *id)?;
            if json {
                let output = DeletedOutput {
                    deleted: true,
                    id: step.id,
                    name: step.name,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Deleted step: {} ({})", step.name, step.id);
            }
            Ok(())
        }
    }
}

fn resolve_category_id(storage: &SqliteStorage, args: &StepArgs) -> Result<i64> {
    catalog::resolve_category(&storage.categories(), &args.category).map(|c| c.id)
}

fn execute_show(storage: &SqliteStorage, id: i64, json: bool) -> Result<()> {
    let step = storage.steps().search_by_id(id)?;
    let has_projects = storage.steps().has_projects(id)?;

    if json {
        let output = StepShowOutput { step, has_projects };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Step:".bold(), step.name);
        println!("  ID:          {}", step.id);
        println!("  Category:    {} ({})", step.category_label(), step.category_id);
        println!(
            "  Description: {}",
            step.description.as_deref().unwrap_or("-")
        );
        println!("  In projects: {}", if has_projects { "yes" } else { "no" });
    }

    Ok(())
}

fn print_saved(step: &Step, verb: &str, json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{}", step.id);
    } else if json {
        println!("{}", serde_json::to_string_pretty(step)?);
    } else {
        println!("{} step: {}", verb, step.name.green());
        println!("  ID: {}", step.id);
        println!("  Category: {}", step.category_label());
    }
    Ok(())
}

fn print_list(steps: Vec<Step>, json: bool) -> Result<()> {
    if json {
        let output = StepListOutput {
            count: steps.len(),
            steps,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if steps.is_empty() {
        println!("{}", "No steps found.".dimmed());
    } else {
        println!("Steps ({}):\n", steps.len());
        for step in &steps {
            println!(
                "  {:>4}  {}  {}",
                step.id,
                step.name.bold(),
                format!("[{}]", step.category_label()).dimmed()
            );
        }
    }
    Ok(())
}

fn print_grouped(steps: Vec<Step>, json: bool) -> Result<()> {
    let count = steps.len();
    let sections = catalog::group_by_category(steps);

    if json {
        let output = StepGroupedOutput { sections, count };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if sections.is_empty() {
        println!("{}", "No steps found.".dimmed());
    } else {
        for section in &sections {
            println!("{}", section.title.blue().bold());
            for step in &section.steps {
                println!("  {:>4}  {}", step.id, step.name);
            }
            println!();
        }
    }
    Ok(())
}
