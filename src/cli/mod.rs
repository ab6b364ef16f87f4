//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// stepbook - Categories and steps for workflow templates
#[derive(Parser, Debug)]
#[command(name = "sb", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.stepbook/data/stepbook.db)
    #[arg(long, global = true, env = "SB_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output only the ID of created rows (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and apply the schema
    Init {
        /// Recreate the database file if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Category management
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Step management
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Category Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a new category
    Create(CategoryArgs),

    /// List categories, optionally filtered by a name fragment
    List {
        /// Name fragment to search for
        #[arg(default_value = "")]
        query: String,
    },

    /// Show category details
    Show {
        /// Category ID
        id: i64,
    },

    /// Replace a category's name and description
    Update {
        /// Category ID
        id: i64,

        #[command(flatten)]
        args: CategoryArgs,
    },

    /// Delete a category that has no steps
    Delete {
        /// Category ID
        id: i64,
    },

    /// Suggest categories for a partially typed name (2+ characters)
    Suggest {
        /// Partial name
        query: String,
    },
}

#[derive(Args, Debug)]
pub struct CategoryArgs {
    /// Category name
    pub name: String,

    /// Category description
    #[arg(short, long)]
    pub description: Option<String>,
}

// ============================================================================
// Step Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum StepCommands {
    /// Create a new step
    Create(StepArgs),

    /// List steps, optionally filtered by a name fragment
    List {
        /// Name fragment to search for
        #[arg(default_value = "")]
        query: String,

        /// Group the steps under their category names
        #[arg(short, long)]
        grouped: bool,
    },

    /// Show step details
    Show {
        /// Step ID
        id: i64,
    },

    /// Replace a step's name, description and category
    Update {
        /// Step ID
        id: i64,

        #[command(flatten)]
        args: StepArgs,
    },

    /// Delete a step that no project uses
    Delete {
        /// Step ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct StepArgs {
    /// Step name
    pub name: String,

    /// Category ID, exact category name, or `#<id>`
    #[arg(short, long)]
    pub category: String,

    /// Step description
    #[arg(short, long)]
    pub description: Option<String>,
}
