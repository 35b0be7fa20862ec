//! Main commands enum and primary subcommands.

use std::path::PathBuf;

use clap::Subcommand;

pub use crate::folder_commands::FolderCommand;
pub use crate::library_commands::LibraryCommand;

/// Available commands.
///
/// Schema commands work on the database file itself; the remaining commands
/// expect the schema to be in place and create it when missing.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved database location
    Paths,

    /// Drop and recreate the database file (all data is lost)
    CreateDb {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Create the tables and the folder path view
    Init,

    /// Drop every table and view
    DropTables {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Manage libraries
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },

    /// Manage folders inside a library
    Folder {
        #[command(subcommand)]
        command: FolderCommand,
    },

    /// List the models of a library
    Models {
        /// Library name
        library: String,
    },

    /// List the materials of a library
    Materials {
        /// Library name
        library: String,
        /// Only materials whose name contains this text (case-insensitive)
        #[arg(long)]
        name: Option<String>,
        /// Only materials carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Only materials linked to this model uuid (repeatable)
        #[arg(long = "model")]
        models: Vec<String>,
        /// Leave out materials without any model link
        #[arg(long)]
        no_legacy: bool,
    },

    /// Print a model as JSON
    Model {
        /// Model uuid
        uuid: String,
        /// Merge in the properties of every ancestor
        #[arg(long)]
        effective: bool,
    },

    /// Print a material as JSON
    Material {
        /// Material uuid
        uuid: String,
    },

    /// Load models and materials from a JSON batch file
    Load {
        /// Path to the batch file
        file: PathBuf,
        /// Create items one by one with integrity checks on
        #[arg(long)]
        checked: bool,
    },
}
