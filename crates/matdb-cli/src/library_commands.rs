//! Library management subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum LibraryCommand {
    /// List libraries
    List {
        /// Only libraries that contain models
        #[arg(long, conflicts_with = "with_materials")]
        with_models: bool,
        /// Only libraries that contain materials
        #[arg(long)]
        with_materials: bool,
    },
    /// Create a library (no-op if an identical one exists)
    Create {
        name: String,
        /// Icon file to store with the library
        #[arg(long)]
        icon: Option<PathBuf>,
        /// Reject ordinary writes into this library
        #[arg(long)]
        read_only: bool,
    },
    /// Rename a library
    Rename { old_name: String, new_name: String },
    /// Replace or clear a library icon
    Icon {
        name: String,
        /// Icon file; omit to clear the icon
        file: Option<PathBuf>,
    },
    /// Remove a library and everything in it
    Remove {
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
