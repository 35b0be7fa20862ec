//! Folder management subcommands.
//!
//! Paths are "/"-separated folder names relative to the library root.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum FolderCommand {
    /// List every folder path in a library
    List { library: String },
    /// Create a folder path, including missing parents
    Create { library: String, path: String },
    /// Rename the last folder of a path
    Rename {
        library: String,
        old_path: String,
        new_path: String,
    },
    /// Delete a folder with everything beneath it
    Delete {
        library: String,
        path: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
