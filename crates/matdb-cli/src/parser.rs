//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for provisioning and inspecting a materials database.
#[derive(Parser)]
#[command(name = "matdb")]
#[command(about = "Provision and inspect a materials library database")]
#[command(version)]
pub struct Cli {
    /// Database URL for this invocation (overrides MATDB_DATABASE_URL)
    #[arg(long = "database-url", global = true)]
    pub database_url: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{FolderCommand, LibraryCommand};
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "matdb",
            "--verbose",
            "--database-url",
            "sqlite:/tmp/m.db",
            "library",
            "list",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.database_url.as_deref(), Some("sqlite:/tmp/m.db"));
        assert!(matches!(
            cli.command,
            Some(Commands::Library {
                command: LibraryCommand::List { .. }
            })
        ));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["matdb", "folder", "list", "User", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Commands::Folder {
                command: FolderCommand::List { library }
            }) if library == "User"
        ));
    }
}
