//! Library command handlers.

use std::path::Path;

use anyhow::Result;

use matdb_core::LibraryRepository;

use crate::bootstrap::CliContext;
use crate::commands::LibraryCommand;
use crate::error::CliError;
use crate::presentation::format_libraries;
use crate::utils::input::confirm_unless_forced;

async fn read_icon(path: &Path) -> Result<Vec<u8>, CliError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))
}

pub async fn execute(ctx: &CliContext, command: LibraryCommand) -> Result<()> {
    let libraries = ctx.manager().libraries();
    match command {
        LibraryCommand::List {
            with_models,
            with_materials,
        } => {
            let found = if with_models {
                libraries.list_libraries_with_models().await?
            } else if with_materials {
                libraries.list_libraries_with_materials().await?
            } else {
                libraries.list_libraries().await?
            };
            if found.is_empty() {
                println!("No libraries found.");
                println!("Use 'matdb library create <name>' to add one.");
            } else {
                print!("{}", format_libraries(&found));
            }
        }
        LibraryCommand::Create {
            name,
            icon,
            read_only,
        } => {
            let icon = match icon {
                Some(path) => Some(read_icon(&path).await?),
                None => None,
            };
            libraries
                .create_library(&name, icon.as_deref(), read_only)
                .await?;
            println!("Library '{name}' ready.");
        }
        LibraryCommand::Rename { old_name, new_name } => {
            libraries.rename_library(&old_name, &new_name).await?;
            println!("Renamed library '{old_name}' to '{new_name}'.");
        }
        LibraryCommand::Icon { name, file } => {
            let icon = match file {
                Some(path) => Some(read_icon(&path).await?),
                None => None,
            };
            libraries.change_icon(&name, icon.as_deref()).await?;
            if icon.is_some() {
                println!("Icon of '{name}' replaced.");
            } else {
                println!("Icon of '{name}' cleared.");
            }
        }
        LibraryCommand::Remove { name, force } => {
            // Fail on an unknown name before asking.
            libraries.get_library(&name).await?;
            let prompt =
                format!("Remove library '{name}' with all its folders, models and materials?");
            if !confirm_unless_forced(force, &prompt)? {
                println!("Remove cancelled.");
                return Ok(());
            }
            libraries.remove_library(&name).await?;
            println!("Library '{name}' removed.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap_with;
    use matdb_core::MaterialDbError;
    use matdb_db::TestDb;
    use std::io::Write;

    #[tokio::test]
    async fn test_library_lifecycle() {
        let db = TestDb::new().await.unwrap();
        let ctx = bootstrap_with(db.database().clone());

        let mut icon = tempfile::NamedTempFile::new().unwrap();
        icon.write_all(b"<svg/>").unwrap();

        execute(
            &ctx,
            LibraryCommand::Create {
                name: "User".into(),
                icon: Some(icon.path().to_path_buf()),
                read_only: false,
            },
        )
        .await
        .unwrap();
        execute(
            &ctx,
            LibraryCommand::Rename {
                old_name: "User".into(),
                new_name: "Mine".into(),
            },
        )
        .await
        .unwrap();

        let libraries = ctx.manager().libraries();
        let mine = libraries.get_library("Mine").await.unwrap();
        assert_eq!(mine.icon.as_deref(), Some(b"<svg/>".as_slice()));

        execute(
            &ctx,
            LibraryCommand::Icon {
                name: "Mine".into(),
                file: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(libraries.get_library("Mine").await.unwrap().icon, None);

        execute(
            &ctx,
            LibraryCommand::Remove {
                name: "Mine".into(),
                force: true,
            },
        )
        .await
        .unwrap();
        assert!(libraries.list_libraries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_library_fails_before_prompting() {
        let db = TestDb::new().await.unwrap();
        let ctx = bootstrap_with(db.database().clone());

        let err = execute(
            &ctx,
            LibraryCommand::Remove {
                name: "Gone".into(),
                force: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MaterialDbError>(),
            Some(MaterialDbError::LibraryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_icon_file_is_io_error() {
        let db = TestDb::new().await.unwrap();
        let ctx = bootstrap_with(db.database().clone());

        let err = execute(
            &ctx,
            LibraryCommand::Create {
                name: "User".into(),
                icon: Some("/nonexistent/icon.svg".into()),
                read_only: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Io(_))));
    }
}
