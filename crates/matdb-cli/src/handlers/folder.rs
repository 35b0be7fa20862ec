//! Folder command handlers.

use anyhow::Result;

use matdb_core::FolderRepository;

use crate::bootstrap::CliContext;
use crate::commands::FolderCommand;
use crate::utils::input::confirm_unless_forced;

pub async fn execute(ctx: &CliContext, command: FolderCommand) -> Result<()> {
    let folders = ctx.manager().folders();
    match command {
        FolderCommand::List { library } => {
            let paths = folders.list_folders(&library).await?;
            if paths.is_empty() {
                println!("Library '{library}' has no folders.");
            }
            for path in paths {
                println!("{path}");
            }
        }
        FolderCommand::Create { library, path } => {
            folders.create_folder(&library, &path).await?;
            println!("Folder '{path}' ready in '{library}'.");
        }
        FolderCommand::Rename {
            library,
            old_path,
            new_path,
        } => {
            folders.rename_folder(&library, &old_path, &new_path).await?;
            println!("Renamed '{old_path}' to '{new_path}'.");
        }
        FolderCommand::Delete {
            library,
            path,
            force,
        } => {
            let prompt = format!("Delete '{path}' in '{library}' with everything beneath it?");
            if !confirm_unless_forced(force, &prompt)? {
                println!("Delete cancelled.");
                return Ok(());
            }
            folders.delete_folder_recursive(&library, &path).await?;
            println!("Folder '{path}' deleted.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap_with;
    use matdb_core::LibraryRepository;
    use matdb_db::TestDb;

    #[tokio::test]
    async fn test_folder_lifecycle() {
        let db = TestDb::new().await.unwrap();
        let ctx = bootstrap_with(db.database().clone());
        ctx.manager()
            .libraries()
            .create_library("User", None, false)
            .await
            .unwrap();

        let create = FolderCommand::Create {
            library: "User".into(),
            path: "Metals/Steel".into(),
        };
        execute(&ctx, create).await.unwrap();

        let rename = FolderCommand::Rename {
            library: "User".into(),
            old_path: "Metals/Steel".into(),
            new_path: "Metals/Iron".into(),
        };
        execute(&ctx, rename).await.unwrap();
        assert_eq!(
            ctx.manager().folders().list_folders("User").await.unwrap(),
            ["Metals", "Metals/Iron"]
        );

        let delete = FolderCommand::Delete {
            library: "User".into(),
            path: "Metals".into(),
            force: true,
        };
        execute(&ctx, delete).await.unwrap();
        assert!(
            ctx.manager()
                .folders()
                .list_folders("User")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
