//! Folder trees inside libraries.

mod common;

use common::{DENSITY, STEEL, density_model, store_with_libraries};
use matdb_core::{
    FolderRepository, LibraryRepository, Material, MaterialDbError, MaterialRepository,
    ModelRepository,
};

#[tokio::test]
async fn create_folder_lists_every_level() {
    let db = store_with_libraries().await;
    let folders = db.folder_repository();

    folders.create_folder("User", "Metals/Steel/Stainless").await.unwrap();
    folders.create_folder("User", "/Metals/Aluminum").await.unwrap();
    // Idempotent.
    folders.create_folder("User", "Metals/Steel").await.unwrap();

    let paths = folders.list_folders("User").await.unwrap();
    assert_eq!(
        paths,
        [
            "Metals",
            "Metals/Aluminum",
            "Metals/Steel",
            "Metals/Steel/Stainless"
        ]
    );
    assert!(folders.list_folders("System").await.unwrap().is_empty());
}

#[tokio::test]
async fn same_folder_name_in_two_libraries() {
    let db = store_with_libraries().await;
    let folders = db.folder_repository();
    db.library_repository()
        .create_library("Other", None, false)
        .await
        .unwrap();

    folders.create_folder("User", "Metals").await.unwrap();
    folders.create_folder("Other", "Metals").await.unwrap();
    assert_eq!(folders.list_folders("Other").await.unwrap(), ["Metals"]);
}

#[tokio::test]
async fn folder_in_read_only_library_is_rejected() {
    let db = store_with_libraries().await;
    let err = db
        .folder_repository()
        .create_folder("System", "Metals")
        .await
        .unwrap_err();
    assert!(err.is_read_only(), "{err:?}");
}

#[tokio::test]
async fn folder_in_unknown_library_is_not_found() {
    let db = store_with_libraries().await;
    let err = db
        .folder_repository()
        .list_folders("Gone")
        .await
        .unwrap_err();
    assert!(matches!(err, MaterialDbError::LibraryNotFound(_)));
}

#[tokio::test]
async fn rename_folder_moves_contents_along() {
    let db = store_with_libraries().await;
    let folders = db.folder_repository();
    let models = db.model_repository();

    models
        .create_model("User", "Physical/Basic", &density_model())
        .await
        .unwrap();
    folders
        .rename_folder("User", "Physical/Basic", "Physical/Core")
        .await
        .unwrap();

    assert_eq!(models.get_model(DENSITY).await.unwrap().path, "Physical/Core");
    assert_eq!(
        folders.list_folders("User").await.unwrap(),
        ["Physical", "Physical/Core"]
    );

    let err = folders
        .rename_folder("User", "Physical/Core", "Other/Core")
        .await
        .unwrap_err();
    assert!(matches!(err, MaterialDbError::Rename(_)), "{err:?}");

    let err = folders
        .rename_folder("User", "Physical/Missing", "Physical/Found")
        .await
        .unwrap_err();
    assert!(matches!(err, MaterialDbError::Rename(_)), "{err:?}");
}

#[tokio::test]
async fn delete_folder_removes_subtree_and_contents() {
    let db = store_with_libraries().await;
    let folders = db.folder_repository();
    let materials = db.material_repository();

    materials
        .create_material("User", "Metals/Steel", &Material::new(STEEL, "Steel"))
        .await
        .unwrap();
    folders.create_folder("User", "Plastics").await.unwrap();

    folders.delete_folder_recursive("User", "Metals").await.unwrap();

    assert_eq!(folders.list_folders("User").await.unwrap(), ["Plastics"]);
    assert!(materials.get_material(STEEL).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_missing_folder_fails() {
    let db = store_with_libraries().await;
    let folders = db.folder_repository();

    let err = folders
        .delete_folder_recursive("User", "Nowhere")
        .await
        .unwrap_err();
    assert!(matches!(err, MaterialDbError::Delete(_)), "{err:?}");

    let err = folders.delete_folder_recursive("User", "").await.unwrap_err();
    assert!(matches!(err, MaterialDbError::Delete(_)), "{err:?}");
}

#[tokio::test]
async fn empty_path_segment_is_rejected() {
    let db = store_with_libraries().await;
    let err = db
        .folder_repository()
        .create_folder("User", "Metals//Steel")
        .await
        .unwrap_err();
    assert!(matches!(err, MaterialDbError::Validation(_)), "{err:?}");
}
