//! Library persistence against an in-memory store.

mod common;

use common::{DENSITY, STEEL, density_model, store, store_with_libraries};
use matdb_core::{
    LibraryRepository, Material, MaterialDbError, MaterialRepository, ModelRepository,
};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn create_then_get_round_trips() {
    let db = store_with_libraries().await;
    let libraries = db.library_repository();

    let user = libraries.get_library("User").await.unwrap();
    assert_eq!(user.name, "User");
    assert_eq!(user.icon, None);
    assert!(!user.read_only);

    let system = libraries.get_library("System").await.unwrap();
    assert_eq!(system.icon.as_deref(), Some(b"<svg/>".as_slice()));
    assert!(system.read_only);

    let names: Vec<String> = libraries
        .list_libraries()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, ["System", "User"]);
}

#[tokio::test]
async fn create_is_idempotent_for_identical_arguments() {
    let db = store().await;
    let libraries = db.library_repository();

    assert_ok!(libraries.create_library("User", Some(b"icon".as_slice()), false).await);
    assert_ok!(libraries.create_library("User", Some(b"icon".as_slice()), false).await);
    assert_eq!(libraries.list_libraries().await.unwrap().len(), 1);

    let err = assert_err!(libraries.create_library("User", None, true).await);
    assert!(matches!(err, MaterialDbError::LibraryCreation(_)), "{err:?}");
}

#[tokio::test]
async fn empty_icon_is_stored_as_absent() {
    let db = store().await;
    let libraries = db.library_repository();

    libraries.create_library("User", Some(&[]), false).await.unwrap();
    assert_eq!(libraries.get_library("User").await.unwrap().icon, None);
    // Absent and empty are the same icon for idempotency.
    assert_ok!(libraries.create_library("User", None, false).await);
}

#[tokio::test]
async fn unknown_library_is_not_found() {
    let db = store().await;
    let err = db.library_repository().get_library("Nope").await.unwrap_err();
    assert!(matches!(err, MaterialDbError::LibraryNotFound(name) if name == "Nope"));
}

#[tokio::test]
async fn rename_library() {
    let db = store_with_libraries().await;
    let libraries = db.library_repository();

    libraries.rename_library("User", "Mine").await.unwrap();
    assert!(libraries.get_library("Mine").await.is_ok());
    assert!(libraries.get_library("User").await.unwrap_err().is_not_found());

    let err = libraries.rename_library("Mine", "System").await.unwrap_err();
    assert!(matches!(err, MaterialDbError::Rename(_)), "{err:?}");

    let err = libraries.rename_library("Gone", "Other").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn change_icon_replaces_and_clears() {
    let db = store_with_libraries().await;
    let libraries = db.library_repository();

    libraries
        .change_icon("User", Some(b"new".as_slice()))
        .await
        .unwrap();
    assert_eq!(
        libraries.get_library("User").await.unwrap().icon.as_deref(),
        Some(b"new".as_slice())
    );

    libraries.change_icon("User", None).await.unwrap();
    assert_eq!(libraries.get_library("User").await.unwrap().icon, None);

    assert!(libraries.change_icon("Gone", None).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn remove_library_cascades_to_contents() {
    let db = store_with_libraries().await;
    let libraries = db.library_repository();
    let models = db.model_repository();
    let materials = db.material_repository();

    models
        .create_model("User", "Physical/Basic", &density_model())
        .await
        .unwrap();
    materials
        .create_material(
            "User",
            "Metals",
            &Material::new(STEEL, "Steel").with_physical_model(DENSITY),
        )
        .await
        .unwrap();

    libraries.remove_library("User").await.unwrap();

    assert!(libraries.get_library("User").await.unwrap_err().is_not_found());
    assert!(matches!(
        models.get_model(DENSITY).await.unwrap_err(),
        MaterialDbError::ModelNotFound(_)
    ));
    assert!(matches!(
        materials.get_material(STEEL).await.unwrap_err(),
        MaterialDbError::MaterialNotFound(_)
    ));
}

#[tokio::test]
async fn listings_by_content() {
    let db = store_with_libraries().await;
    let libraries = db.library_repository();
    libraries.create_library("Empty", None, false).await.unwrap();

    db.model_repository()
        .create_model("User", "", &density_model())
        .await
        .unwrap();
    db.material_repository()
        .create_material("Empty", "", &Material::new(STEEL, "Steel"))
        .await
        .unwrap();

    let with_models = libraries.list_libraries_with_models().await.unwrap();
    assert_eq!(with_models.len(), 1);
    assert_eq!(with_models[0].name, "User");

    let with_materials = libraries.list_libraries_with_materials().await.unwrap();
    assert_eq!(with_materials.len(), 1);
    assert_eq!(with_materials[0].name, "Empty");
}

#[tokio::test]
async fn blank_library_name_is_rejected() {
    let db = store().await;
    let err = db
        .library_repository()
        .create_library("  ", None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, MaterialDbError::Validation(_)), "{err:?}");
}
