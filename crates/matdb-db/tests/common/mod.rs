//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use matdb_core::{
    Array2D, Array3D, LibraryRepository, Model, ModelProperty, ModelType, PropertyType,
    PropertyValue,
};
use matdb_db::TestDb;

pub const LINEAR_ELASTIC: &str = "7b561d1d-fb9b-44f6-9da9-56a4f74d7536";
pub const DENSITY: &str = "454661e5-265b-4320-8e6f-fcf6223ac3af";
pub const THERMAL: &str = "9959d007-a970-4ea7-bae4-3eb1b8b883c7";
pub const BASIC_RENDERING: &str = "f006c7e4-35b7-43d5-bbf9-c5d572309e6e";
pub const MISSING_MODEL: &str = "00000000-0000-4000-8000-00000000dead";

pub const STEEL: &str = "92589471-a6cb-4bbc-b748-d425a17dea7d";
pub const STAINLESS: &str = "1826c364-d26a-43fb-8f61-288281236836";
pub const ALUMINUM: &str = "f2f4c4a5-e6a8-4a0a-9c25-2b2e0a6b0d5e";
pub const CONCRETE: &str = "c1f7f0a2-6c11-4a55-8a1d-7f3c35c9e0b4";

/// A fresh in-memory store.
pub async fn store() -> TestDb {
    TestDb::new().await.expect("in-memory database")
}

/// A fresh store with a writable "User" and a read-only "System" library.
pub async fn store_with_libraries() -> TestDb {
    let db = store().await;
    let libraries = db.library_repository();
    libraries
        .create_library("User", None, false)
        .await
        .expect("user library");
    libraries
        .create_library("System", Some(b"<svg/>".as_slice()), true)
        .await
        .expect("system library");
    db
}

pub fn density_model() -> Model {
    Model::new(DENSITY, ModelType::Physical, "Density").with_property(
        ModelProperty::new("Density", PropertyType::Quantity).with_units("kg/m^3"),
    )
}

pub fn thermal_model() -> Model {
    Model::new(THERMAL, ModelType::Physical, "Thermal").with_property(
        ModelProperty::new("ThermalExpansion", PropertyType::Array2D)
            .with_column(ModelProperty::new("Temperature", PropertyType::Quantity).with_units("C"))
            .with_column(
                ModelProperty::new("Coefficient", PropertyType::Quantity).with_units("1/K"),
            ),
    )
}

/// Inherits from [`density_model`] and [`thermal_model`].
pub fn linear_elastic_model() -> Model {
    Model::new(LINEAR_ELASTIC, ModelType::Physical, "Linear Elastic")
        .with_description("Isotropic linear elasticity")
        .with_doi("10.1000/182")
        .inherit(DENSITY)
        .inherit(THERMAL)
        .with_property(ModelProperty::new("YoungsModulus", PropertyType::Quantity).with_units("GPa"))
        .with_property(ModelProperty::new("PoissonRatio", PropertyType::Float))
        .with_property(
            ModelProperty::new("StressStrain", PropertyType::Array3D)
                .with_column(ModelProperty::new("Temperature", PropertyType::Quantity))
                .with_column(ModelProperty::new("Strain", PropertyType::Float))
                .with_column(ModelProperty::new("Stress", PropertyType::Quantity)),
        )
}

pub fn rendering_model() -> Model {
    Model::new(BASIC_RENDERING, ModelType::Appearance, "Basic Rendering")
        .with_property(ModelProperty::new("DiffuseColor", PropertyType::Color))
        .with_property(ModelProperty::new("TexturePaths", PropertyType::FileList))
}

/// Two temperatures with a different number of rows each.
pub fn ragged_stress_strain() -> Array3D {
    let mut table = Array3D::with_columns(2);
    let cold = table.push_slice("20 C");
    table.push_row(cold, &["0", "0 MPa"]).expect("row");
    table.push_row(cold, &["0.001", "200 MPa"]).expect("row");
    let hot = table.push_slice("400 C");
    table.push_row(hot, &["0", "0 MPa"]).expect("row");
    table.push_row(hot, &["0.001", "150 MPa"]).expect("row");
    table.push_row(hot, &["0.002", "210 MPa"]).expect("row");
    table
}

pub fn expansion_table() -> Array2D {
    let mut table = Array2D::with_columns(2);
    table.push_row(&["20 C", "1.2e-5 1/K"]).expect("row");
    table.push_row(&["100 C", "1.3e-5 1/K"]).expect("row");
    table
}

pub fn scalar(text: &str) -> PropertyValue {
    PropertyValue::Scalar(text.to_string())
}
