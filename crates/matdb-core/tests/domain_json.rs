//! JSON shape of domain types, as printed by the CLI and read back by importers.

use matdb_core::{
    Array3D, Material, Model, ModelProperty, ModelType, PropertyType, PropertyValue, Quantity,
};

#[test]
fn model_json_round_trip() {
    let model = Model::new(
        "3d1a6141-d032-4d82-8bb5-a8f339fff8ad",
        ModelType::Physical,
        "Linear Elastic",
    )
    .with_doi("10.1000/xyz")
    .inherit("a6bf6fd4-53d5-4ba2-9b89-2b9f3e9b4f4c")
    .with_property(
        ModelProperty::new("Stress", PropertyType::Array2D)
            .with_column(ModelProperty::new("Temperature", PropertyType::Quantity).with_units("C"))
            .with_column(ModelProperty::new("Stress", PropertyType::Quantity).with_units("MPa")),
    );

    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["model_type"], "Physical");
    assert_eq!(json["properties"]["Stress"]["property_type"], "2DArray");
    assert_eq!(
        json["properties"]["Stress"]["columns"][1]["name"],
        "Stress"
    );

    let back: Model = serde_json::from_value(json).unwrap();
    assert_eq!(back, model);
}

#[test]
fn material_json_keeps_ragged_arrays() {
    let mut array = Array3D::with_columns(2);
    let d0 = array.push_slice(Quantity::new(10.0, "C"));
    let d1 = array.push_slice(Quantity::new(20.0, "C"));
    array.push_row(d0, &["1", "2"]).unwrap();
    array.push_row(d1, &["3", "4"]).unwrap();
    array.push_row(d1, &["5", "6"]).unwrap();

    let material = Material::new("b1c5a5a8-3e0d-4d4c-a3b8-7a7a1f1f0c01", "Steel")
        .with_tag("metal")
        .with_value("Curve", PropertyType::Array3D, PropertyValue::Array3D(array));

    let json = serde_json::to_string(&material).unwrap();
    let back: Material = serde_json::from_str(&json).unwrap();

    let PropertyValue::Array3D(read) = &back.values["Curve"].value else {
        panic!("expected a 3D array");
    };
    assert_eq!(read.row_count(0), Some(1));
    assert_eq!(read.row_count(1), Some(2));
    assert_eq!(read.depth_value(1), Some("20 C"));
    assert_eq!(back, material);
}

#[test]
fn material_defaults_fill_missing_fields() {
    let back: Material = serde_json::from_str(r#"{"uuid": "u", "name": "Bare"}"#).unwrap();
    assert!(back.tags.is_empty());
    assert!(back.values.is_empty());
    assert!(back.author.is_none());
}
