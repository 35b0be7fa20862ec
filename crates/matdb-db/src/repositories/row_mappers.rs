//! Row types and their conversion to domain objects.

use std::collections::BTreeMap;

use matdb_core::domain::normalize_icon;
use matdb_core::{
    Library, LibraryEntry, Material, MaterialValue, Model, ModelProperty, ModelType, PropertyType,
};

use super::error::{StoreError, StoreResult};

pub(crate) const SELECT_LIBRARY_BY_NAME: &str = "SELECT library_id, library_name, library_icon, library_read_only \
     FROM library WHERE library_name = ?";

pub(crate) const SELECT_LIBRARY_BY_ID: &str = "SELECT library_id, library_name, library_icon, library_read_only \
     FROM library WHERE library_id = ?";

pub(crate) const SELECT_MODEL: &str = "SELECT model_id, library_id, folder_id, model_type, model_name, \
            model_url, model_description, model_doi \
     FROM model WHERE model_id = ?";

pub(crate) const SELECT_MODEL_PROPERTIES: &str = "SELECT model_property_id, model_property_name, \
            model_property_display_name, model_property_type, model_property_units, \
            model_property_url, model_property_description \
     FROM model_property WHERE model_id = ? ORDER BY model_property_id";

/// Column rows share the property row shape.
pub(crate) const SELECT_MODEL_PROPERTY_COLUMNS: &str = "SELECT model_property_column_id AS model_property_id, \
            model_property_name, model_property_display_name, model_property_type, \
            model_property_units, model_property_url, model_property_description \
     FROM model_property_column WHERE model_property_id = ? ORDER BY model_property_column_id";

pub(crate) const SELECT_MATERIAL: &str = "SELECT material_id, library_id, folder_id, material_name, \
            material_author, material_license, material_parent_uuid, material_description, \
            material_url, material_reference \
     FROM material WHERE material_id = ?";

pub(crate) const SELECT_VALUE_HEADERS: &str = "SELECT material_property_value_id, material_property_name, \
            material_property_type \
     FROM material_property_value WHERE material_id = ? ORDER BY material_property_value_id";

// ─────────────────────────────────────────────────────────────────────────────
// Libraries
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LibraryRow {
    pub library_id: i64,
    pub library_name: String,
    pub library_icon: Option<Vec<u8>>,
    pub library_read_only: bool,
}

impl LibraryRow {
    pub(crate) fn into_library(self) -> Library {
        Library {
            name: self.library_name,
            icon: normalize_icon(self.library_icon),
            read_only: self.library_read_only,
        }
    }
}

/// `(uuid, name, path)` triple used by library listings.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EntryRow {
    pub uuid: String,
    pub name: String,
    pub path: Option<String>,
}

impl EntryRow {
    pub(crate) fn into_entry(self) -> LibraryEntry {
        LibraryEntry {
            uuid: self.uuid,
            path: self.path.unwrap_or_default(),
            name: self.name,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Models
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ModelRow {
    pub model_id: String,
    pub library_id: i64,
    pub folder_id: Option<i64>,
    pub model_type: String,
    pub model_name: String,
    pub model_url: Option<String>,
    pub model_description: Option<String>,
    pub model_doi: Option<String>,
}

impl ModelRow {
    pub(crate) fn into_model(
        self,
        inherits: Vec<String>,
        properties: Vec<ModelProperty>,
    ) -> StoreResult<Model> {
        let model_type = ModelType::parse(&self.model_type).ok_or_else(|| {
            StoreError::storage(format!(
                "model {} has unknown type '{}'",
                self.model_id, self.model_type
            ))
        })?;

        Ok(Model {
            uuid: self.model_id,
            model_type,
            name: self.model_name,
            url: self.model_url,
            description: self.model_description,
            doi: self.model_doi,
            inherits: inherits.into_iter().collect(),
            properties: properties
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PropertyRow {
    pub model_property_id: i64,
    pub model_property_name: String,
    pub model_property_display_name: String,
    pub model_property_type: String,
    pub model_property_units: String,
    pub model_property_url: String,
    pub model_property_description: Option<String>,
}

impl PropertyRow {
    pub(crate) fn into_property(self, columns: Vec<ModelProperty>) -> ModelProperty {
        ModelProperty {
            name: self.model_property_name,
            display_name: self.model_property_display_name,
            property_type: PropertyType::parse(&self.model_property_type),
            units: self.model_property_units,
            url: self.model_property_url,
            description: self.model_property_description.unwrap_or_default(),
            columns,
            inherited: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Materials
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MaterialRow {
    pub material_id: String,
    pub library_id: i64,
    pub folder_id: Option<i64>,
    pub material_name: String,
    pub material_author: Option<String>,
    pub material_license: Option<String>,
    pub material_parent_uuid: Option<String>,
    pub material_description: Option<String>,
    pub material_url: Option<String>,
    pub material_reference: Option<String>,
}

/// Associations loaded separately from the base material row.
#[derive(Debug, Default)]
pub(crate) struct MaterialLinks {
    pub tags: Vec<String>,
    pub physical_models: Vec<String>,
    pub appearance_models: Vec<String>,
    pub values: BTreeMap<String, MaterialValue>,
}

impl MaterialRow {
    pub(crate) fn into_material(self, links: MaterialLinks) -> Material {
        Material {
            uuid: self.material_id,
            name: self.material_name,
            author: self.material_author,
            license: self.material_license,
            parent: self.material_parent_uuid,
            description: self.material_description,
            url: self.material_url,
            reference: self.material_reference,
            tags: links.tags.into_iter().collect(),
            physical_models: links.physical_models.into_iter().collect(),
            appearance_models: links.appearance_models.into_iter().collect(),
            values: links.values,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ValueHeaderRow {
    pub material_property_value_id: i64,
    pub material_property_name: String,
    pub material_property_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_row_drops_empty_icon() {
        let row = LibraryRow {
            library_id: 1,
            library_name: "System".to_string(),
            library_icon: Some(Vec::new()),
            library_read_only: true,
        };
        let lib = row.into_library();
        assert_eq!(lib.icon, None);
        assert!(lib.read_only);
    }

    #[test]
    fn test_model_row_rejects_unknown_type() {
        let row = ModelRow {
            model_id: "m".to_string(),
            library_id: 1,
            folder_id: None,
            model_type: "Chemical".to_string(),
            model_name: "X".to_string(),
            model_url: None,
            model_description: None,
            model_doi: None,
        };
        assert!(row.into_model(vec![], vec![]).is_err());
    }

    #[test]
    fn test_entry_row_root_path() {
        let entry = EntryRow {
            uuid: "u".to_string(),
            name: "Steel".to_string(),
            path: None,
        }
        .into_entry();
        assert_eq!(entry.path, "");
    }
}
