//! Materials and material listing filters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::property::PropertyType;
use super::value::PropertyValue;

/// A typed property value carried by a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialValue {
    pub property_type: PropertyType,
    pub value: PropertyValue,
}

impl MaterialValue {
    pub const fn new(property_type: PropertyType, value: PropertyValue) -> Self {
        Self {
            property_type,
            value,
        }
    }

    /// Whether the value's shape is the one its declared type stores as.
    pub fn is_consistent(&self) -> bool {
        self.property_type.shape() == self.value.shape()
    }
}

/// A concrete material entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    /// Material-level inheritance, unrelated to model inheritance.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub physical_models: BTreeSet<String>,
    #[serde(default)]
    pub appearance_models: BTreeSet<String>,
    #[serde(default)]
    pub values: BTreeMap<String, MaterialValue>,
}

impl Material {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            author: None,
            license: None,
            parent: None,
            description: None,
            url: None,
            reference: None,
            tags: BTreeSet::new(),
            physical_models: BTreeSet::new(),
            appearance_models: BTreeSet::new(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent_uuid: impl Into<String>) -> Self {
        self.parent = Some(parent_uuid.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn with_physical_model(mut self, model_uuid: impl Into<String>) -> Self {
        self.physical_models.insert(model_uuid.into());
        self
    }

    #[must_use]
    pub fn with_appearance_model(mut self, model_uuid: impl Into<String>) -> Self {
        self.appearance_models.insert(model_uuid.into());
        self
    }

    #[must_use]
    pub fn with_value(
        mut self,
        name: impl Into<String>,
        property_type: PropertyType,
        value: PropertyValue,
    ) -> Self {
        self.values
            .insert(name.into(), MaterialValue::new(property_type, value));
        self
    }

    /// Physical and appearance model uuids together.
    pub fn model_uuids(&self) -> impl Iterator<Item = &String> {
        self.physical_models.iter().chain(&self.appearance_models)
    }

    /// A material with no model associations predates the model system.
    pub fn is_legacy(&self) -> bool {
        self.physical_models.is_empty() && self.appearance_models.is_empty()
    }
}

/// Narrow a material listing.
///
/// All present criteria must match. Tag and model criteria require every
/// listed tag or model to be associated with the material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialFilter {
    /// Case-insensitive substring of the material name.
    #[serde(default)]
    pub name_contains: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub required_models: BTreeSet<String>,
}

impl MaterialFilter {
    pub fn is_empty(&self) -> bool {
        self.name_contains.is_none() && self.tags.is_empty() && self.required_models.is_empty()
    }
}

/// Listing switches independent of the filter criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialFilterOptions {
    /// Include materials with no model associations.
    pub include_legacy: bool,
}

impl Default for MaterialFilterOptions {
    fn default() -> Self {
        Self {
            include_legacy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_material() {
        let m = Material::new("a", "Steel");
        assert!(m.is_legacy());
        let m = m.with_appearance_model("b");
        assert!(!m.is_legacy());
        assert_eq!(m.model_uuids().count(), 1);
    }

    #[test]
    fn test_value_consistency() {
        let ok = MaterialValue::new(PropertyType::FileList, PropertyValue::List(vec![]));
        assert!(ok.is_consistent());
        let bad = MaterialValue::new(PropertyType::Image, PropertyValue::Scalar("x".into()));
        assert!(!bad.is_consistent());
    }

    #[test]
    fn test_default_options_include_legacy() {
        assert!(MaterialFilterOptions::default().include_legacy);
        assert!(MaterialFilter::default().is_empty());
    }
}
