//! Model schemas: typed property declarations shared by materials.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::property::PropertyType;

/// Whether a model describes physical behaviour or rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    Physical,
    Appearance,
}

impl ModelType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Appearance => "Appearance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Physical" => Some(Self::Physical),
            "Appearance" => Some(Self::Appearance),
            _ => None,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed property slot on a model.
///
/// Tabular properties carry an ordered list of column sub-properties.
/// `inherited` marks a declaration copied from a parent model; such
/// entries are never persisted on the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProperty {
    pub name: String,
    pub display_name: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ModelProperty>,
    #[serde(default)]
    pub inherited: bool,
}

impl ModelProperty {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            property_type,
            units: String::new(),
            url: String::new(),
            description: String::new(),
            columns: Vec::new(),
            inherited: false,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: Self) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub const fn inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }
}

/// A reusable property schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub uuid: String,
    pub model_type: ModelType,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    /// Uuids of parent models.
    #[serde(default)]
    pub inherits: BTreeSet<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, ModelProperty>,
}

impl Model {
    pub fn new(uuid: impl Into<String>, model_type: ModelType, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            model_type,
            name: name.into(),
            url: None,
            description: None,
            doi: None,
            inherits: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    #[must_use]
    pub fn inherit(mut self, parent_uuid: impl Into<String>) -> Self {
        self.inherits.insert(parent_uuid.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: ModelProperty) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Properties declared on this model itself.
    pub fn own_properties(&self) -> impl Iterator<Item = &ModelProperty> {
        self.properties.values().filter(|p| !p.inherited)
    }
}
