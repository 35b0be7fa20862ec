//! Property type tags and their storage shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a property value is laid out in storage.
///
/// Several declared property types share a shape: `List` and `FileList`
/// are both ordered short strings, `Image` and `SVG` are both long text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// Single short string.
    Scalar,
    /// Single long text payload (images, SVG documents).
    LongText,
    /// Ordered list of short strings.
    List,
    /// Ordered list of long text payloads.
    LongList,
    /// Rows × columns of canonical strings.
    #[serde(rename = "array2d")]
    Array2D,
    /// Depth slices of rows × columns, each slice with its own label and row count.
    #[serde(rename = "array3d")]
    Array3D,
}

/// Declared type of a model property.
///
/// The string form is what gets persisted in `model_property_type` and
/// `material_property_type`. Unknown type names round-trip through
/// [`PropertyType::Other`] and are stored as plain scalars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    String,
    Boolean,
    Integer,
    Float,
    Quantity,
    Distribution,
    MultiLineString,
    Url,
    Color,
    File,
    Image,
    Svg,
    List,
    FileList,
    ImageList,
    Array2D,
    Array3D,
    Other(String),
}

impl PropertyType {
    /// The persisted type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Quantity => "Quantity",
            Self::Distribution => "Distribution",
            Self::MultiLineString => "MultiLineString",
            Self::Url => "URL",
            Self::Color => "Color",
            Self::File => "File",
            Self::Image => "Image",
            Self::Svg => "SVG",
            Self::List => "List",
            Self::FileList => "FileList",
            Self::ImageList => "ImageList",
            Self::Array2D => "2DArray",
            Self::Array3D => "3DArray",
            Self::Other(name) => name,
        }
    }

    /// Parse a persisted type name. Never fails; unknown names become `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "Quantity" => Self::Quantity,
            "Distribution" => Self::Distribution,
            "MultiLineString" => Self::MultiLineString,
            "URL" => Self::Url,
            "Color" => Self::Color,
            "File" => Self::File,
            "Image" => Self::Image,
            "SVG" => Self::Svg,
            "List" => Self::List,
            "FileList" => Self::FileList,
            "ImageList" => Self::ImageList,
            "2DArray" => Self::Array2D,
            "3DArray" => Self::Array3D,
            other => Self::Other(other.to_string()),
        }
    }

    /// Storage shape used for values of this type.
    pub const fn shape(&self) -> ValueShape {
        match self {
            Self::Image | Self::Svg => ValueShape::LongText,
            Self::List | Self::FileList => ValueShape::List,
            Self::ImageList => ValueShape::LongList,
            Self::Array2D => ValueShape::Array2D,
            Self::Array3D => ValueShape::Array3D,
            _ => ValueShape::Scalar,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PropertyType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.as_str().to_string()
    }
}
