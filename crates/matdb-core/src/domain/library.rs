//! Libraries and library-scoped listings.

use serde::{Deserialize, Serialize};

/// A top-level named container for models and materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    /// Raw icon bytes. An empty icon is the same as no icon.
    #[serde(default)]
    pub icon: Option<Vec<u8>>,
    #[serde(default)]
    pub read_only: bool,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            read_only: false,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Option<Vec<u8>>) -> Self {
        self.icon = normalize_icon(icon);
        self
    }

    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Whether an existing library is compatible with a create request.
    pub fn matches(&self, icon: Option<&[u8]>, read_only: bool) -> bool {
        let requested = icon.filter(|i| !i.is_empty());
        self.read_only == read_only && self.icon.as_deref() == requested
    }
}

/// Collapse `Some(vec![])` to `None`.
pub fn normalize_icon(icon: Option<Vec<u8>>) -> Option<Vec<u8>> {
    icon.filter(|i| !i.is_empty())
}

/// A model or material as seen from a library listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub uuid: String,
    /// Folder path inside the library, `""` for the root.
    pub path: String,
    pub name: String,
}

/// An object together with where it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject<T> {
    pub library: Library,
    pub path: String,
    pub object: T,
}

pub type StoredModel = StoredObject<super::Model>;
pub type StoredMaterial = StoredObject<super::Material>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_icon_is_no_icon() {
        let lib = Library::new("User").with_icon(Some(Vec::new()));
        assert!(lib.icon.is_none());
        assert!(lib.matches(None, false));
        assert!(lib.matches(Some(&[]), false));
        assert!(!lib.matches(Some(&[1, 2]), false));
        assert!(!lib.matches(None, true));
    }
}
