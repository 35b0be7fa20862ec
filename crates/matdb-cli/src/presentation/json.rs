//! JSON rendering of stored models and materials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use matdb_core::{Library, StoredObject};

/// Base64 form of a library icon.
pub fn encode_icon(icon: &[u8]) -> String {
    STANDARD.encode(icon)
}

/// A library with its icon as base64 text.
#[derive(Debug, Serialize)]
pub struct LibraryView<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub read_only: bool,
}

impl<'a> From<&'a Library> for LibraryView<'a> {
    fn from(library: &'a Library) -> Self {
        Self {
            name: &library.name,
            icon: library.icon.as_deref().map(encode_icon),
            read_only: library.read_only,
        }
    }
}

/// A stored object together with its library and folder path.
#[derive(Debug, Serialize)]
pub struct StoredView<'a, T> {
    pub library: LibraryView<'a>,
    pub path: &'a str,
    #[serde(flatten)]
    pub object: &'a T,
}

impl<'a, T> From<&'a StoredObject<T>> for StoredView<'a, T> {
    fn from(stored: &'a StoredObject<T>) -> Self {
        Self {
            library: LibraryView::from(&stored.library),
            path: &stored.path,
            object: &stored.object,
        }
    }
}

/// Pretty JSON for a stored model or material.
pub fn to_json<T: Serialize>(stored: &StoredObject<T>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&StoredView::from(stored))
}
