//! Shared CLI presentation utilities.
//!
//! Format-only: rendering of listings as text and of stored objects as JSON.

pub mod json;
pub mod tables;

pub use json::{LibraryView, StoredView, encode_icon, to_json};
pub use tables::{format_entries, format_libraries, truncate_string};
