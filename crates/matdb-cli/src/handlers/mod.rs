//! Command handlers.
//!
//! Handlers are thin: they read CLI input, call the `MaterialManager` from
//! the `CliContext` (or the provisioning functions for schema commands) and
//! print the result.

pub mod folder;
pub mod library;
pub mod list;
pub mod load;
pub mod paths;
pub mod schema;
pub mod show;
