//! Core services - orchestration over the repository ports.
//!
//! Services here are pure orchestrators; they don't know about concrete
//! storage implementations.

mod inheritance;
mod material_manager;

pub use inheritance::{ancestors, effective_model};
pub use material_manager::{ImportSummary, MaterialManager};
