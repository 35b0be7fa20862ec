//! Input validation and path helpers shared by adapters.

pub mod path;
pub mod validation;

pub use path::{join_path, split_path};
pub use validation::{new_uuid, validate_name, validate_uuid};
