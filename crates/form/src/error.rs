use thiserror::Error;

use crate::path::FieldPath;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A path segment does not name a nested section in the value map.
    #[error("no section `{segment}` along path {path}")]
    PathNotFound { path: FieldPath, segment: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate field name `{name}` in {path}")]
    DuplicateName { path: FieldPath, name: String },
}
