//! Schema driven forms.
//!
//! - [`schema`]: declarative field descriptors
//! - [`value`]: the schema-shaped value map
//! - [`state`]: initialization and copy-on-write edits
//! - [`constraint`]: native input constraints checked on submit
//! - [`view`]: schema + values to a renderable view tree

pub mod constraint;
pub mod error;
pub mod path;
pub mod schema;
pub mod state;
pub mod value;
pub mod view;

pub use constraint::{ConstraintViolation, ViolationKind};
pub use error::{EditError, SchemaError};
pub use path::FieldPath;
pub use schema::{FieldDescriptor, FieldKind, Schema};
pub use state::{FieldEvent, FormState, apply_edit, initialize, update_at_path};
pub use value::{FieldValue, ValueMap};
pub use view::{Binding, InputType, ViewNode, bindings, render};
