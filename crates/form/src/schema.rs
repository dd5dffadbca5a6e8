//! Declarative form schema.
//!
//! A [`Schema`] is an ordered list of [`FieldDescriptor`]s. Leaves describe a
//! single input control, `Section` descriptors group a nested field list and
//! may nest arbitrarily deep.
//!
//! ```ignore
//! use form::{FieldDescriptor, Schema};
//!
//! let schema = Schema::new(vec![
//!     FieldDescriptor::text("fullName", "Full Name").required(),
//!     FieldDescriptor::section("education", "Education", vec![
//!         FieldDescriptor::text("degree", "Degree"),
//!     ]),
//!     FieldDescriptor::checkbox("subscribe", "Subscribe to Newsletter"),
//! ]);
//! ```
//!
//! On the wire a descriptor is a flat object keyed by `type`, the same shape
//! used by schema files:
//! `{ "name": "gender", "label": "Gender", "type": "select", "options": [..] }`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::path::FieldPath;

/// The kind of a field, including the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text { required: bool },
    Email { required: bool },
    Select { options: Vec<String> },
    Checkbox,
    Section { fields: Vec<FieldDescriptor> },
    /// Any `type` string the renderer does not know. Rendered as nothing.
    Unknown(String),
}

impl FieldKind {
    /// The `type` tag used in schema files.
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Email { .. } => "email",
            FieldKind::Select { .. } => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Section { .. } => "section",
            FieldKind::Unknown(name) => name,
        }
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self, FieldKind::Checkbox)
    }

    pub fn is_section(&self) -> bool {
        matches!(self, FieldKind::Section { .. })
    }

    /// Text and email fields edit a free-form string.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldKind::Text { .. } | FieldKind::Email { .. })
    }

    pub fn is_required(&self) -> bool {
        match self {
            FieldKind::Text { required } | FieldKind::Email { required } => *required,
            _ => false,
        }
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawField", into = "RawField")]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text { required: false })
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Email { required: false })
    }

    pub fn select<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(name, label, FieldKind::Select { options })
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn section(
        name: impl Into<String>,
        label: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self::new(name, label, FieldKind::Section { fields })
    }

    /// Mark a text or email field as required. No effect on other kinds.
    pub fn required(mut self) -> Self {
        if let FieldKind::Text { required } | FieldKind::Email { required } = &mut self.kind {
            *required = true;
        }
        self
    }

    /// Nested fields of a section, empty for leaves.
    pub fn children(&self) -> &[FieldDescriptor] {
        match &self.kind {
            FieldKind::Section { fields } => fields,
            _ => &[],
        }
    }
}

/// Ordered, possibly nested list of field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Find a field by the path of its parent sections and its own name.
    pub fn find(&self, path: &FieldPath, name: &str) -> Option<&FieldDescriptor> {
        let mut fields = self.fields.as_slice();
        for segment in path.as_slice() {
            let section = fields
                .iter()
                .find(|f| f.name == *segment && f.kind.is_section())?;
            fields = section.children();
        }
        fields.iter().find(|f| f.name == name)
    }

    /// Reject field lists that repeat a name at the same level.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_fields(&self.fields, &FieldPath::root())
    }
}

fn validate_fields(fields: &[FieldDescriptor], path: &FieldPath) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateName {
                path: path.clone(),
                name: field.name.clone(),
            });
        }
        if let FieldKind::Section { fields } = &field.kind {
            validate_fields(fields, &path.child(&field.name))?;
        }
    }
    Ok(())
}

/// Flat wire shape of a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawField {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldDescriptor>,
}

impl From<RawField> for FieldDescriptor {
    fn from(raw: RawField) -> Self {
        let kind = match raw.kind.as_str() {
            "text" => FieldKind::Text {
                required: raw.required,
            },
            "email" => FieldKind::Email {
                required: raw.required,
            },
            "select" => FieldKind::Select {
                options: raw.options,
            },
            "checkbox" => FieldKind::Checkbox,
            "section" => FieldKind::Section { fields: raw.fields },
            _ => FieldKind::Unknown(raw.kind),
        };
        FieldDescriptor {
            name: raw.name,
            label: raw.label,
            kind,
        }
    }
}

impl From<FieldDescriptor> for RawField {
    fn from(field: FieldDescriptor) -> Self {
        let kind = field.kind.type_name().to_string();
        let required = field.kind.is_required();
        let (options, fields) = match field.kind {
            FieldKind::Select { options } => (options, Vec::new()),
            FieldKind::Section { fields } => (Vec::new(), fields),
            _ => (Vec::new(), Vec::new()),
        };
        RawField {
            name: field.name,
            label: field.label,
            kind,
            required,
            options,
            fields,
        }
    }
}
