//! Schema sources: the built-in demo schema and schema files on disk.
//!
//! Files may be JSON, JSON5 or TOML. JSON flavors accept either a bare array
//! of field descriptors or a document with an optional `title`:
//!
//! ```json
//! { "title": "Sign up", "fields": [{ "name": "email", "type": "email", "required": true }] }
//! ```
//!
//! TOML needs the document form (`title = ...` plus `[[fields]]` tables).

use std::path::Path;

use color_eyre::{Result, eyre::WrapErr, eyre::eyre};
use form::{FieldDescriptor, Schema};
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_TITLE: &str = "Dynamic Form Builder";

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub title: String,
    pub schema: Schema,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Fields(Schema),
    Document {
        #[serde(default)]
        title: Option<String>,
        fields: Schema,
    },
}

impl From<RawDocument> for SchemaDocument {
    fn from(raw: RawDocument) -> Self {
        let (title, schema) = match raw {
            RawDocument::Fields(schema) => (None, schema),
            RawDocument::Document { title, fields } => (title, fields),
        };
        SchemaDocument {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            schema,
        }
    }
}

/// The profile form the application shows when no schema file is given.
pub fn demo_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("fullName", "Full Name").required(),
        FieldDescriptor::email("email", "Email").required(),
        FieldDescriptor::select("gender", "Gender", ["Male", "Female", "Other"]),
        FieldDescriptor::section(
            "education",
            "Education",
            vec![
                FieldDescriptor::text("degree", "Degree"),
                FieldDescriptor::text("university", "University"),
            ],
        ),
        FieldDescriptor::section(
            "workExperience",
            "Work Experience",
            vec![
                FieldDescriptor::text("company", "Company"),
                FieldDescriptor::text("role", "Role"),
            ],
        ),
        FieldDescriptor::checkbox("subscribe", "Subscribe to Newsletter"),
    ])
}

pub fn demo_document() -> SchemaDocument {
    SchemaDocument {
        title: DEFAULT_TITLE.to_string(),
        schema: demo_schema(),
    }
}

/// Load `path`, or the demo document when no path is given.
pub fn load_or_demo(path: Option<&Path>) -> Result<SchemaDocument> {
    match path {
        Some(path) => load(path),
        None => Ok(demo_document()),
    }
}

pub fn load(path: &Path) -> Result<SchemaDocument> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading schema file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let raw: RawDocument = match extension.as_str() {
        "json" => serde_json::from_str(&text)?,
        "json5" => json5::from_str(&text)?,
        "toml" => toml::from_str(&text)?,
        other => return Err(eyre!("unsupported schema file extension `{other}`")),
    };
    let document = SchemaDocument::from(raw);
    document
        .schema
        .validate()
        .wrap_err_with(|| format!("invalid schema in {}", path.display()))?;
    info!(path = %path.display(), fields = document.schema.field_count(), "schema loaded");
    Ok(document)
}
