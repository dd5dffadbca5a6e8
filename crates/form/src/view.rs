//! Field renderer.
//!
//! [`render`] walks a field list and produces the view tree a frontend draws:
//! one node per leaf control, one container per section. Every leaf carries
//! the [`Binding`] needed to route its change events back into
//! [`FormState::edit`](crate::FormState::edit).

use tracing::debug;

use crate::path::FieldPath;
use crate::schema::{FieldDescriptor, FieldKind};
use crate::value::{FieldValue, ValueMap};

/// Where a control reads its value from and writes its edits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub path: FieldPath,
    pub name: String,
    pub kind: FieldKind,
}

impl Binding {
    fn of(field: &FieldDescriptor, path: &FieldPath) -> Self {
        Self {
            path: path.clone(),
            name: field.name.clone(),
            kind: field.kind.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Section {
        label: String,
        path: FieldPath,
        children: Vec<ViewNode>,
    },
    Input {
        label: String,
        input_type: InputType,
        required: bool,
        value: String,
        binding: Binding,
    },
    Select {
        label: String,
        options: Vec<String>,
        selected: String,
        binding: Binding,
    },
    Checkbox {
        label: String,
        checked: bool,
        binding: Binding,
    },
}

impl ViewNode {
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            ViewNode::Section { .. } => None,
            ViewNode::Input { binding, .. }
            | ViewNode::Select { binding, .. }
            | ViewNode::Checkbox { binding, .. } => Some(binding),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ViewNode::Section { label, .. }
            | ViewNode::Input { label, .. }
            | ViewNode::Select { label, .. }
            | ViewNode::Checkbox { label, .. } => label,
        }
    }
}

/// Render `fields` located at `path`, binding leaves to `values`.
///
/// Nodes come out in schema order. Fields of an unknown type produce no node.
pub fn render(fields: &[FieldDescriptor], path: &FieldPath, values: &ValueMap) -> Vec<ViewNode> {
    fields
        .iter()
        .filter_map(|field| render_field(field, path, values))
        .collect()
}

fn render_field(field: &FieldDescriptor, path: &FieldPath, values: &ValueMap) -> Option<ViewNode> {
    let text = || {
        values
            .lookup(path, &field.name)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string()
    };
    let node = match &field.kind {
        FieldKind::Section { fields } => {
            let path = path.child(&field.name);
            let children = render(fields, &path, values);
            ViewNode::Section {
                label: field.label.clone(),
                path,
                children,
            }
        }
        FieldKind::Text { required } | FieldKind::Email { required } => ViewNode::Input {
            label: field.label.clone(),
            input_type: if matches!(field.kind, FieldKind::Email { .. }) {
                InputType::Email
            } else {
                InputType::Text
            },
            required: *required,
            value: text(),
            binding: Binding::of(field, path),
        },
        FieldKind::Select { options } => ViewNode::Select {
            label: field.label.clone(),
            options: options.clone(),
            selected: text(),
            binding: Binding::of(field, path),
        },
        FieldKind::Checkbox => ViewNode::Checkbox {
            label: field.label.clone(),
            checked: values
                .lookup(path, &field.name)
                .and_then(FieldValue::as_checked)
                .unwrap_or(false),
            binding: Binding::of(field, path),
        },
        FieldKind::Unknown(type_name) => {
            debug!(field = %field.name, %type_name, "skipping field of unknown type");
            return None;
        }
    };
    Some(node)
}

/// Leaf bindings in visual top-to-bottom order.
pub fn bindings(nodes: &[ViewNode]) -> Vec<Binding> {
    let mut out = Vec::new();
    collect_bindings(nodes, &mut out);
    out
}

fn collect_bindings(nodes: &[ViewNode], out: &mut Vec<Binding>) {
    for node in nodes {
        match node {
            ViewNode::Section { children, .. } => collect_bindings(children, out),
            leaf => out.extend(leaf.binding().cloned()),
        }
    }
}
