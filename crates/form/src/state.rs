//! Form state engine.
//!
//! [`initialize`] derives the default value map of a schema, [`apply_edit`]
//! produces the next value map for one change event. Neither mutates its
//! input; [`FormState`] owns the current map of one mounted form and swaps in
//! the result of every edit.

use std::sync::Arc;

use tracing::trace;

use crate::constraint::{self, ConstraintViolation};
use crate::error::EditError;
use crate::path::FieldPath;
use crate::schema::{FieldDescriptor, FieldKind, Schema};
use crate::value::{FieldValue, ValueMap};

/// Raw change event of an input control.
///
/// Checkbox edits read `checked`, every other kind reads `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldEvent {
    pub value: String,
    pub checked: bool,
}

impl FieldEvent {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: false,
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            value: String::new(),
            checked,
        }
    }
}

/// Default value map of `fields`: `""` for text-like leaves, `false` for
/// checkboxes, nested maps for sections.
pub fn initialize(fields: &[FieldDescriptor]) -> ValueMap {
    fields
        .iter()
        .map(|field| (field.name.clone(), default_value(field)))
        .collect()
}

fn default_value(field: &FieldDescriptor) -> FieldValue {
    match &field.kind {
        FieldKind::Section { fields } => FieldValue::Section(Arc::new(initialize(fields))),
        FieldKind::Checkbox => FieldValue::Checked(false),
        _ => FieldValue::Text(String::new()),
    }
}

/// Rebuild `map` with `f` applied to the nested map at `path`.
///
/// Only the maps along `path` are copied; sections off the path keep their
/// `Arc` and are shared with `map`.
pub fn update_at_path<F>(map: &ValueMap, path: &FieldPath, f: F) -> Result<ValueMap, EditError>
where
    F: FnOnce(&mut ValueMap),
{
    update_segments(map, path, path.as_slice(), f)
}

fn update_segments<F>(
    map: &ValueMap,
    full: &FieldPath,
    segments: &[String],
    f: F,
) -> Result<ValueMap, EditError>
where
    F: FnOnce(&mut ValueMap),
{
    let mut next = map.clone();
    match segments.split_first() {
        None => f(&mut next),
        Some((head, rest)) => {
            let child = map
                .get(head)
                .and_then(FieldValue::as_section)
                .ok_or_else(|| EditError::PathNotFound {
                    path: full.clone(),
                    segment: head.clone(),
                })?;
            let child = update_segments(child, full, rest, f)?;
            next.insert(head.clone(), FieldValue::Section(Arc::new(child)));
        }
    }
    Ok(next)
}

/// Produce the value map after one change event on `field_name`.
pub fn apply_edit(
    current: &ValueMap,
    path: &FieldPath,
    field_name: &str,
    field_kind: &FieldKind,
    event: &FieldEvent,
) -> Result<ValueMap, EditError> {
    let value = if field_kind.is_checkbox() {
        FieldValue::Checked(event.checked)
    } else {
        FieldValue::Text(event.value.clone())
    };
    trace!(%path, field = field_name, ?value, "apply edit");
    update_at_path(current, path, |map| {
        map.insert(field_name, value);
    })
}

/// Schema plus current value map of one mounted form.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: Schema,
    values: ValueMap,
}

impl FormState {
    pub fn new(schema: Schema) -> Self {
        let values = initialize(&schema.fields);
        Self { schema, values }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn value_at(&self, path: &FieldPath, name: &str) -> Option<&FieldValue> {
        self.values.lookup(path, name)
    }

    /// Apply one change event and store the resulting map.
    pub fn edit(
        &mut self,
        path: &FieldPath,
        field_name: &str,
        field_kind: &FieldKind,
        event: &FieldEvent,
    ) -> Result<(), EditError> {
        self.values = apply_edit(&self.values, path, field_name, field_kind, event)?;
        Ok(())
    }

    /// Back to the schema defaults.
    pub fn reset(&mut self) {
        self.values = initialize(&self.schema.fields);
    }

    /// Fields whose current value fails a native input constraint.
    pub fn violations(&self) -> Vec<ConstraintViolation> {
        constraint::check(&self.schema.fields, &self.values)
    }

    /// Snapshot of the value map if every constraint holds.
    pub fn submit(&self) -> Result<ValueMap, Vec<ConstraintViolation>> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(self.values.clone())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn nested_schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::text("name", "Name"),
            FieldDescriptor::section(
                "outer",
                "Outer",
                vec![
                    FieldDescriptor::section(
                        "inner",
                        "Inner",
                        vec![FieldDescriptor::checkbox("flag", "Flag")],
                    ),
                    FieldDescriptor::text("note", "Note"),
                ],
            ),
            FieldDescriptor::section(
                "other",
                "Other",
                vec![FieldDescriptor::text("x", "X")],
            ),
        ])
    }

    #[test]
    fn initialize_mirrors_nesting() {
        let values = initialize(&nested_schema().fields);
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!({
                "name": "",
                "outer": { "inner": { "flag": false }, "note": "" },
                "other": { "x": "" },
            })
        );
    }

    #[test]
    fn unknown_type_defaults_to_empty_string() {
        let schema = Schema::new(vec![FieldDescriptor::new(
            "dob",
            "Birthday",
            FieldKind::Unknown("date".into()),
        )]);
        let values = initialize(&schema.fields);
        assert_eq!(values.get("dob"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn edit_deep_checkbox() {
        let values = initialize(&nested_schema().fields);
        let path = FieldPath::from_slice(&["outer", "inner"]);
        let next = apply_edit(
            &values,
            &path,
            "flag",
            &FieldKind::Checkbox,
            &FieldEvent::checked(true),
        )
        .unwrap();
        assert_eq!(next.lookup(&path, "flag"), Some(&FieldValue::Checked(true)));
        assert_eq!(values.lookup(&path, "flag"), Some(&FieldValue::Checked(false)));
    }

    #[test]
    fn checkbox_reads_checked_and_text_reads_value() {
        let values = initialize(&nested_schema().fields);
        let event = FieldEvent {
            value: "on".into(),
            checked: true,
        };
        let path = FieldPath::from_slice(&["outer", "inner"]);
        let next = apply_edit(&values, &path, "flag", &FieldKind::Checkbox, &event).unwrap();
        assert_eq!(next.lookup(&path, "flag"), Some(&FieldValue::Checked(true)));

        let next = apply_edit(
            &values,
            &FieldPath::root(),
            "name",
            &FieldKind::Text { required: false },
            &event,
        )
        .unwrap();
        assert_eq!(next.get("name"), Some(&FieldValue::Text("on".into())));
    }

    #[test]
    fn copy_on_write_along_path_only() {
        let values = initialize(&nested_schema().fields);
        let path = FieldPath::from_slice(&["outer", "inner"]);
        let next = apply_edit(
            &values,
            &path,
            "flag",
            &FieldKind::Checkbox,
            &FieldEvent::checked(true),
        )
        .unwrap();

        fn section(m: &ValueMap, name: &str) -> Option<Arc<ValueMap>> {
            m.get(name).and_then(FieldValue::as_section).cloned()
        }
        let old_outer = section(&values, "outer").unwrap();
        let new_outer = section(&next, "outer").unwrap();
        assert!(!Arc::ptr_eq(&old_outer, &new_outer));
        assert!(!Arc::ptr_eq(
            &section(&old_outer, "inner").unwrap(),
            &section(&new_outer, "inner").unwrap()
        ));
        // Off-path section is shared.
        assert!(Arc::ptr_eq(
            &section(&values, "other").unwrap(),
            &section(&next, "other").unwrap()
        ));
    }

    #[test]
    fn missing_path_segment_is_an_error() {
        let values = initialize(&nested_schema().fields);
        let err = apply_edit(
            &values,
            &FieldPath::from_slice(&["outer", "missing"]),
            "x",
            &FieldKind::Text { required: false },
            &FieldEvent::value("v"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EditError::PathNotFound {
                path: FieldPath::from_slice(&["outer", "missing"]),
                segment: "missing".into(),
            }
        );
    }

    #[test]
    fn path_through_a_leaf_is_an_error() {
        let values = initialize(&nested_schema().fields);
        let result = apply_edit(
            &values,
            &FieldPath::from_slice(&["name"]),
            "x",
            &FieldKind::Text { required: false },
            &FieldEvent::value("v"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn form_state_replaces_values_and_resets() {
        let mut state = FormState::new(nested_schema());
        state
            .edit(
                &FieldPath::root(),
                "name",
                &FieldKind::Text { required: false },
                &FieldEvent::value("Ada"),
            )
            .unwrap();
        assert_eq!(
            state.value_at(&FieldPath::root(), "name"),
            Some(&FieldValue::Text("Ada".into()))
        );
        state.reset();
        assert_eq!(state.values(), &initialize(&nested_schema().fields));
    }

    #[test]
    fn failed_edit_keeps_current_values() {
        let mut state = FormState::new(nested_schema());
        let before = state.values().clone();
        let result = state.edit(
            &FieldPath::from_slice(&["nope"]),
            "x",
            &FieldKind::Checkbox,
            &FieldEvent::checked(true),
        );
        assert!(result.is_err());
        assert_eq!(state.values(), &before);
    }
}
