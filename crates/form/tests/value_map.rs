//! Behavior of the value map across initialization, edits and submission.
//!
//! Uses the same schema the terminal host ships as its demo plus a few
//! hand-built edge cases.

use std::sync::Arc;

use form::{
    FieldDescriptor, FieldEvent, FieldKind, FieldPath, FieldValue, FormState, Schema, ValueMap,
    apply_edit, bindings, initialize, render,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn profile_schema() -> Schema {
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

fn assert_shape(fields: &[FieldDescriptor], values: &ValueMap) {
    let expected: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    let actual: Vec<_> = values.keys().collect();
    assert_eq!(actual, expected);
    for field in fields {
        if let FieldKind::Section { fields } = &field.kind {
            let nested = values
                .get(&field.name)
                .and_then(FieldValue::as_section)
                .unwrap_or_else(|| panic!("section `{}` is not a map", field.name));
            assert_shape(fields, nested);
        }
    }
}

/// Every leaf as `(path, name, value)` in schema order.
fn leaves(values: &ValueMap, path: &FieldPath, out: &mut Vec<(FieldPath, String, FieldValue)>) {
    for (name, value) in values.iter() {
        match value {
            FieldValue::Section(nested) => leaves(nested, &path.child(name), out),
            leaf => out.push((path.clone(), name.to_string(), leaf.clone())),
        }
    }
}

fn all_leaves(values: &ValueMap) -> Vec<(FieldPath, String, FieldValue)> {
    let mut out = Vec::new();
    leaves(values, &FieldPath::root(), &mut out);
    out
}

fn event_for(kind: &FieldKind) -> FieldEvent {
    match kind {
        FieldKind::Checkbox => FieldEvent::checked(true),
        FieldKind::Select { options } => FieldEvent::value(options[1].clone()),
        _ => FieldEvent::value("edited"),
    }
}

#[test]
fn initial_keys_mirror_schema_at_every_level() {
    let schema = profile_schema();
    assert_shape(&schema.fields, &initialize(&schema.fields));
}

#[test]
fn every_edit_changes_exactly_one_leaf() {
    let schema = profile_schema();
    let initial = initialize(&schema.fields);
    let nodes = render(&schema.fields, &FieldPath::root(), &initial);

    for binding in bindings(&nodes) {
        let next = apply_edit(
            &initial,
            &binding.path,
            &binding.name,
            &binding.kind,
            &event_for(&binding.kind),
        )
        .unwrap();
        assert_shape(&schema.fields, &next);

        let before = all_leaves(&initial);
        let after = all_leaves(&next);
        let changed: Vec<_> = before
            .iter()
            .zip(after.iter())
            .filter(|(b, a)| b != a)
            .map(|(_, a)| (a.0.clone(), a.1.clone()))
            .collect();
        assert_eq!(changed, vec![(binding.path.clone(), binding.name.clone())]);
    }
}

#[test]
fn repeating_an_edit_is_idempotent() {
    let schema = profile_schema();
    let initial = initialize(&schema.fields);
    let path = FieldPath::from_slice(&["workExperience"]);
    let kind = FieldKind::Text { required: false };
    let event = FieldEvent::value("Engineer");

    let once = apply_edit(&initial, &path, "role", &kind, &event).unwrap();
    let twice = apply_edit(&once, &path, "role", &kind, &event).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn untouched_sections_are_shared() {
    let schema = profile_schema();
    let initial = initialize(&schema.fields);
    let next = apply_edit(
        &initial,
        &FieldPath::from_slice(&["education"]),
        "degree",
        &FieldKind::Text { required: false },
        &FieldEvent::value("BSc"),
    )
    .unwrap();

    let section = |m: &ValueMap, name: &str| m.get(name).and_then(FieldValue::as_section).cloned();
    assert!(!Arc::ptr_eq(
        &section(&initial, "education").unwrap(),
        &section(&next, "education").unwrap()
    ));
    assert!(Arc::ptr_eq(
        &section(&initial, "workExperience").unwrap(),
        &section(&next, "workExperience").unwrap()
    ));
}

#[test]
fn submission_hands_over_current_values_unchanged() {
    let mut state = FormState::new(profile_schema());
    state
        .edit(
            &FieldPath::root(),
            "fullName",
            &FieldKind::Text { required: true },
            &FieldEvent::value("Ada Lovelace"),
        )
        .unwrap();
    state
        .edit(
            &FieldPath::root(),
            "email",
            &FieldKind::Email { required: true },
            &FieldEvent::value("ada@example.com"),
        )
        .unwrap();

    let before = state.values().clone();
    let submitted = state.submit().unwrap();
    assert_eq!(submitted, before);
    assert_eq!(state.values(), &before);
}

#[test]
fn scenario_single_text_field() {
    let schema = Schema::new(vec![FieldDescriptor::new(
        "a",
        "",
        FieldKind::Text { required: false },
    )]);
    assert_eq!(
        serde_json::to_value(initialize(&schema.fields)).unwrap(),
        json!({ "a": "" })
    );
}

#[test]
fn scenario_section_with_checkbox() {
    let schema = Schema::new(vec![FieldDescriptor::section(
        "s",
        "",
        vec![FieldDescriptor::checkbox("x", "")],
    )]);
    let initial = initialize(&schema.fields);
    assert_eq!(
        serde_json::to_value(&initial).unwrap(),
        json!({ "s": { "x": false } })
    );

    let next = apply_edit(
        &initial,
        &FieldPath::from_slice(&["s"]),
        "x",
        &FieldKind::Checkbox,
        &FieldEvent::checked(true),
    )
    .unwrap();
    assert_eq!(
        serde_json::to_value(&next).unwrap(),
        json!({ "s": { "x": true } })
    );
}

#[test]
fn scenario_select_starts_empty() {
    let schema = Schema::new(vec![FieldDescriptor::select(
        "gender",
        "Gender",
        ["Male", "Female", "Other"],
    )]);
    assert_eq!(
        initialize(&schema.fields).get("gender"),
        Some(&FieldValue::Text(String::new()))
    );
}

#[test]
fn scenario_untouched_submission_returns_defaults() {
    let schema = Schema::new(vec![
        FieldDescriptor::text("fullName", "Full Name"),
        FieldDescriptor::select("gender", "Gender", ["Male", "Female", "Other"]),
        FieldDescriptor::section(
            "education",
            "Education",
            vec![FieldDescriptor::text("degree", "Degree")],
        ),
        FieldDescriptor::checkbox("subscribe", "Subscribe"),
    ]);
    let state = FormState::new(schema.clone());
    assert_eq!(state.submit().unwrap(), initialize(&schema.fields));
}

#[test]
fn required_fields_block_untouched_demo_submission() {
    let state = FormState::new(profile_schema());
    let violations = state.submit().unwrap_err();
    let names: Vec<_> = violations.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["fullName", "email"]);
}
