//! Input constraints checked at submission time.
//!
//! These are the constraints an HTML form applies natively before it fires
//! `submit`: a `required` text or email input must be non-empty, and a
//! non-empty email input must look like `local@domain`. Nothing else can
//! block a submission.

use std::fmt;

use crate::path::FieldPath;
use crate::schema::{FieldDescriptor, FieldKind};
use crate::value::{FieldValue, ValueMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    ValueMissing,
    TypeMismatch,
}

impl ViolationKind {
    pub fn message(self) -> &'static str {
        match self {
            ViolationKind::ValueMissing => "Please fill out this field.",
            ViolationKind::TypeMismatch => "Please enter an email address.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub path: FieldPath,
    pub name: String,
    pub kind: ViolationKind,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.name, self.kind.message())
        } else {
            write!(f, "{}.{}: {}", self.path, self.name, self.kind.message())
        }
    }
}

/// Violations in schema order, depth first.
pub fn check(fields: &[FieldDescriptor], values: &ValueMap) -> Vec<ConstraintViolation> {
    let mut out = Vec::new();
    check_level(fields, values, &FieldPath::root(), &mut out);
    out
}

fn check_level(
    fields: &[FieldDescriptor],
    values: &ValueMap,
    path: &FieldPath,
    out: &mut Vec<ConstraintViolation>,
) {
    for field in fields {
        let value = values.get(&field.name);
        let kind = match (&field.kind, value) {
            (FieldKind::Section { fields }, Some(FieldValue::Section(nested))) => {
                check_level(fields, nested, &path.child(&field.name), out);
                None
            }
            (FieldKind::Text { required }, value) => text_violation(*required, value, false),
            (FieldKind::Email { required }, value) => text_violation(*required, value, true),
            _ => None,
        };
        if let Some(kind) = kind {
            out.push(ConstraintViolation {
                path: path.clone(),
                name: field.name.clone(),
                kind,
            });
        }
    }
}

fn text_violation(required: bool, value: Option<&FieldValue>, email: bool) -> Option<ViolationKind> {
    let raw = value.and_then(FieldValue::as_text).unwrap_or("");
    // email inputs strip surrounding whitespace before any check
    let text = if email {
        raw.trim_matches(|c: char| c.is_ascii_whitespace())
    } else {
        raw
    };
    if text.is_empty() {
        return required.then_some(ViolationKind::ValueMissing);
    }
    (email && !is_valid_email(text)).then_some(ViolationKind::TypeMismatch)
}

/// The `local@domain` grammar of an HTML email input.
///
/// The local part is one or more of `A-Z a-z 0-9 .!#$%&'*+/=?^_`{|}~-`. The
/// domain is dot-separated labels of up to 63 alphanumerics and hyphens that
/// neither start nor end with a hyphen.
pub fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && local.chars().all(is_local_char) && domain.split('.').all(is_domain_label)
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::initialize;
    use pretty_assertions::assert_eq;

    #[test]
    fn email_shapes() {
        for ok in [
            "a@b",
            "jane.doe@example.com",
            "x+y@sub.example.org",
            "o'brien@my-host.io",
        ] {
            assert!(is_valid_email(ok), "expected valid: {ok}");
        }
        for bad in [
            "",
            "plain",
            "@example.com",
            "a@",
            "a@b@c",
            "a b@c",
            "a@.com",
            "a@b..c",
            "a(b)@c",
            "a@-b",
            "a@b-",
            "a@b_c.com",
        ] {
            assert!(!is_valid_email(bad), "expected invalid: {bad:?}");
        }
    }

    #[test]
    fn required_fields_reported_in_order() {
        let fields = vec![
            FieldDescriptor::text("first", "First").required(),
            FieldDescriptor::section(
                "s",
                "S",
                vec![FieldDescriptor::email("mail", "Mail").required()],
            ),
            FieldDescriptor::text("optional", "Optional"),
            FieldDescriptor::checkbox("c", "C"),
        ];
        let violations = check(&fields, &initialize(&fields));
        assert_eq!(
            violations,
            vec![
                ConstraintViolation {
                    path: FieldPath::root(),
                    name: "first".into(),
                    kind: ViolationKind::ValueMissing,
                },
                ConstraintViolation {
                    path: FieldPath::from_slice(&["s"]),
                    name: "mail".into(),
                    kind: ViolationKind::ValueMissing,
                },
            ]
        );
    }

    #[test]
    fn optional_email_only_checked_when_filled() {
        let fields = vec![FieldDescriptor::email("mail", "Mail")];
        let mut values = initialize(&fields);
        assert!(check(&fields, &values).is_empty());

        values.insert("mail", FieldValue::Text("nope".into()));
        let violations = check(&fields, &values);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::TypeMismatch);
        assert_eq!(
            violations[0].to_string(),
            "mail: Please enter an email address."
        );
    }

    #[test]
    fn whitespace_counts_as_filled_for_required_text() {
        let fields = vec![FieldDescriptor::text("t", "T").required()];
        let mut values = initialize(&fields);
        values.insert("t", FieldValue::Text(" ".into()));
        assert!(check(&fields, &values).is_empty());
    }

    #[test]
    fn email_surrounding_whitespace_is_ignored() {
        let fields = vec![FieldDescriptor::email("mail", "Mail").required()];
        let mut values = initialize(&fields);

        values.insert("mail", FieldValue::Text("   ".into()));
        let violations = check(&fields, &values);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ValueMissing);

        values.insert("mail", FieldValue::Text(" a@b.c \t".into()));
        assert!(check(&fields, &values).is_empty());

        values.insert("mail", FieldValue::Text("a @b.c".into()));
        assert_eq!(check(&fields, &values)[0].kind, ViolationKind::TypeMismatch);
    }
}
