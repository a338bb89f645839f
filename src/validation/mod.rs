//! # Request Validation
//!
//! Incoming create/update payloads are normalized into [`RawAttributes`], checked
//! field by field, and reduced to the entity's allowed attribute set. Failures are
//! collected per field in [`ValidationErrors`] so callers can return field-level
//! feedback. Uploaded logos are stored and swapped for their public URL here, before
//! anything reaches a repository.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use crate::storage::UploadedFile;

pub mod company;
pub mod employee;

/// Maximum length of string columns
pub const MAX_STRING_LEN: usize = 255;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern is a valid regex")
});

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Returns `value` when no errors were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// `{"errors": {"field": ["message", ...]}}`
    pub fn to_json(&self) -> Value {
        json!({ "errors": self.errors })
    }
}

/// A request payload normalized to text attributes plus uploaded files.
///
/// Strings are trimmed and empty strings become null. Values that cannot be
/// represented as text (arrays, objects) are remembered as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttributes {
    fields: BTreeMap<String, Option<String>>,
    malformed: BTreeSet<String>,
    files: BTreeMap<String, UploadedFile>,
}

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build attributes from a JSON object body.
    ///
    /// Returns `None` when the body is not a JSON object.
    pub fn from_json(body: Value) -> Option<Self> {
        let Value::Object(map) = body else {
            return None;
        };

        let mut attributes = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => attributes.insert_null(key),
                Value::String(text) => attributes.insert_text(key, text),
                Value::Number(number) => attributes.insert_text(key, number.to_string()),
                Value::Bool(flag) => attributes.insert_text(key, if flag { "1" } else { "0" }),
                Value::Array(_) | Value::Object(_) => {
                    attributes.malformed.insert(key);
                }
            }
        }
        Some(attributes)
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let trimmed = value.as_ref().trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.fields.insert(key.into(), value);
    }

    pub fn insert_null(&mut self, key: impl Into<String>) {
        self.fields.insert(key.into(), None);
    }

    pub fn insert_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.insert(key.into(), file);
    }

    /// Whether the caller supplied `key` in any form
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.files.contains_key(key) || self.malformed.contains(key)
    }

    /// Text value of `key`; `None` when absent or null
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|value| value.as_deref())
    }

    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key)
    }

    fn is_malformed(&self, key: &str) -> bool {
        self.malformed.contains(key)
    }
}

/// Whether a field must be present or is checked only when supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Create: must be present and non-empty
    Required,
    /// Create: may be absent or null
    Nullable,
    /// Update: checked only when supplied, may not be cleared
    SometimesRequired,
    /// Update: checked only when supplied, may be cleared
    SometimesNullable,
}

/// Expected shape of a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    PositiveInteger,
}

/// Outcome of checking a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checked {
    /// Field not supplied
    Absent,
    /// Field supplied as null or empty
    Cleared,
    Value(String),
}

impl Checked {
    /// For creates: the value, or `None` when absent or cleared
    pub fn into_option(self) -> Option<String> {
        match self {
            Checked::Value(value) => Some(value),
            Checked::Absent | Checked::Cleared => None,
        }
    }

    /// For partial updates: `None` when absent, `Some(None)` when cleared
    pub fn into_change(self) -> Option<Option<String>> {
        match self {
            Checked::Absent => None,
            Checked::Cleared => Some(None),
            Checked::Value(value) => Some(Some(value)),
        }
    }
}

/// Check one text field of `input`, recording failures in `errors`.
pub fn check_field(
    input: &RawAttributes,
    errors: &mut ValidationErrors,
    field: &str,
    presence: Presence,
    kind: FieldKind,
) -> Checked {
    let label = field.replace('_', " ");

    if input.is_malformed(field) || input.file(field).is_some() {
        errors.add(field, format!("The {label} field must be a string."));
        return Checked::Absent;
    }

    let supplied = input.has(field);
    let value = match (input.text(field), supplied, presence) {
        (Some(value), _, _) => value,
        (None, false, Presence::SometimesRequired | Presence::SometimesNullable) => {
            return Checked::Absent;
        }
        (None, false, Presence::Nullable) => return Checked::Absent,
        (None, _, Presence::Required | Presence::SometimesRequired) => {
            errors.add(field, format!("The {label} field is required."));
            return Checked::Absent;
        }
        (None, true, Presence::Nullable | Presence::SometimesNullable) => {
            return Checked::Cleared;
        }
    };

    if value.chars().count() > MAX_STRING_LEN {
        errors.add(
            field,
            format!("The {label} field must not be greater than {MAX_STRING_LEN} characters."),
        );
        return Checked::Absent;
    }

    let valid = match kind {
        FieldKind::Text => true,
        FieldKind::Email => EMAIL_PATTERN.is_match(value),
        FieldKind::Url => is_http_url(value),
        FieldKind::PositiveInteger => value.parse::<i32>().is_ok_and(|n| n > 0),
    };

    if !valid {
        let message = match kind {
            FieldKind::Email => format!("The {label} field must be a valid email address."),
            FieldKind::Url => format!("The {label} field must be a valid URL."),
            FieldKind::PositiveInteger => format!("The {label} field must be a positive integer."),
            FieldKind::Text => format!("The {label} field is invalid."),
        };
        errors.add(field, message);
        return Checked::Absent;
    }

    Checked::Value(value.to_string())
}

/// Outcome of checking an image upload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckedUpload {
    Absent,
    /// Supplied as null or empty text
    Cleared,
    File(UploadedFile),
}

/// Check an optional image upload under `field`.
pub fn check_image(
    input: &RawAttributes,
    errors: &mut ValidationErrors,
    field: &str,
    max_bytes: usize,
) -> CheckedUpload {
    if let Some(file) = input.file(field) {
        if file.image_extension().is_none() {
            errors.add(field, format!("The {field} field must be an image."));
            return CheckedUpload::Absent;
        }
        if file.bytes.is_empty() {
            errors.add(field, format!("The {field} field failed to upload."));
            return CheckedUpload::Absent;
        }
        if file.bytes.len() > max_bytes {
            errors.add(
                field,
                format!(
                    "The {field} field must not be greater than {} kilobytes.",
                    max_bytes / 1024
                ),
            );
            return CheckedUpload::Absent;
        }
        return CheckedUpload::File(file.clone());
    }

    if input.is_malformed(field) || input.text(field).is_some() {
        errors.add(field, format!("The {field} field must be an image."));
        return CheckedUpload::Absent;
    }

    if input.has(field) {
        CheckedUpload::Cleared
    } else {
        CheckedUpload::Absent
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(body: Value) -> RawAttributes {
        RawAttributes::from_json(body).unwrap()
    }

    #[test]
    fn json_values_are_normalized() {
        let input = attrs(json!({
            "name": "  Acme  ",
            "website": "",
            "company_id": 4,
            "logo": null,
            "tags": ["a"],
        }));

        assert_eq!(input.text("name"), Some("Acme"));
        assert_eq!(input.text("website"), None);
        assert!(input.has("website"));
        assert_eq!(input.text("company_id"), Some("4"));
        assert!(input.has("logo"));
        assert!(input.has("tags"));
        assert!(!input.has("email"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(RawAttributes::from_json(json!(["name"])).is_none());
        assert!(RawAttributes::from_json(json!("name")).is_none());
    }

    #[test]
    fn required_field_missing_or_blank() {
        let mut errors = ValidationErrors::new();
        let input = attrs(json!({"email": "   "}));

        check_field(&input, &mut errors, "name", Presence::Required, FieldKind::Text);
        check_field(&input, &mut errors, "email", Presence::Required, FieldKind::Email);

        assert_eq!(errors.get("name").unwrap()[0], "The name field is required.");
        assert_eq!(errors.get("email").unwrap()[0], "The email field is required.");
    }

    #[test]
    fn sometimes_fields_skip_when_absent() {
        let mut errors = ValidationErrors::new();
        let input = attrs(json!({"website": null}));

        let name = check_field(
            &input,
            &mut errors,
            "name",
            Presence::SometimesRequired,
            FieldKind::Text,
        );
        let website = check_field(
            &input,
            &mut errors,
            "website",
            Presence::SometimesNullable,
            FieldKind::Url,
        );

        assert!(errors.is_empty());
        assert_eq!(name.into_change(), None);
        assert_eq!(website.into_change(), Some(None));
    }

    #[test]
    fn sometimes_required_cannot_be_cleared() {
        let mut errors = ValidationErrors::new();
        let input = attrs(json!({"name": ""}));

        check_field(
            &input,
            &mut errors,
            "name",
            Presence::SometimesRequired,
            FieldKind::Text,
        );

        assert!(errors.get("name").is_some());
    }

    #[test]
    fn email_format() {
        for (candidate, ok) in [
            ("a@acme.test", true),
            ("first.last@sub.example.org", true),
            ("no-at-sign.test", false),
            ("two@@acme.test", false),
            ("spaces in@acme.test", false),
            ("missing@tld", false),
        ] {
            let mut errors = ValidationErrors::new();
            let input = attrs(json!({ "email": candidate }));
            check_field(&input, &mut errors, "email", Presence::Required, FieldKind::Email);
            assert_eq!(errors.is_empty(), ok, "{candidate}");
        }
    }

    #[test]
    fn url_and_integer_kinds() {
        let mut errors = ValidationErrors::new();
        let input = attrs(json!({
            "website": "ftp://acme.test",
            "company_id": "-3",
        }));

        check_field(&input, &mut errors, "website", Presence::Nullable, FieldKind::Url);
        check_field(
            &input,
            &mut errors,
            "company_id",
            Presence::Required,
            FieldKind::PositiveInteger,
        );

        assert_eq!(
            errors.get("website").unwrap()[0],
            "The website field must be a valid URL."
        );
        assert_eq!(
            errors.get("company_id").unwrap()[0],
            "The company id field must be a positive integer."
        );
    }

    #[test]
    fn over_long_values_are_rejected() {
        let mut errors = ValidationErrors::new();
        let input = attrs(json!({"name": "x".repeat(MAX_STRING_LEN + 1)}));

        check_field(&input, &mut errors, "name", Presence::Required, FieldKind::Text);

        assert!(errors.get("name").unwrap()[0].contains("255"));
    }

    #[test]
    fn image_upload_checks() {
        let mut input = RawAttributes::new();
        input.insert_file(
            "logo",
            UploadedFile {
                file_name: Some("notes.txt".to_string()),
                content_type: Some("text/plain".to_string()),
                bytes: b"hello".to_vec(),
            },
        );
        let mut errors = ValidationErrors::new();
        assert_eq!(check_image(&input, &mut errors, "logo", 1024), CheckedUpload::Absent);
        assert_eq!(errors.get("logo").unwrap()[0], "The logo field must be an image.");

        let mut input = RawAttributes::new();
        input.insert_file(
            "logo",
            UploadedFile {
                file_name: Some("logo.svg".to_string()),
                content_type: Some("image/svg+xml".to_string()),
                bytes: b"<svg onload=\"alert(1)\"/>".to_vec(),
            },
        );
        let mut errors = ValidationErrors::new();
        assert_eq!(check_image(&input, &mut errors, "logo", 1024), CheckedUpload::Absent);
        assert_eq!(errors.get("logo").unwrap()[0], "The logo field must be an image.");

        let mut input = RawAttributes::new();
        input.insert_file(
            "logo",
            UploadedFile {
                file_name: Some("big.png".to_string()),
                content_type: Some("image/png".to_string()),
                bytes: vec![0; 2048],
            },
        );
        let mut errors = ValidationErrors::new();
        check_image(&input, &mut errors, "logo", 1024);
        assert_eq!(
            errors.get("logo").unwrap()[0],
            "The logo field must not be greater than 1 kilobytes."
        );
    }

    #[test]
    fn text_in_image_field_is_rejected() {
        let input = attrs(json!({"logo": "data:image/png;base64,AAAA"}));
        let mut errors = ValidationErrors::new();

        check_image(&input, &mut errors, "logo", 1024);

        assert!(errors.get("logo").is_some());
    }

    #[test]
    fn errors_render_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "The name field is required.");

        assert_eq!(
            errors.to_json(),
            json!({"errors": {"name": ["The name field is required."]}})
        );
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
    }
}
