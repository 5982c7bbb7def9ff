//! Form submissions assembled from view fields.
//!
//! A [`FormSubmission`] is transient: it lives from the moment an action reads
//! its bound view until the request body is built. The confirmation password
//! never leaves this module; every encoder strips it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Field that only exists to double-check the password client-side.
pub const CONFIRM_PASSWORD_FIELD: &str = "confirm_password";

/// File selected in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name reported to the backend.
    pub file_name: String,
    /// MIME type sent with the multipart part.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Build an upload from its parts.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Whether the input holds no data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Field values captured from one form.
///
/// # Examples
/// ```
/// use frontend::domain::FormSubmission;
///
/// let form = FormSubmission::new()
///     .with_field("email", " ada@gmail.com ")
///     .with_field("confirm_password", "secret");
/// assert_eq!(form.value("email"), "ada@gmail.com");
/// assert!(form.url_encoded_pairs().iter().all(|(name, _)| name != "confirm_password"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, FileUpload>,
}

impl FormSubmission {
    /// Create an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`FormSubmission::insert`].
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style [`FormSubmission::insert_file`].
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, upload: FileUpload) -> Self {
        self.insert_file(name, upload);
        self
    }

    /// Set a field value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Attach a file upload.
    pub fn insert_file(&mut self, name: impl Into<String>, upload: FileUpload) {
        self.files.insert(name.into(), upload);
    }

    /// Raw value as typed by the user.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Trimmed value, or an empty string when the field is absent.
    pub fn value(&self, name: &str) -> &str {
        self.raw(name).map(str::trim).unwrap_or_default()
    }

    /// Whether the field is absent or whitespace only.
    pub fn is_blank(&self, name: &str) -> bool {
        self.value(name).is_empty()
    }

    /// Selected file for a file input, ignoring empty selections.
    pub fn file(&self, name: &str) -> Option<&FileUpload> {
        self.files.get(name).filter(|upload| !upload.is_empty())
    }

    /// Drop every listed field whose value is blank so the backend keeps its
    /// stored value.
    pub fn drop_blank(&mut self, names: &[&str]) {
        for name in names {
            if self.is_blank(name) {
                self.fields.remove(*name);
            }
        }
    }

    /// Field names in submission order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn transmitted_fields(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields
            .iter()
            .filter(|(name, _)| name.as_str() != CONFIRM_PASSWORD_FIELD)
    }

    /// Name/value pairs for `application/x-www-form-urlencoded` bodies.
    pub fn url_encoded_pairs(&self) -> Vec<(String, String)> {
        self.transmitted_fields()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// JSON object for `application/json` bodies.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .transmitted_fields()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        Value::Object(object)
    }

    /// Text and file parts for multipart bodies.
    pub fn multipart_parts(&self) -> (Vec<(String, String)>, Vec<(String, FileUpload)>) {
        let files = self
            .files
            .iter()
            .filter(|(_, upload)| !upload.is_empty())
            .map(|(name, upload)| (name.clone(), upload.clone()))
            .collect();
        (self.url_encoded_pairs(), files)
    }
}
