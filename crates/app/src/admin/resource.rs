//! Back-office resources.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs,
    path::Path,
};

use buckery::checkout::ValidationError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::{FilePart, FormPayload};

/// Field name of uploaded images on every resource.
pub const IMAGE_FIELD: &str = "image";

/// Image attached to a back-office form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl Debug for ImageUpload {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Image from a file name and its contents.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] for an extension that is not a
    /// web image.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        let mime = match extension.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => return Err(ValidationError::Invalid { field: IMAGE_FIELD }),
        };

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] if the file cannot be read or is
    /// not a web image.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(ValidationError::Invalid { field: IMAGE_FIELD })?;
        let bytes = fs::read(path).map_err(|_| ValidationError::Invalid { field: IMAGE_FIELD })?;

        Self::new(file_name, bytes)
    }

    /// File name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn to_part(&self) -> FilePart {
        FilePart {
            field: IMAGE_FIELD.to_string(),
            file_name: self.file_name.clone(),
            mime: self.mime.to_string(),
            bytes: self.bytes.clone(),
        }
    }
}

/// A record type managed by a [`CrudPage`](crate::admin::CrudPage).
pub trait Resource: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Editable form state.
    type Form: Clone + Default + Debug + Send + Sync;

    /// Collection path, e.g. `/products/`.
    const PATH: &'static str;

    /// Name used in logs.
    const NAME: &'static str;

    /// Record id.
    fn id(&self) -> i64;

    /// Form pre-filled with this record.
    fn to_form(&self) -> Self::Form;

    /// Validate a form and produce the fields to send, in form order.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing or malformed fields.
    fn fields(form: &Self::Form) -> Result<Vec<(&'static str, Value)>, ValidationError>;

    /// Image chosen in the form, if any.
    fn image(_form: &Self::Form) -> Option<&ImageUpload> {
        None
    }
}

/// Resources with an `is_active` switch.
pub trait Activatable: Resource {
    /// Whether the record is active.
    fn is_active(&self) -> bool;

    /// Wire value of the `is_active` field.
    fn active_value(active: bool) -> Value {
        Value::Bool(active)
    }
}

/// Request body for a create or update.
#[derive(Debug)]
pub(crate) enum Payload {
    Json(Map<String, Value>),
    Form(FormPayload),
}

impl Payload {
    /// Multipart when an image is attached, JSON otherwise.
    pub(crate) fn build(fields: Vec<(&'static str, Value)>, image: Option<&ImageUpload>) -> Self {
        let Some(image) = image else {
            return Self::Json(
                fields
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            );
        };

        let form = fields
            .into_iter()
            .fold(FormPayload::new(), |form, (name, value)| match value {
                Value::Null => form,
                Value::String(text) => form.text(name, text),
                other => form.text(name, other.to_string()),
            });

        Self::Form(form.file(image.to_part()))
    }
}

/// Trimmed text, or a missing-field entry.
pub(crate) fn required(
    missing: &mut Vec<&'static str>,
    field: &'static str,
    value: &str,
) -> Value {
    let value = value.trim();

    if value.is_empty() {
        missing.push(field);
    }

    Value::String(value.to_string())
}

/// Trimmed text, or `null` when blank.
pub(crate) fn optional(value: &str) -> Value {
    match value.trim() {
        "" => Value::Null,
        value => Value::String(value.to_string()),
    }
}

/// Whole number, `0` when blank.
pub(crate) fn integer(field: &'static str, value: &str) -> Result<Value, ValidationError> {
    match value.trim() {
        "" => Ok(Value::from(0)),
        value => value
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| ValidationError::Invalid { field }),
    }
}

pub(crate) fn finish(
    missing: Vec<&'static str>,
    fields: Vec<(&'static str, Value)>,
) -> Result<Vec<(&'static str, Value)>, ValidationError> {
    if missing.is_empty() {
        Ok(fields)
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}
