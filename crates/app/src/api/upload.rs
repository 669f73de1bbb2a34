//! Multipart uploads.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use reqwest::multipart::{Form, Part};

use crate::api::ApiError;

/// A file attached to a multipart request.
#[derive(Clone)]
pub struct FilePart {
    /// Form field name
    pub field: String,

    /// File name sent to the server
    pub file_name: String,

    /// MIME type
    pub mime: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl Debug for FilePart {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Text fields and files for a `multipart/form-data` request.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    text: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl FormPayload {
    /// Empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }

    /// Add a file.
    #[must_use]
    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// Text fields in insertion order.
    pub fn text_fields(&self) -> &[(String, String)] {
        &self.text
    }

    /// Attached files.
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();

        for (name, value) in self.text {
            form = form.text(name, value);
        }

        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)
                .map_err(|error| ApiError::InvalidRequest(format!("bad mime type: {error}")))?;

            form = form.part(file.field, part);
        }

        Ok(form)
    }
}
