//! Transport-neutral form payloads.
//!
//! Domain crates describe multipart submissions with [`FormData`]; the client
//! crate turns them into a real `multipart/form-data` body.

use serde::{Deserialize, Serialize};

/// A file selected for upload (document scan, vehicle photo, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Ordered text fields plus named file parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    text: Vec<(String, String)>,
    files: Vec<(String, Upload)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field. Blank values are skipped.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.text.push((name.to_string(), value));
        }
        self
    }

    /// Append a text field only when a value is present.
    pub fn text_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.text(name, v.to_string()),
            None => self,
        }
    }

    pub fn file(mut self, name: &str, upload: Upload) -> Self {
        self.files.push((name.to_string(), upload));
        self
    }

    pub fn file_opt(self, name: &str, upload: Option<Upload>) -> Self {
        match upload {
            Some(u) => self.file(name, u),
            None => self,
        }
    }

    pub fn text_fields(&self) -> &[(String, String)] {
        &self.text
    }

    pub fn files(&self) -> &[(String, Upload)] {
        &self.files
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn into_parts(self) -> (Vec<(String, String)>, Vec<(String, Upload)>) {
        (self.text, self.files)
    }
}
