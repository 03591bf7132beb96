use std::fmt::{Display, Formatter, Result as FmtResult};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{CONTENT_FILE_FIELD, TONE_FILE_FIELD};

/// Logical role of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// Reference whose stylistic register is the target style
    Tone,
    /// Document whose substance is kept but restyled
    Content,
}

impl FileRole {
    /// Role carried by a multipart field, if the field is one of ours.
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            TONE_FILE_FIELD => Some(FileRole::Tone),
            CONTENT_FILE_FIELD => Some(FileRole::Content),
            _ => None,
        }
    }
}

impl Display for FileRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileRole::Tone => f.write_str("Tone file"),
            FileRole::Content => f.write_str("Content file"),
        }
    }
}

/// An upload as received from the transport. Never persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub role: FileRole,
    pub data: Bytes,
    /// Media type declared by the client, if any
    pub content_type: Option<String>,
    /// Size as declared by the transport; equals `data.len()`
    pub declared_size: u64,
    pub filename: Option<String>,
}

impl UploadedFile {
    pub fn new(role: FileRole, data: impl Into<Bytes>, content_type: Option<String>) -> Self {
        let data = data.into();
        let declared_size = data.len() as u64;
        Self {
            role,
            data,
            content_type,
            declared_size,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Declared media type without parameters, lowercased.
    ///
    /// Falls back to `application/octet-stream` when the client declared nothing.
    pub fn media_type(&self) -> String {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_lowercase())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }
}
