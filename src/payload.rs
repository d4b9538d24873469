//! File payloads and the pending items built from them.

use std::path::Path;

use bytes::Bytes;

use crate::error::{DriveError, Result};
use crate::models::format_size;

/// Icons shown next to files, keyed by lowercase extension.
const FILE_ICONS: &[(&str, &str)] = &[
    ("pdf", "📕"),
    ("doc", "📄"),
    ("docx", "📄"),
    ("xls", "📊"),
    ("xlsx", "📊"),
    ("ppt", "📽️"),
    ("pptx", "📽️"),
    ("zip", "📦"),
    ("rar", "📦"),
    ("txt", "📜"),
    ("mp4", "🎬"),
    ("avi", "🎥"),
];

const DEFAULT_ICON: &str = "📂";

/// The bytes of one file together with the name and type it is uploaded under.
#[derive(Debug, Clone)]
pub struct Payload {
    name: String,
    mime_type: String,
    bytes: Bytes,
}

impl Payload {
    /// Create a payload from in-memory bytes; the MIME type is guessed from `name`.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Read a local file into a payload.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DriveError::FileNotFound(path.display().to_string()))?
            .to_string();
        let content = std::fs::read(path)?;
        Ok(Self::new(name, content))
    }

    /// Override the guessed MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A selected file awaiting upload.
#[derive(Debug, Clone)]
pub struct PendingItem {
    pub payload: Payload,
    pub preview_url: Option<String>,
}

impl PendingItem {
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            preview_url: None,
        }
    }

    /// Read a local file; images get a `file://` preview URL.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let payload = Payload::from_path(path)?;
        let preview_url = if is_image(payload.mime_type()) {
            let absolute = std::fs::canonicalize(path)?;
            Some(format!("file://{}", absolute.display()))
        } else {
            None
        };
        Ok(Self {
            payload,
            preview_url,
        })
    }
}

impl From<Payload> for PendingItem {
    fn from(payload: Payload) -> Self {
        Self::new(payload)
    }
}

impl std::fmt::Display for PendingItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({})",
            file_icon(self.payload.name()),
            self.payload.name(),
            format_size(self.payload.len())
        )
    }
}

/// Whether a MIME type denotes an image.
pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Icon for a file name, chosen by extension.
pub fn file_icon(name: &str) -> &'static str {
    let extension = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return DEFAULT_ICON,
    };
    FILE_ICONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
