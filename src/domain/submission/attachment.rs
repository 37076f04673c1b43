//! Uploaded file value object.

use sha2::{Digest, Sha256};

/// A single uploaded file.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    mime_type: String,
    content: Vec<u8>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Client-supplied file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Declared MIME type, as received.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Lowercase `type/subtype` without parameters.
    pub fn mime_essence(&self) -> String {
        self.mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Hex-encoded SHA-256 of the content.
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(&self.content))
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}
