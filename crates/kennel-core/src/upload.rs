//! Uploaded image files: accepted content types and stored-name generation.
//!
//! The client-declared content type is the only file-type gate; the bytes
//! themselves are never inspected.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use crate::DogId;

// ---------------------------------------------------------------------------
// ImageContentType
// ---------------------------------------------------------------------------

/// Image content types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageContentType {
    Jpeg,
    Png,
}

impl ImageContentType {
    /// Match a declared MIME type. The comparison is exact and case-sensitive.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Guess the content type of a stored file from its extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// The canonical MIME string.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

// ---------------------------------------------------------------------------
// UploadedFile
// ---------------------------------------------------------------------------

/// A file part received with a form submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name of the file on the client machine (may be empty).
    pub file_name: String,
    /// Client-declared MIME type.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    /// A file input left blank still submits a part with no name and no bytes.
    pub fn is_blank(&self) -> bool {
        self.file_name.is_empty() && self.data.is_empty()
    }

    /// The accepted image type, if the declared content type is one.
    pub fn image_type(&self) -> Option<ImageContentType> {
        self.content_type.as_deref().and_then(ImageContentType::from_mime)
    }

    /// Lowercased extension of the client file name, including the dot.
    ///
    /// Returns an empty string when the name has no extension.
    pub fn extension(&self) -> String {
        // Browsers on Windows may send a full path; only the last segment counts.
        let last = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        // A leading dot still starts an extension (".PNG" -> ".png").
        match last.rfind('.') {
            Some(dot) if dot + 1 < last.len() => last[dot..].to_lowercase(),
            _ => String::new(),
        }
    }
}

/// Build the name an upload is stored under: `{dog_id}_{uuid}{ext}`.
pub fn stored_file_name(dog_id: DogId, upload: &UploadedFile) -> String {
    format!("{}_{}{}", dog_id, Uuid::new_v4(), upload.extension())
}
