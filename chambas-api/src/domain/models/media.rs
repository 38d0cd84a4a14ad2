use serde::Serialize;

use crate::domain::asset_policy::RejectionReason;

/// A candidate image file as received from the caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
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

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Extension from the original filename suffix, falling back to the
    /// content-type subtype when the name has none.
    pub fn extension(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
            _ => match self.content_type.as_str() {
                "image/jpeg" => "jpg",
                "image/png" => "png",
                "image/webp" => "webp",
                _ => "bin",
            },
        }
    }
}

/// Result of one successful object upload. Transient: folded into
/// `Listing::image_urls` or `Profile::avatar_url`, never persisted itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub storage_path: String,
    pub public_url: String,
}

/// A file excluded from a batch by validation, with the reason surfaced
/// to the caller. Never fatal to the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedFile {
    pub file_name: String,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: RejectionReason,
}

fn serialize_reason<S: serde::Serializer>(
    reason: &RejectionReason,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&reason.to_string())
}
