use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::StoredObject;

/// The two logical buckets the marketplace stores media in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Avatars,
    Listings,
}

impl Bucket {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Avatars => "avatars",
            Self::Listings => "listings",
        }
    }
}

/// An object discovered by a prefix listing, addressed by its full path
/// within the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub path: String,
}

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("removal failed: {0}")]
    Removal(String),
    #[error("listing objects failed: {0}")]
    List(String),
}

/// Gateway over the object store. No business rules and no retries: each
/// call maps to one store operation and surfaces the store's own message
/// on failure.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Upload `bytes` at `path`. The store writes atomically; a failure
    /// never leaves a visible partial object.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, ObjectStoreError>;

    /// Remove all `paths` in one call (all-or-nothing per call). Trivially
    /// succeeds when `paths` is empty.
    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<(), ObjectStoreError>;

    /// List objects whose path starts with `prefix` (a folder path ending
    /// in `/`).
    async fn list(&self, bucket: Bucket, prefix: &str)
        -> Result<Vec<ObjectEntry>, ObjectStoreError>;

    /// Deterministic public URL for an object path. Pure derivation.
    fn public_url(&self, bucket: Bucket, path: &str) -> String;
}
