use async_trait::async_trait;

use crate::domain::models::{Profile, UserId};

use super::RecordStoreError;

/// Record-store gateway for the `profiles` table.
#[async_trait]
pub trait ProfileRepository: Send + Sync + 'static {
    async fn find(&self, id: &UserId) -> Result<Option<Profile>, RecordStoreError>;

    /// Set the current avatar URL, creating the profile row on first
    /// upload. Idempotent: repeating the same URL leaves the same state.
    async fn update_avatar_url(&self, id: &UserId, url: &str) -> Result<(), RecordStoreError>;
}
