use async_trait::async_trait;

use crate::domain::models::{Listing, ListingFilter, ListingId, ListingPatch, NewListing, UserId};

use super::RecordStoreError;

/// Record-store gateway for the `listings` table. Every call either
/// succeeds or fails with the backing store's message; no implicit retries.
#[async_trait]
pub trait ListingRepository: Send + Sync + 'static {
    /// Insert a listing with `image_urls` defaulted to empty and status
    /// `active`, owned by `author`.
    async fn insert(&self, author: &UserId, new: &NewListing) -> Result<Listing, RecordStoreError>;

    async fn find(&self, id: &ListingId) -> Result<Option<Listing>, RecordStoreError>;

    /// Filtered browse, newest first.
    async fn browse(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RecordStoreError>;

    /// Replace the image URL array wholesale.
    async fn update_images(
        &self,
        id: &ListingId,
        urls: &[String],
    ) -> Result<(), RecordStoreError>;

    /// Apply an owner edit and return the updated row.
    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> Result<Listing, RecordStoreError>;

    async fn delete(&self, id: &ListingId) -> Result<(), RecordStoreError>;
}
