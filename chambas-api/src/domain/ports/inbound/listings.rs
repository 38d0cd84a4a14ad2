use async_trait::async_trait;

use crate::domain::{
    models::{
        CandidateFile, Listing, ListingFilter, ListingId, ListingPatch, NewListing, RejectedFile,
        UserId,
    },
    ListingError,
};

/// Outcome of a listing creation. The listing is created once the record
/// insert succeeds; image problems are carried as a warning, never as an
/// error, because a listing without images is a valid terminal state.
#[derive(Debug)]
pub struct CreateListingOutcome {
    pub listing: Listing,
    /// Files dropped by validation, with per-file reasons.
    pub rejected_files: Vec<RejectedFile>,
    /// Present when one or more uploads, or the image-URL patch, failed
    /// after the record was created.
    pub image_warning: Option<String>,
}

#[async_trait]
pub trait ListingService: Send + Sync + 'static {
    /// Create a listing with up to five candidate image files attached.
    async fn create_listing(
        &self,
        author: &UserId,
        form: NewListing,
        files: Vec<CandidateFile>,
    ) -> Result<CreateListingOutcome, ListingError>;

    async fn get_listing(&self, id: &ListingId) -> Result<Listing, ListingError>;

    async fn browse_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, ListingError>;

    /// Owner-checked partial edit.
    async fn update_listing(
        &self,
        caller: &UserId,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, ListingError>;

    /// Owner-checked delete, followed by best-effort removal of the
    /// listing's stored image objects.
    async fn delete_listing(&self, caller: &UserId, id: &ListingId) -> Result<(), ListingError>;
}
