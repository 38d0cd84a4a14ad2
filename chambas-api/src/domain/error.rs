use thiserror::Error;

use crate::domain::asset_policy::RejectionReason;

/// Errors from listing operations.
///
/// `CreateFailed` is fatal: nothing was persisted and the record store's
/// message passes through verbatim. Image-attach problems are deliberately
/// NOT an error here; a listing without images is a valid terminal state and
/// is reported as a success with a warning (see `CreateListingOutcome`).
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    CreateFailed(String),
    #[error("listing not found")]
    NotFound,
    #[error("listing does not belong to the caller")]
    NotOwner,
    #[error("{0}")]
    Storage(String),
}

/// Errors from avatar replacement. Variants distinguish which phase of the
/// replacement failed, because "nothing happened" and "partially happened"
/// need different caller guidance.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("{0}")]
    Rejected(RejectionReason),
    /// The previous avatar could not be removed; the new file was never
    /// uploaded, so no second avatar generation exists.
    #[error("failed to remove previous avatar: {0}")]
    CleanupFailed(String),
    #[error("avatar upload failed: {0}")]
    UploadFailed(String),
    /// The new object exists in storage but the profile row was not
    /// updated. The caller may retry the link step idempotently.
    #[error("avatar uploaded to {public_url} but profile update failed: {message}")]
    LinkUpdateFailed { public_url: String, message: String },
    #[error("profile not found")]
    NotFound,
    #[error("{0}")]
    Storage(String),
}
