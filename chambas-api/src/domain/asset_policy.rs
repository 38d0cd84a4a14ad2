//! Per-file validation policy for uploaded image assets.
//!
//! Pure and synchronous: no network or disk access. Validation is per-file;
//! a rejection excludes that file from its batch and never fails the batch.

use std::fmt;

use thiserror::Error;

use crate::domain::models::CandidateFile;

/// Policy bucket determining allowed content types and the size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Avatar,
    ListingImage,
}

impl AssetClass {
    fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            Self::Avatar => &["image/jpeg", "image/png"],
            Self::ListingImage => &["image/jpeg", "image/png", "image/webp"],
        }
    }

    fn max_bytes(&self) -> usize {
        match self {
            Self::Avatar => MAX_AVATAR_BYTES,
            Self::ListingImage => MAX_LISTING_IMAGE_BYTES,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avatar => write!(f, "avatar"),
            Self::ListingImage => write!(f, "listing image"),
        }
    }
}

pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;
pub const MAX_LISTING_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_IMAGES_PER_LISTING: usize = 5;

/// Why a candidate file was rejected. Identifies the failed constraint so
/// the caller can resubmit a different file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("content type `{content_type}` is not allowed for {asset_class} uploads")]
    UnsupportedContentType {
        asset_class: AssetClass,
        content_type: String,
    },
    #[error("file is {size} bytes, over the {limit}-byte {asset_class} limit")]
    TooLarge {
        asset_class: AssetClass,
        size: usize,
        limit: usize,
    },
}

/// Accept or reject a candidate file for the given asset class.
pub fn validate(file: &CandidateFile, asset_class: AssetClass) -> Result<(), RejectionReason> {
    if !asset_class
        .allowed_content_types()
        .contains(&file.content_type.as_str())
    {
        return Err(RejectionReason::UnsupportedContentType {
            asset_class,
            content_type: file.content_type.clone(),
        });
    }

    let limit = asset_class.max_bytes();
    if file.size() > limit {
        return Err(RejectionReason::TooLarge {
            asset_class,
            size: file.size(),
            limit,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> CandidateFile {
        CandidateFile::new(name, content_type, vec![0u8; size])
    }

    #[test]
    fn accepts_jpeg_avatar_within_limit() {
        let f = file("me.jpg", "image/jpeg", 1024);
        assert!(validate(&f, AssetClass::Avatar).is_ok());
    }

    #[test]
    fn accepts_avatar_at_exact_limit() {
        let f = file("me.png", "image/png", MAX_AVATAR_BYTES);
        assert!(validate(&f, AssetClass::Avatar).is_ok());
    }

    #[test]
    fn rejects_oversized_avatar() {
        let f = file("me.png", "image/png", MAX_AVATAR_BYTES + 1);
        assert!(matches!(
            validate(&f, AssetClass::Avatar),
            Err(RejectionReason::TooLarge { .. })
        ));
    }

    #[test]
    fn rejects_webp_avatar() {
        // webp is allowed for listing images but not avatars.
        let f = file("me.webp", "image/webp", 1024);
        assert!(matches!(
            validate(&f, AssetClass::Avatar),
            Err(RejectionReason::UnsupportedContentType { .. })
        ));
    }

    #[test]
    fn accepts_webp_listing_image() {
        let f = file("work.webp", "image/webp", 1024);
        assert!(validate(&f, AssetClass::ListingImage).is_ok());
    }

    #[test]
    fn rejects_gif_listing_image() {
        let f = file("anim.gif", "image/gif", 1024);
        assert!(matches!(
            validate(&f, AssetClass::ListingImage),
            Err(RejectionReason::UnsupportedContentType { .. })
        ));
    }

    #[test]
    fn rejects_listing_image_over_five_mib() {
        let f = file("big.jpg", "image/jpeg", MAX_LISTING_IMAGE_BYTES + 1);
        assert!(matches!(
            validate(&f, AssetClass::ListingImage),
            Err(RejectionReason::TooLarge { .. })
        ));
    }

    #[test]
    fn rejection_reason_names_the_constraint() {
        let f = file("anim.gif", "image/gif", 10);
        let reason = validate(&f, AssetClass::ListingImage).unwrap_err();
        assert!(reason.to_string().contains("image/gif"));

        let f = file("big.png", "image/png", MAX_AVATAR_BYTES + 1);
        let reason = validate(&f, AssetClass::Avatar).unwrap_err();
        assert!(reason.to_string().contains("limit"));
    }
}
