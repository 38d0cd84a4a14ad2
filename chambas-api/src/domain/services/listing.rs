use std::sync::Arc;

use async_trait::async_trait;
use futures::future;

use crate::domain::{
    asset_policy::{self, AssetClass, MAX_IMAGES_PER_LISTING},
    models::{
        CandidateFile, Listing, ListingFilter, ListingId, ListingPatch, NewListing, RejectedFile,
        UserId,
    },
    ports::{
        inbound::{CreateListingOutcome, ListingService},
        outbound::{Bucket, ListingRepository, ObjectStore},
    },
    ListingError,
};

use super::paths;

/// Orchestrates "create a listing with N images" as an ordered,
/// partially-recoverable sequence. The record insert is the durable commit
/// point; image uploads are best-effort follow-ups that degrade to a
/// warning, never to a rollback.
pub struct ListingServiceImpl<L, S> {
    listings: Arc<L>,
    store: Arc<S>,
}

impl<L, S> ListingServiceImpl<L, S> {
    pub fn new(listings: Arc<L>, store: Arc<S>) -> Self {
        Self { listings, store }
    }
}

#[async_trait]
impl<L: ListingRepository, S: ObjectStore> ListingService for ListingServiceImpl<L, S> {
    async fn create_listing(
        &self,
        author: &UserId,
        form: NewListing,
        files: Vec<CandidateFile>,
    ) -> Result<CreateListingOutcome, ListingError> {
        form.validate().map_err(ListingError::Invalid)?;

        if files.len() > MAX_IMAGES_PER_LISTING {
            return Err(ListingError::Invalid(format!(
                "a listing can carry at most {MAX_IMAGES_PER_LISTING} images"
            )));
        }

        // Per-file gate: rejected files are dropped from the batch with
        // their reasons surfaced; the rest proceed.
        let mut accepted = Vec::new();
        let mut rejected_files = Vec::new();
        for file in files {
            match asset_policy::validate(&file, AssetClass::ListingImage) {
                Ok(()) => accepted.push(file),
                Err(reason) => {
                    tracing::info!(file_name = %file.file_name, %reason, "dropping rejected file");
                    rejected_files.push(RejectedFile {
                        file_name: file.file_name,
                        reason,
                    });
                }
            }
        }

        // Durable commit point. On failure nothing else is attempted and
        // the record store's message passes through verbatim.
        let mut listing = self
            .listings
            .insert(author, &form)
            .await
            .map_err(|err| ListingError::CreateFailed(err.0))?;

        tracing::info!(listing_id = %listing.id, author = %author, "listing created");

        if accepted.is_empty() {
            return Ok(CreateListingOutcome {
                listing,
                rejected_files,
                image_warning: None,
            });
        }

        let image_warning = match self.attach_images(author, &listing.id, accepted).await {
            Ok(urls) => {
                listing.image_urls = urls;
                None
            }
            Err(warning) => {
                tracing::warn!(listing_id = %listing.id, warning, "image attachment failed");
                Some(warning)
            }
        };

        Ok(CreateListingOutcome {
            listing,
            rejected_files,
            image_warning,
        })
    }

    async fn get_listing(&self, id: &ListingId) -> Result<Listing, ListingError> {
        self.listings
            .find(id)
            .await
            .map_err(|err| ListingError::Storage(err.0))?
            .ok_or(ListingError::NotFound)
    }

    async fn browse_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, ListingError> {
        self.listings
            .browse(&filter)
            .await
            .map_err(|err| ListingError::Storage(err.0))
    }

    async fn update_listing(
        &self,
        caller: &UserId,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, ListingError> {
        patch.validate().map_err(ListingError::Invalid)?;

        let listing = self.get_listing(id).await?;
        if listing.author_id != *caller {
            return Err(ListingError::NotOwner);
        }

        if patch.is_empty() {
            return Ok(listing);
        }

        self.listings
            .update(id, &patch)
            .await
            .map_err(|err| ListingError::Storage(err.0))
    }

    async fn delete_listing(&self, caller: &UserId, id: &ListingId) -> Result<(), ListingError> {
        let listing = self.get_listing(id).await?;
        if listing.author_id != *caller {
            return Err(ListingError::NotOwner);
        }

        self.listings
            .delete(id)
            .await
            .map_err(|err| ListingError::Storage(err.0))?;

        tracing::info!(listing_id = %id, "listing deleted");

        // Object cleanup is best-effort: the record delete already
        // succeeded, a stale object only wastes storage.
        let prefix = paths::listing_prefix(caller, id);
        match self.store.list(Bucket::Listings, &prefix).await {
            Ok(entries) if !entries.is_empty() => {
                let paths: Vec<String> = entries.into_iter().map(|entry| entry.path).collect();
                if let Err(err) = self.store.remove(Bucket::Listings, &paths).await {
                    tracing::warn!(listing_id = %id, %err, "failed to remove listing objects");
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(listing_id = %id, %err, "failed to list listing objects");
            }
        }

        Ok(())
    }
}

impl<L: ListingRepository, S: ObjectStore> ListingServiceImpl<L, S> {
    /// Upload the accepted files concurrently and patch the record with the
    /// resulting URLs. The final array preserves submission order regardless
    /// of completion order. Returns the attach warning on any failure.
    async fn attach_images(
        &self,
        author: &UserId,
        listing_id: &ListingId,
        accepted: Vec<CandidateFile>,
    ) -> Result<Vec<String>, String> {
        let total = accepted.len();
        let uploads = accepted.into_iter().map(|file| {
            let store = Arc::clone(&self.store);
            let path = paths::listing_image_path(author, listing_id, &file);
            async move {
                store
                    .upload(Bucket::Listings, &path, file.bytes, &file.content_type)
                    .await
            }
        });

        // join_all yields results in submission order.
        let results = future::join_all(uploads).await;

        let mut urls = Vec::with_capacity(total);
        let mut failed = 0usize;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(stored) => urls.push(stored.public_url),
                Err(err) => {
                    failed += 1;
                    first_error.get_or_insert_with(|| err.to_string());
                }
            }
        }

        if failed > 0 {
            return Err(format!(
                "{failed} of {total} images failed to upload: {}",
                first_error.unwrap_or_default()
            ));
        }

        self.listings
            .update_images(listing_id, &urls)
            .await
            .map_err(|err| format!("images uploaded but could not be attached: {}", err.0))?;

        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::outbound::{MockListingRepository, MockObjectStore};
    use uuid::Uuid;

    fn author() -> UserId {
        UserId::new(Uuid::new_v4())
    }

    fn form() -> NewListing {
        NewListing {
            title: "Logo design".to_string(),
            description: "Custom logos with two revision rounds".to_string(),
            category: crate::domain::models::Category::GraphicDesign,
            price: 50.0,
            price_type: crate::domain::models::PriceType::PerHour,
            location: None,
            contact_info: "a@b.com".to_string(),
            tags: vec!["logo".to_string()],
        }
    }

    fn jpeg(name: &str, size: usize) -> CandidateFile {
        CandidateFile::new(name, "image/jpeg", vec![0u8; size])
    }

    fn service(
        listings: &MockListingRepository,
        store: &MockObjectStore,
    ) -> ListingServiceImpl<MockListingRepository, MockObjectStore> {
        ListingServiceImpl::new(Arc::new(listings.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn creates_listing_with_no_images() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();

        let outcome = service(&listings, &store)
            .create_listing(&author(), form(), Vec::new())
            .await
            .unwrap();

        assert!(outcome.listing.image_urls.is_empty());
        assert!(outcome.rejected_files.is_empty());
        assert!(outcome.image_warning.is_none());
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn attaches_two_valid_jpegs() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();

        let outcome = service(&listings, &store)
            .create_listing(
                &author(),
                form(),
                vec![jpeg("a.jpg", 1024), jpeg("b.jpg", 2048)],
            )
            .await
            .unwrap();

        assert_eq!(outcome.listing.image_urls.len(), 2);
        assert!(outcome.image_warning.is_none());
        // The record store saw the same URLs.
        let row = listings.get(&outcome.listing.id).unwrap();
        assert_eq!(row.image_urls, outcome.listing.image_urls);
    }

    #[tokio::test]
    async fn preserves_submission_order_in_image_urls() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();

        let files = vec![
            jpeg("first.jpg", 512),
            CandidateFile::new("second.png", "image/png", vec![0u8; 512]),
            CandidateFile::new("third.webp", "image/webp", vec![0u8; 512]),
        ];

        let outcome = service(&listings, &store)
            .create_listing(&author(), form(), files)
            .await
            .unwrap();

        let urls = &outcome.listing.image_urls;
        assert_eq!(urls.len(), 3);
        assert!(urls[0].ends_with(".jpg"));
        assert!(urls[1].ends_with(".png"));
        assert!(urls[2].ends_with(".webp"));
    }

    #[tokio::test]
    async fn insert_failure_reaches_no_uploads() {
        let listings = MockListingRepository::new().with_insert_failure("duplicate key value");
        let store = MockObjectStore::new();

        let err = service(&listings, &store)
            .create_listing(&author(), form(), vec![jpeg("a.jpg", 1024)])
            .await
            .unwrap_err();

        // Record store message passes through verbatim.
        assert!(matches!(err, ListingError::CreateFailed(ref m) if m == "duplicate key value"));
        assert_eq!(store.upload_count(), 0);
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn one_failed_upload_keeps_the_listing_and_warns() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new().with_upload_failure_matching(".png");

        let files = vec![
            jpeg("ok.jpg", 512),
            CandidateFile::new("bad.png", "image/png", vec![0u8; 512]),
        ];

        let outcome = service(&listings, &store)
            .create_listing(&author(), form(), files)
            .await
            .unwrap();

        assert!(outcome.image_warning.is_some());
        // The listing survived and is fetchable, with no partial URL patch.
        let row = listings.get(&outcome.listing.id).unwrap();
        assert!(row.image_urls.is_empty());
    }

    #[tokio::test]
    async fn image_patch_failure_degrades_to_warning() {
        let listings = MockListingRepository::new().with_image_update_failure();
        let store = MockObjectStore::new();

        let outcome = service(&listings, &store)
            .create_listing(&author(), form(), vec![jpeg("a.jpg", 512)])
            .await
            .unwrap();

        assert!(outcome.image_warning.is_some());
        assert!(listings.get(&outcome.listing.id).is_some());
        assert_eq!(store.upload_count(), 1);
    }

    #[tokio::test]
    async fn oversized_file_is_dropped_but_listing_is_created() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();

        let files = vec![
            CandidateFile::new("huge.png", "image/png", vec![0u8; 6 * 1024 * 1024]),
            jpeg("ok.jpg", 1024 * 1024),
        ];

        let outcome = service(&listings, &store)
            .create_listing(&author(), form(), files)
            .await
            .unwrap();

        assert_eq!(outcome.rejected_files.len(), 1);
        assert_eq!(outcome.rejected_files[0].file_name, "huge.png");
        assert_eq!(outcome.listing.image_urls.len(), 1);
        // The rejected file never reached the object store.
        assert_eq!(store.upload_count(), 1);
    }

    #[tokio::test]
    async fn rejects_more_than_five_files_before_persisting() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();

        let files = (0..6).map(|i| jpeg(&format!("{i}.jpg"), 64)).collect();

        let err = service(&listings, &store)
            .create_listing(&author(), form(), files)
            .await
            .unwrap_err();

        assert!(matches!(err, ListingError::Invalid(_)));
        assert!(listings.is_empty());
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();

        let mut bad = form();
        bad.price = 0.0;

        let err = service(&listings, &store)
            .create_listing(&author(), bad, Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ListingError::Invalid(_)));
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();
        let svc = service(&listings, &store);

        let owner = author();
        let outcome = svc.create_listing(&owner, form(), Vec::new()).await.unwrap();

        let patch = ListingPatch {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        let err = svc
            .update_listing(&author(), &outcome.listing.id, patch)
            .await
            .unwrap_err();

        assert!(matches!(err, ListingError::NotOwner));
    }

    #[tokio::test]
    async fn patch_can_clear_and_leave_location_untouched() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();
        let svc = service(&listings, &store);

        let owner = author();
        let mut with_location = form();
        with_location.location = Some("CDMX".to_string());
        let outcome = svc
            .create_listing(&owner, with_location, Vec::new())
            .await
            .unwrap();
        let id = outcome.listing.id;

        // Omitted field: location survives an unrelated edit.
        let rename = ListingPatch {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        let updated = svc.update_listing(&owner, &id, rename).await.unwrap();
        assert_eq!(updated.location.as_deref(), Some("CDMX"));

        // Explicit null: location is cleared.
        let clear = ListingPatch {
            location: Some(None),
            ..Default::default()
        };
        let updated = svc.update_listing(&owner, &id, clear).await.unwrap();
        assert_eq!(updated.location, None);
    }

    #[tokio::test]
    async fn delete_removes_record_and_stored_objects() {
        let listings = MockListingRepository::new();
        let store = MockObjectStore::new();
        let svc = service(&listings, &store);

        let owner = author();
        let outcome = svc
            .create_listing(&owner, form(), vec![jpeg("a.jpg", 512)])
            .await
            .unwrap();
        assert_eq!(store.object_paths(Bucket::Listings).len(), 1);

        svc.delete_listing(&owner, &outcome.listing.id).await.unwrap();

        assert!(listings.is_empty());
        assert!(store.object_paths(Bucket::Listings).is_empty());
    }
}
