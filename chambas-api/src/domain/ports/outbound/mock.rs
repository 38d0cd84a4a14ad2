//! Mock outbound adapters for testing.
//!
//! In-memory implementations of the gateways with call recording and
//! failure injection, so orchestrator tests can assert call order and
//! partial-failure behavior without a database or object store.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::models::{
    Listing, ListingFilter, ListingId, ListingPatch, ListingStatus, NewListing, Profile,
    StoredObject, UserId,
};

use super::{
    Bucket, ListingRepository, ObjectEntry, ObjectStore, ObjectStoreError, ProfileRepository,
    RecordStoreError,
};

/// Mock object store backed by an in-memory map keyed by `bucket/path`.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    upload_log: Arc<RwLock<Vec<String>>>,
    remove_log: Arc<RwLock<Vec<Vec<String>>>>,
    /// Uploads whose path contains this substring fail.
    fail_uploads_matching: Arc<RwLock<Option<String>>>,
    fail_removals: Arc<RwLock<bool>>,
}

#[allow(dead_code)]
impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing object.
    pub fn with_object(self, bucket: Bucket, path: &str) -> Self {
        self.objects
            .write()
            .unwrap()
            .insert(format!("{}/{}", bucket.name(), path), vec![0u8; 4]);
        self
    }

    /// Fail any upload whose path contains `fragment`.
    pub fn with_upload_failure_matching(self, fragment: &str) -> Self {
        *self.fail_uploads_matching.write().unwrap() = Some(fragment.to_string());
        self
    }

    pub fn with_removal_failure(self) -> Self {
        *self.fail_removals.write().unwrap() = true;
        self
    }

    pub fn upload_count(&self) -> usize {
        self.upload_log.read().unwrap().len()
    }

    /// Paths in upload call order.
    pub fn uploaded_paths(&self) -> Vec<String> {
        self.upload_log.read().unwrap().clone()
    }

    pub fn removed_batches(&self) -> Vec<Vec<String>> {
        self.remove_log.read().unwrap().clone()
    }

    /// Current object paths in a bucket, lexicographic order.
    pub fn object_paths(&self, bucket: Bucket) -> Vec<String> {
        let key_prefix = format!("{}/", bucket.name());
        self.objects
            .read()
            .unwrap()
            .keys()
            .filter_map(|key| key.strip_prefix(&key_prefix).map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, ObjectStoreError> {
        self.upload_log.write().unwrap().push(path.to_string());

        if let Some(fragment) = self.fail_uploads_matching.read().unwrap().as_deref() {
            if path.contains(fragment) {
                return Err(ObjectStoreError::Upload("simulated upload failure".into()));
            }
        }

        self.objects
            .write()
            .unwrap()
            .insert(format!("{}/{}", bucket.name(), path), bytes);

        Ok(StoredObject {
            storage_path: path.to_string(),
            public_url: self.public_url(bucket, path),
        })
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<(), ObjectStoreError> {
        if paths.is_empty() {
            return Ok(());
        }

        self.remove_log.write().unwrap().push(paths.to_vec());

        if *self.fail_removals.read().unwrap() {
            return Err(ObjectStoreError::Removal(
                "simulated removal failure".into(),
            ));
        }

        let mut objects = self.objects.write().unwrap();
        for path in paths {
            objects.remove(&format!("{}/{}", bucket.name(), path));
        }
        Ok(())
    }

    async fn list(
        &self,
        bucket: Bucket,
        prefix: &str,
    ) -> Result<Vec<ObjectEntry>, ObjectStoreError> {
        let key_prefix = format!("{}/{}", bucket.name(), prefix);
        Ok(self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(&key_prefix))
            .filter_map(|key| key.strip_prefix(&format!("{}/", bucket.name())))
            .map(|path| ObjectEntry {
                path: path.to_string(),
            })
            .collect())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("https://storage.test/{}/{}", bucket.name(), path)
    }
}

/// Mock listing repository backed by an in-memory HashMap.
#[derive(Clone, Default)]
pub struct MockListingRepository {
    rows: Arc<RwLock<HashMap<ListingId, Listing>>>,
    fail_insert: Arc<RwLock<Option<String>>>,
    fail_image_update: Arc<RwLock<bool>>,
}

#[allow(dead_code)]
impl MockListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `insert` fail with the given record-store message.
    pub fn with_insert_failure(self, message: &str) -> Self {
        *self.fail_insert.write().unwrap() = Some(message.to_string());
        self
    }

    pub fn with_image_update_failure(self) -> Self {
        *self.fail_image_update.write().unwrap() = true;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().unwrap().is_empty()
    }

    pub fn get(&self, id: &ListingId) -> Option<Listing> {
        self.rows.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl ListingRepository for MockListingRepository {
    async fn insert(&self, author: &UserId, new: &NewListing) -> Result<Listing, RecordStoreError> {
        if let Some(message) = self.fail_insert.read().unwrap().as_deref() {
            return Err(RecordStoreError(message.to_string()));
        }

        let now = OffsetDateTime::now_utc();
        let listing = Listing {
            id: ListingId::new(Uuid::new_v4()),
            author_id: *author,
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category,
            price: new.price,
            price_type: new.price_type,
            location: new.location.clone(),
            contact_info: new.contact_info.clone(),
            tags: new.tags.clone(),
            status: ListingStatus::Active,
            image_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.rows
            .write()
            .unwrap()
            .insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find(&self, id: &ListingId) -> Result<Option<Listing>, RecordStoreError> {
        Ok(self.rows.read().unwrap().get(id).cloned())
    }

    async fn browse(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RecordStoreError> {
        let rows = self.rows.read().unwrap();
        let mut listings: Vec<Listing> = rows
            .values()
            .filter(|listing| {
                filter
                    .category
                    .map_or(true, |category| listing.category == category)
                    && filter
                        .author
                        .map_or(true, |author| listing.author_id == author)
                    && filter.status.map_or(true, |status| listing.status == status)
            })
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn update_images(
        &self,
        id: &ListingId,
        urls: &[String],
    ) -> Result<(), RecordStoreError> {
        if *self.fail_image_update.read().unwrap() {
            return Err(RecordStoreError("simulated image update failure".into()));
        }

        let mut rows = self.rows.write().unwrap();
        let listing = rows
            .get_mut(id)
            .ok_or_else(|| RecordStoreError("listing not found".into()))?;
        listing.image_urls = urls.to_vec();
        listing.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> Result<Listing, RecordStoreError> {
        let mut rows = self.rows.write().unwrap();
        let listing = rows
            .get_mut(id)
            .ok_or_else(|| RecordStoreError("listing not found".into()))?;

        if let Some(title) = &patch.title {
            listing.title = title.clone();
        }
        if let Some(description) = &patch.description {
            listing.description = description.clone();
        }
        if let Some(category) = patch.category {
            listing.category = category;
        }
        if let Some(price) = patch.price {
            listing.price = price;
        }
        if let Some(price_type) = patch.price_type {
            listing.price_type = price_type;
        }
        if let Some(location) = &patch.location {
            listing.location = location.clone();
        }
        if let Some(contact_info) = &patch.contact_info {
            listing.contact_info = contact_info.clone();
        }
        if let Some(tags) = &patch.tags {
            listing.tags = tags.clone();
        }
        if let Some(status) = patch.status {
            listing.status = status;
        }
        listing.updated_at = OffsetDateTime::now_utc();
        Ok(listing.clone())
    }

    async fn delete(&self, id: &ListingId) -> Result<(), RecordStoreError> {
        self.rows.write().unwrap().remove(id);
        Ok(())
    }
}

/// Mock profile repository with upsert semantics matching the real gateway.
#[derive(Clone, Default)]
pub struct MockProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
    fail_avatar_update: Arc<RwLock<bool>>,
    update_log: Arc<RwLock<Vec<(UserId, String)>>>,
}

#[allow(dead_code)]
impl MockProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles.write().unwrap().insert(profile.id, profile);
        self
    }

    pub fn with_update_failure(self) -> Self {
        *self.fail_avatar_update.write().unwrap() = true;
        self
    }

    pub fn avatar_url(&self, id: &UserId) -> Option<String> {
        self.profiles
            .read()
            .unwrap()
            .get(id)
            .and_then(|profile| profile.avatar_url.clone())
    }

    pub fn update_call_count(&self) -> usize {
        self.update_log.read().unwrap().len()
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find(&self, id: &UserId) -> Result<Option<Profile>, RecordStoreError> {
        Ok(self.profiles.read().unwrap().get(id).cloned())
    }

    async fn update_avatar_url(&self, id: &UserId, url: &str) -> Result<(), RecordStoreError> {
        self.update_log
            .write()
            .unwrap()
            .push((*id, url.to_string()));

        if *self.fail_avatar_update.read().unwrap() {
            return Err(RecordStoreError("simulated profile update failure".into()));
        }

        let now = OffsetDateTime::now_utc();
        let mut profiles = self.profiles.write().unwrap();
        profiles
            .entry(*id)
            .and_modify(|profile| {
                profile.avatar_url = Some(url.to_string());
                profile.updated_at = now;
            })
            .or_insert_with(|| Profile {
                id: *id,
                display_name: None,
                avatar_url: Some(url.to_string()),
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }
}
