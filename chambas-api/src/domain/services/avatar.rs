use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    asset_policy::{self, AssetClass},
    models::{CandidateFile, Profile, UserId},
    ports::{
        inbound::{AvatarReplacement, AvatarService},
        outbound::{Bucket, ObjectStore, ProfileRepository},
    },
    AvatarError,
};

use super::paths;

/// Orchestrates avatar replacement: validate, clean up the previous
/// object(s), upload the new one, link it to the profile.
///
/// The per-identity storage prefix acts as the "one avatar" constraint, so
/// existing objects are enumerated and removed before the new upload. If
/// removal fails the replacement stops rather than leaving two avatar
/// generations alive at once.
pub struct AvatarServiceImpl<P, S> {
    profiles: Arc<P>,
    store: Arc<S>,
}

impl<P, S> AvatarServiceImpl<P, S> {
    pub fn new(profiles: Arc<P>, store: Arc<S>) -> Self {
        Self { profiles, store }
    }
}

#[async_trait]
impl<P: ProfileRepository, S: ObjectStore> AvatarService for AvatarServiceImpl<P, S> {
    async fn replace_avatar(
        &self,
        user: &UserId,
        file: CandidateFile,
    ) -> Result<AvatarReplacement, AvatarError> {
        asset_policy::validate(&file, AssetClass::Avatar).map_err(AvatarError::Rejected)?;
        tracing::debug!(user = %user, "avatar candidate validated");

        let prefix = paths::avatar_prefix(user);
        let existing = self
            .store
            .list(Bucket::Avatars, &prefix)
            .await
            .map_err(|err| AvatarError::CleanupFailed(err.to_string()))?;

        if !existing.is_empty() {
            let old_paths: Vec<String> = existing.into_iter().map(|entry| entry.path).collect();
            self.store
                .remove(Bucket::Avatars, &old_paths)
                .await
                .map_err(|err| AvatarError::CleanupFailed(err.to_string()))?;
            tracing::debug!(user = %user, removed = old_paths.len(), "previous avatar removed");
        }

        let path = paths::avatar_path(user, &file);
        let stored = self
            .store
            .upload(Bucket::Avatars, &path, file.bytes, &file.content_type)
            .await
            .map_err(|err| AvatarError::UploadFailed(err.to_string()))?;
        tracing::debug!(user = %user, path = %stored.storage_path, "new avatar uploaded");

        self.profiles
            .update_avatar_url(user, &stored.public_url)
            .await
            .map_err(|err| AvatarError::LinkUpdateFailed {
                public_url: stored.public_url.clone(),
                message: err.0,
            })?;

        tracing::info!(user = %user, "avatar replaced");
        Ok(AvatarReplacement {
            storage_path: stored.storage_path,
            public_url: stored.public_url,
        })
    }

    async fn link_avatar(&self, user: &UserId, public_url: &str) -> Result<(), AvatarError> {
        self.profiles
            .update_avatar_url(user, public_url)
            .await
            .map_err(|err| AvatarError::LinkUpdateFailed {
                public_url: public_url.to_string(),
                message: err.0,
            })
    }

    async fn get_profile(&self, user: &UserId) -> Result<Profile, AvatarError> {
        self.profiles
            .find(user)
            .await
            .map_err(|err| AvatarError::Storage(err.0))?
            .ok_or(AvatarError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::outbound::{MockObjectStore, MockProfileRepository};
    use uuid::Uuid;

    fn user() -> UserId {
        UserId::new(Uuid::new_v4())
    }

    fn png(size: usize) -> CandidateFile {
        CandidateFile::new("me.png", "image/png", vec![0u8; size])
    }

    fn service(
        profiles: &MockProfileRepository,
        store: &MockObjectStore,
    ) -> AvatarServiceImpl<MockProfileRepository, MockObjectStore> {
        AvatarServiceImpl::new(Arc::new(profiles.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn first_upload_creates_profile_link() {
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new();
        let user = user();

        let replacement = service(&profiles, &store)
            .replace_avatar(&user, png(1024))
            .await
            .unwrap();

        assert_eq!(profiles.avatar_url(&user), Some(replacement.public_url));
        assert_eq!(store.object_paths(Bucket::Avatars).len(), 1);
    }

    #[tokio::test]
    async fn replacement_leaves_exactly_one_object_with_a_new_path() {
        let user = user();
        let old_path = format!("{user}/avatar-1000.png");
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new().with_object(Bucket::Avatars, &old_path);

        service(&profiles, &store)
            .replace_avatar(&user, png(1024))
            .await
            .unwrap();

        let remaining = store.object_paths(Bucket::Avatars);
        assert_eq!(remaining.len(), 1);
        assert_ne!(remaining[0], old_path);
        // The old object went out in a single removal batch.
        assert_eq!(store.removed_batches(), vec![vec![old_path]]);
    }

    #[tokio::test]
    async fn cleanup_failure_blocks_the_upload() {
        let user = user();
        let old_path = format!("{user}/avatar-1000.png");
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new()
            .with_object(Bucket::Avatars, &old_path)
            .with_removal_failure();

        let err = service(&profiles, &store)
            .replace_avatar(&user, png(1024))
            .await
            .unwrap_err();

        assert!(matches!(err, AvatarError::CleanupFailed(_)));
        assert_eq!(store.upload_count(), 0);
        assert_eq!(profiles.update_call_count(), 0);
    }

    #[tokio::test]
    async fn rejected_file_never_reaches_the_store() {
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new();

        let gif = CandidateFile::new("me.gif", "image/gif", vec![0u8; 64]);
        let err = service(&profiles, &store)
            .replace_avatar(&user(), gif)
            .await
            .unwrap_err();

        assert!(matches!(err, AvatarError::Rejected(_)));
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn oversized_avatar_is_rejected() {
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new();

        let err = service(&profiles, &store)
            .replace_avatar(&user(), png(2 * 1024 * 1024 + 1))
            .await
            .unwrap_err();

        assert!(matches!(err, AvatarError::Rejected(_)));
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn link_failure_surfaces_the_uploaded_url() {
        let profiles = MockProfileRepository::new().with_update_failure();
        let store = MockObjectStore::new();
        let user = user();

        let err = service(&profiles, &store)
            .replace_avatar(&user, png(1024))
            .await
            .unwrap_err();

        // The object exists in storage; the caller gets its URL to retry
        // the link step.
        match err {
            AvatarError::LinkUpdateFailed { public_url, .. } => {
                let remaining = store.object_paths(Bucket::Avatars);
                assert_eq!(remaining.len(), 1);
                assert!(public_url.ends_with(&remaining[0]));
            }
            other => panic!("expected LinkUpdateFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn linking_twice_is_idempotent() {
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new();
        let user = user();
        let svc = service(&profiles, &store);

        let replacement = svc.replace_avatar(&user, png(1024)).await.unwrap();
        let after_first = profiles.avatar_url(&user);

        svc.link_avatar(&user, &replacement.public_url).await.unwrap();

        assert_eq!(profiles.avatar_url(&user), after_first);
    }

    #[tokio::test]
    async fn get_profile_for_unknown_identity_is_not_found() {
        let profiles = MockProfileRepository::new();
        let store = MockObjectStore::new();

        let err = service(&profiles, &store)
            .get_profile(&user())
            .await
            .unwrap_err();

        assert!(matches!(err, AvatarError::NotFound));
    }
}
