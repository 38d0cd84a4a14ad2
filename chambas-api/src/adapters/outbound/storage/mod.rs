use async_trait::async_trait;
use supastore::StorageClient;

use crate::domain::{
    models::StoredObject,
    ports::outbound::{Bucket, ObjectEntry, ObjectStore, ObjectStoreError},
};

/// Object-store gateway over the storage REST API.
pub struct SupaObjectStore {
    client: StorageClient,
}

impl SupaObjectStore {
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for SupaObjectStore {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, ObjectStoreError> {
        self.client
            .upload(bucket.name(), path, bytes, content_type)
            .await
            .map_err(|err| ObjectStoreError::Upload(err.to_string()))?;

        Ok(StoredObject {
            storage_path: path.to_string(),
            public_url: self.public_url(bucket, path),
        })
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<(), ObjectStoreError> {
        if paths.is_empty() {
            return Ok(());
        }

        self.client
            .remove(bucket.name(), paths)
            .await
            .map_err(|err| ObjectStoreError::Removal(err.to_string()))
    }

    async fn list(
        &self,
        bucket: Bucket,
        prefix: &str,
    ) -> Result<Vec<ObjectEntry>, ObjectStoreError> {
        // The storage API lists folders without a trailing slash and
        // returns names relative to the prefix; re-join to full paths.
        let folder = prefix.trim_end_matches('/');
        let entries = self
            .client
            .list(bucket.name(), folder)
            .await
            .map_err(|err| ObjectStoreError::List(err.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|entry| ObjectEntry {
                path: format!("{folder}/{}", entry.name),
            })
            .collect())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        self.client.public_url(bucket.name(), path)
    }
}
