use reqwest::{header, Response};
use serde_json::json;

use crate::error::StorageError;
use crate::models::{ApiErrorBody, ObjectEntry};

const LIST_PAGE_SIZE: u32 = 100;

/// Thin client over the storage REST API.
///
/// Paths are always `{bucket}`-scoped and may contain `/` segments; the
/// server treats them as folders for listing purposes.
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Upload `bytes` to `bucket/path`. The server writes atomically; a
    /// failed upload never leaves a visible partial object.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/object/{}/{}", self.base_url, bucket, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;
        tracing::debug!(bucket, path, "uploaded object");
        Ok(())
    }

    /// Remove the given objects in one call. The API deletes all-or-nothing
    /// per request, not per path.
    pub async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let url = format!("{}/object/{}", self.base_url, bucket);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        Self::check(response).await?;
        tracing::debug!(bucket, count = paths.len(), "removed objects");
        Ok(())
    }

    /// List all objects under `prefix` (a folder path without trailing
    /// slash), paging until the server returns a short page.
    pub async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        let url = format!("{}/object/list/{}", self.base_url, bucket);
        let mut entries: Vec<ObjectEntry> = Vec::new();

        loop {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "prefix": prefix,
                    "limit": LIST_PAGE_SIZE,
                    "offset": entries.len(),
                    "sortBy": { "column": "name", "order": "asc" },
                }))
                .send()
                .await?;

            let response = Self::check(response).await?;
            let page = response.json::<Vec<ObjectEntry>>().await?;
            let page_len = page.len();
            entries.extend(page);

            if page_len < LIST_PAGE_SIZE as usize {
                return Ok(entries);
            }
        }
    }

    /// Public URL for an object in a public bucket. Pure derivation, the
    /// object is not checked for existence.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, bucket, path)
    }

    async fn check(response: Response) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.into_message(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown storage error")
                .to_string(),
        };

        Err(StorageError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_bucket_and_path() {
        let client = StorageClient::new("https://example.supabase.co/storage/v1/", "key");

        assert_eq!(
            client.public_url("listings", "user-1/listing-2/17000-ab12.jpg"),
            "https://example.supabase.co/storage/v1/object/public/listings/user-1/listing-2/17000-ab12.jpg",
        );
    }

    #[test]
    fn error_body_prefers_message_over_error() {
        let body = ApiErrorBody {
            message: Some("bucket not found".to_string()),
            error: Some("NotFound".to_string()),
        };

        assert_eq!(body.into_message(), "bucket not found");
    }
}
