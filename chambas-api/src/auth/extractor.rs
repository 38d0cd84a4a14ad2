use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{domain::models::UserId, routes::ApiError};

use super::SESSION_USER_KEY;

/// Axum extractor yielding the authenticated caller's identity id from the
/// server-side session. Returns 401 Unauthorized when no identity is
/// resolved, before any record-store call is made.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::unauthorized("Not authenticated"))?;

        let user_id = session
            .get::<Uuid>(SESSION_USER_KEY)
            .await
            .map_err(|err| ApiError::internal(format!("session load failed: {err}")))?
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        Ok(AuthUser {
            id: UserId::new(user_id),
        })
    }
}
