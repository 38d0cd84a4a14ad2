use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{CandidateFile, Profile},
};

use super::ApiError;

// Allow multipart overhead while keeping the actual avatar payload policy
// at 2 MiB.
const AVATAR_UPLOAD_BODY_LIMIT: usize = 3 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_profile))
        .route("/avatar", put(replace_my_avatar))
        .route("/avatar/link", post(link_my_avatar))
        .route_layer(DefaultBodyLimit::max(AVATAR_UPLOAD_BODY_LIMIT))
}

#[instrument(name = "GET /profile", skip_all, fields(user = %user.id))]
async fn my_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    let profile = app_state.avatar_service.get_profile(&user.id).await?;
    Ok(Json(profile))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvatarResponse {
    avatar_url: String,
    storage_path: String,
}

#[instrument(name = "PUT /profile/avatar", skip_all, fields(user = %user.id))]
async fn replace_my_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let file = extract_avatar_from_multipart(&mut multipart).await?;

    let replacement = app_state
        .avatar_service
        .replace_avatar(&user.id, file)
        .await?;

    Ok(Json(AvatarResponse {
        avatar_url: replacement.public_url,
        storage_path: replacement.storage_path,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkAvatarBody {
    avatar_url: String,
}

/// Idempotent retry of the profile link after a `LinkUpdateFailed`.
#[instrument(name = "POST /profile/avatar/link", skip_all, fields(user = %user.id))]
async fn link_my_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(body): Json<LinkAvatarBody>,
) -> Result<StatusCode, ApiError> {
    app_state
        .avatar_service
        .link_avatar(&user.id, &body.avatar_url)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn extract_avatar_from_multipart(
    multipart: &mut Multipart,
) -> Result<CandidateFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("failed to parse multipart field"))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("failed to read avatar payload"))?;

        return Ok(CandidateFile::new(file_name, content_type, bytes.to_vec()));
    }

    Err(ApiError::bad_request("missing avatar file field"))
}
