use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::{app_state::AppState, domain::models::UserId, routes::ApiError};

use super::{IdentityError, SESSION_USER_KEY};

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/session", post(create_session).delete(end_session))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionBody {
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    user_id: UserId,
}

/// Exchange a provider-issued access token for a server-side session.
#[instrument(name = "POST /auth/session", skip_all)]
async fn create_session(
    State(app_state): State<AppState>,
    session: Session,
    Json(body): Json<CreateSessionBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    let claims = app_state
        .identity
        .verify_token(&body.access_token)
        .await
        .map_err(|err| match err {
            IdentityError::InvalidToken => ApiError::unauthorized("Invalid access token"),
            other => {
                tracing::error!("identity verification failed: {other}");
                ApiError::internal("identity verification failed")
            }
        })?;

    session
        .insert(SESSION_USER_KEY, claims.id.as_uuid())
        .await
        .map_err(|err| ApiError::internal(format!("session store failed: {err}")))?;

    Ok(Json(SessionResponse { user_id: claims.id }))
}

#[instrument(name = "DELETE /auth/session", skip_all)]
async fn end_session(session: Session) -> Result<StatusCode, ApiError> {
    session
        .flush()
        .await
        .map_err(|err| ApiError::internal(format!("session flush failed: {err}")))?;

    Ok(StatusCode::NO_CONTENT)
}
