use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::{asset_policy::RejectionReason, AvatarError, ListingError};

/// Machine-readable codes for failures the client is expected to react to
/// with something other than a generic error banner.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AvatarCleanupFailed,
    AvatarLinkUpdateFailed,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

fn rejection_status(reason: &RejectionReason) -> StatusCode {
    match reason {
        RejectionReason::UnsupportedContentType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        RejectionReason::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
    }
}

impl From<ListingError> for ApiError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::Invalid(message) => Self::bad_request(message),
            // Fatal create failure: nothing persisted, message surfaced
            // verbatim so the caller can tell "nothing happened".
            ListingError::CreateFailed(message) => {
                tracing::error!("listing insert failed: {}", message);
                Self::internal(message)
            }
            ListingError::NotFound => Self::not_found(err.to_string()),
            ListingError::NotOwner => Self::forbidden(err.to_string()),
            ListingError::Storage(message) => {
                tracing::error!("listing operation failed: {}", message);
                Self::internal(message)
            }
        }
    }
}

impl From<AvatarError> for ApiError {
    fn from(err: AvatarError) -> Self {
        match err {
            AvatarError::Rejected(reason) => {
                Self::new(rejection_status(&reason), reason.to_string())
            }
            AvatarError::CleanupFailed(_) => {
                tracing::error!("avatar cleanup failed: {}", err);
                Self::internal(err.to_string()).with_code(ErrorCode::AvatarCleanupFailed)
            }
            AvatarError::UploadFailed(_) => {
                tracing::error!("avatar upload failed: {}", err);
                Self::internal(err.to_string())
            }
            // The message carries the uploaded public URL so the client
            // can retry the link step.
            AvatarError::LinkUpdateFailed { .. } => {
                tracing::error!("avatar link update failed: {}", err);
                Self::internal(err.to_string()).with_code(ErrorCode::AvatarLinkUpdateFailed)
            }
            AvatarError::NotFound => Self::not_found(err.to_string()),
            AvatarError::Storage(message) => {
                tracing::error!("profile operation failed: {}", message);
                Self::internal(message)
            }
        }
    }
}
