use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use warden_core::password::PasswordError;
use warden_core::registry::RegistryError;
use warden_core::store::StoreError;

/// Error response: every failure maps to exactly one status code and a
/// short machine-oriented message. Internals stay in the log, never on
/// the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
        }
    }

    /// A required request field is absent or empty.
    pub fn missing_fields() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "missing fields")
    }

    pub fn duplicate_user() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "user already exists")
    }

    pub fn invalid_credentials() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid credentials")
    }

    pub fn user_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "user not found")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateUser { .. } => Self::duplicate_user(),
            RegistryError::UserNotFound { .. } => Self::user_not_found(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("store failure: {err}");
        Self::internal()
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("password hashing failure: {err}");
        Self::internal()
    }
}
