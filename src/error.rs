use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// every failure the hub can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HubError {
    /// body is not json or misses required fields. nothing was mutated.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// id is not in the fixed registry. nothing was mutated.
    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),

    /// durable history backend unreachable or failing
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type Result<T> = std::result::Result<T, HubError>;

impl From<sqlx::Error> for HubError {
    fn from(err: sqlx::Error) -> Self {
        HubError::StorageUnavailable(err.to_string())
    }
}

impl HubError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HubError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            HubError::UnknownSensor(_) => StatusCode::NOT_FOUND,
            HubError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // unknown sensors get a bare 404, same as an unknown path
            HubError::UnknownSensor(_) => status.into_response(),
            other => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                other.to_string(),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_http_status() {
        assert_eq!(
            HubError::InvalidPayload("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HubError::UnknownSensor("sensor_9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HubError::StorageUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn sqlx_errors_become_storage_unavailable() {
        let err: HubError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, HubError::StorageUnavailable(_)));
    }
}
