use crate::UploadError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid user id: {0}")]
    InvalidId(String),

    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    Database(String),

    #[error("{0}")]
    Storage(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Something went wrong: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidId(_) | Self::Database(_) | Self::Storage(_) => 400,
            Self::NotFound => 404,
            Self::Upload(_) => 418,
            Self::Internal(_) => 500,
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorEnvelope {
        status: u16,
        message: String,
        error: bool,
    }

    #[derive(serde::Serialize)]
    struct UploadErrorBody {
        err_code: &'static str,
        err_message: String,
    }

    // err_code 409 on a 500 is what clients of this API already match on.
    #[derive(serde::Serialize)]
    struct UnexpectedErrorBody {
        err_code: u16,
        err_message: &'static str,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            match self {
                AppError::Upload(err) => {
                    tracing::debug!(code = err.code(), "Rejected upload: {}", err);
                    let body = UploadErrorBody {
                        err_code: err.code(),
                        err_message: err.to_string(),
                    };
                    (StatusCode::IM_A_TEAPOT, Json(body)).into_response()
                }
                AppError::Internal(msg) => {
                    tracing::error!("Unexpected error: {}", msg);
                    let body = UnexpectedErrorBody {
                        err_code: 409,
                        err_message: "Something went wrong",
                    };
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
                }
                other => {
                    let status = StatusCode::from_u16(other.status_code())
                        .unwrap_or(StatusCode::BAD_REQUEST);
                    let body = ErrorEnvelope {
                        status: status.as_u16(),
                        message: other.to_string(),
                        error: true,
                    };
                    (status, Json(body)).into_response()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status_code(), 400);
        assert_eq!(AppError::InvalidId("x".into()).status_code(), 400);
        assert_eq!(AppError::Database("x".into()).status_code(), 400);
        assert_eq!(AppError::NotFound.status_code(), 404);
        assert_eq!(AppError::Upload(UploadError::FileTooLarge).status_code(), 418);
        assert_eq!(AppError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_upload_error_is_transparent() {
        let err: AppError = UploadError::FileTooLarge.into();
        assert_eq!(err.to_string(), "File too large");
    }

    #[cfg(feature = "http")]
    mod http {
        use super::super::*;
        use axum::body::to_bytes;
        use axum::http::StatusCode;
        use axum::response::IntoResponse;
        use serde_json::{json, Value};

        async fn body_json(err: AppError) -> (StatusCode, Value) {
            let response = err.into_response();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        #[tokio::test]
        async fn test_not_found_envelope() {
            let (status, body) = body_json(AppError::NotFound).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(
                body,
                json!({"status": 404, "message": "User not found", "error": true})
            );
        }

        #[tokio::test]
        async fn test_upload_error_body() {
            let (status, body) = body_json(UploadError::FileTooLarge.into()).await;
            assert_eq!(status, StatusCode::IM_A_TEAPOT);
            assert_eq!(
                body,
                json!({"err_code": "LIMIT_FILE_SIZE", "err_message": "File too large"})
            );
        }

        #[tokio::test]
        async fn test_internal_error_hides_details() {
            let (status, body) = body_json(AppError::Internal("disk on fire".into())).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body,
                json!({"err_code": 409, "err_message": "Something went wrong"})
            );
        }
    }
}
