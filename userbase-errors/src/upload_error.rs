use serde::{Deserialize, Serialize};

/// Failures raised while pulling an avatar out of a multipart body.
///
/// These never reach the user service: the upload step rejects the request
/// before any handler runs, and the HTTP layer reports them with status 418.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum UploadError {
    #[error("File too large")]
    FileTooLarge,

    #[error("Unexpected field")]
    UnexpectedField(String),

    #[error("Field value too long")]
    FieldTooLong(String),

    #[error("Only image files are allowed")]
    InvalidFileType(String),

    #[error("{0}")]
    Malformed(String),
}

impl UploadError {
    /// Stable machine-readable code sent back as `err_code`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileTooLarge => "LIMIT_FILE_SIZE",
            Self::UnexpectedField(_) => "LIMIT_UNEXPECTED_FILE",
            Self::FieldTooLong(_) => "LIMIT_FIELD_VALUE",
            Self::InvalidFileType(_) => "INVALID_FILE_TYPE",
            Self::Malformed(_) => "MALFORMED_MULTIPART",
        }
    }

    /// Name of the multipart field that triggered the error, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnexpectedField(field) | Self::FieldTooLong(field) => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_upload_limits() {
        assert_eq!(UploadError::FileTooLarge.code(), "LIMIT_FILE_SIZE");
        assert_eq!(
            UploadError::UnexpectedField("photo".into()).code(),
            "LIMIT_UNEXPECTED_FILE"
        );
        assert_eq!(UploadError::FileTooLarge.to_string(), "File too large");
    }

    #[test]
    fn test_field_is_reported() {
        let err = UploadError::FieldTooLong("email".into());
        assert_eq!(err.field(), Some("email"));
        assert_eq!(UploadError::FileTooLarge.field(), None);
    }
}
