use axum::extract::multipart::{Field, MultipartError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde_json::{Map, Value};
use userbase_app::domain::UserFields;
use userbase_app::infrastructure::storage::{AvatarStorage, StoredAvatar};
use userbase_app::AppContext;
use userbase_errors::{AppError, UploadError};

/// Multipart field carrying the avatar image.
pub const AVATAR_FIELD: &str = "avatar";

const MAX_FIELD_BYTES: usize = 64 * 1024;

/// Body of a create/update request, with the avatar already written to
/// storage when one was uploaded.
#[derive(Debug)]
pub struct UserForm {
    pub fields: UserFields,
    pub avatar: Option<StoredAvatar>,
}

impl FromRequest<AppContext> for UserForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppContext) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| UploadError::Malformed(e.body_text()))?;
            return read_multipart(multipart, &state.storage).await;
        }

        let fields = if content_type.starts_with("application/json") {
            let Json(body) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(json_rejection)?;
            fields_from_json(body)?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            let mut fields = UserFields::default();
            for (name, value) in pairs {
                fields.set(&name, value);
            }
            fields
        } else if content_type.is_empty() {
            UserFields::default()
        } else {
            return Err(AppError::Validation(format!(
                "Unsupported content type {:?}",
                content_type
            )));
        };

        Ok(Self {
            fields,
            avatar: None,
        })
    }
}

struct PendingFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Collects the text fields and the single avatar file, then stores the file.
async fn read_multipart(
    mut multipart: Multipart,
    storage: &AvatarStorage,
) -> Result<UserForm, AppError> {
    let mut fields = UserFields::default();
    let mut pending: Option<PendingFile> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = read_text(&mut field, &name).await?;
            fields.set(&name, value);
            continue;
        };

        if name != AVATAR_FIELD || pending.is_some() {
            return Err(UploadError::UnexpectedField(name).into());
        }

        let content_type = field.content_type().map(str::to_string);
        let bytes = read_file(&mut field, storage.max_file_bytes()).await?;

        // browsers send an empty part when no file was picked
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        pending = Some(PendingFile {
            name: file_name,
            content_type,
            bytes,
        });
    }

    let avatar = match pending {
        Some(file) => Some(
            storage
                .store(&file.name, file.content_type.as_deref(), &file.bytes)
                .await?,
        ),
        None => None,
    };

    Ok(UserForm { fields, avatar })
}

async fn read_file(field: &mut Field<'_>, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(UploadError::FileTooLarge.into());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field<'_>, name: &str) -> Result<String, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > MAX_FIELD_BYTES {
            return Err(UploadError::FieldTooLong(name.to_string()).into());
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes)
        .map_err(|_| AppError::Validation(format!("{} must be valid UTF-8 text", name)))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::FileTooLarge.into()
    } else {
        UploadError::Malformed(err.body_text()).into()
    }
}

/// A body that is not valid JSON is reported like any unexpected failure;
/// the remaining rejections are client errors.
pub fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonSyntaxError(e) => AppError::Internal(e.body_text()),
        other => AppError::Validation(other.body_text()),
    }
}

fn fields_from_json(body: Map<String, Value>) -> Result<UserFields, AppError> {
    let mut fields = UserFields::default();
    for (name, value) in body {
        if !UserFields::is_field(&name) {
            continue;
        }
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(AppError::Validation(format!("{} must be a plain value", name)))
            }
        };
        fields.set(&name, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_from_json() {
        let body = json!({
            "firstName": "John",
            "phoneNumber": 9876543210u64,
            "isActive": false,
            "email": null,
            "role": "admin"
        });
        let Value::Object(map) = body else { unreachable!() };
        let fields = fields_from_json(map).unwrap();
        assert_eq!(fields.first_name.as_deref(), Some("John"));
        assert_eq!(fields.phone_number.as_deref(), Some("9876543210"));
        assert_eq!(fields.is_active.as_deref(), Some("false"));
        assert_eq!(fields.email, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored_whatever_their_value() {
        let Value::Object(map) = json!({
            "firstName": "Jane",
            "tags": ["a", "b"],
            "meta": {"source": "import"}
        }) else {
            unreachable!()
        };
        let fields = fields_from_json(map).unwrap();
        assert_eq!(fields.first_name.as_deref(), Some("Jane"));
        assert_eq!(fields.last_name, None);
    }

    #[test]
    fn test_nested_json_is_rejected() {
        let Value::Object(map) = json!({"firstName": {"$gt": ""}}) else {
            unreachable!()
        };
        assert!(matches!(
            fields_from_json(map),
            Err(AppError::Validation(_))
        ));
    }
}
