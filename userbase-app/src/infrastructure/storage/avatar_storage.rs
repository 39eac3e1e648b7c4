use crate::domain::{avatar_file_name, avatar_path};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use userbase_errors::{AppError, UploadError};

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// A file written by [`AvatarStorage::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAvatar {
    pub file_name: String,
    /// Value recorded in the user's `avatar` field.
    pub relative_path: String,
}

/// Local directory holding uploaded avatar images.
#[derive(Debug, Clone)]
pub struct AvatarStorage {
    root: PathBuf,
    max_file_bytes: usize,
}

impl AvatarStorage {
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// On-disk location of a stored avatar path. Only the filename component
    /// is used, so a recorded path can never point outside the directory.
    pub fn resolve(&self, avatar: &str) -> Option<PathBuf> {
        avatar_file_name(avatar)
            .filter(|name| *name != "." && *name != "..")
            .map(|name| self.root.join(name))
    }

    /// Writes an uploaded image under a freshly generated name.
    pub async fn store(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredAvatar, AppError> {
        if bytes.len() > self.max_file_bytes {
            return Err(UploadError::FileTooLarge.into());
        }
        let extension = image_extension(original_name, content_type)?;
        let file_name = generate_file_name(&extension);

        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to save {}: {}", file_name, e)))?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Stored avatar");
        Ok(StoredAvatar {
            relative_path: avatar_path(&file_name),
            file_name,
        })
    }

    /// Deletes the file behind a stored avatar path. A file that is already
    /// gone is not an error.
    pub async fn remove(&self, avatar: &str) -> Result<(), AppError> {
        let Some(path) = self.resolve(avatar) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed avatar");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Avatar file already missing");
                Ok(())
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Lowercased extension to store the upload under, if it is an image.
fn image_extension(original_name: &str, content_type: Option<&str>) -> Result<String, UploadError> {
    let from_name = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    if let Some(ext) = from_name.as_deref() {
        if ALLOWED_EXTENSIONS.contains(&ext) {
            return Ok(ext.to_string());
        }
    }

    let from_mime = match content_type.map(|ct| ct.to_ascii_lowercase()).as_deref() {
        Some("image/jpeg") => Some("jpg"),
        Some("image/png") => Some("png"),
        Some("image/gif") => Some("gif"),
        Some("image/webp") => Some("webp"),
        _ => None,
    };

    match (from_name, from_mime) {
        (None, Some(ext)) => Ok(ext.to_string()),
        _ => Err(UploadError::InvalidFileType(original_name.to_string())),
    }
}

fn generate_file_name(extension: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        &suffix[..12],
        extension
    )
}
