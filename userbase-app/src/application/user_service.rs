use crate::domain::{
    image_url, DeleteResult, EmailCheck, User, UserFields, UserListItem, UserProfile,
};
use crate::infrastructure::db::UserRepository;
use crate::infrastructure::storage::{AvatarStorage, StoredAvatar};
use sea_orm::DbErr;
use userbase_errors::AppError;
use uuid::Uuid;

/// The user operations behind the HTTP routes.
///
/// Every method is an independent request handler; the only shared state is
/// the repository's connection handle.
pub struct UserService {
    repo: UserRepository,
    storage: AvatarStorage,
    public_base_url: String,
}

impl UserService {
    pub fn new(repo: UserRepository, storage: AvatarStorage, public_base_url: String) -> Self {
        Self {
            repo,
            storage,
            public_base_url,
        }
    }

    pub async fn create(
        &self,
        fields: UserFields,
        upload: Option<StoredAvatar>,
    ) -> Result<User, AppError> {
        let avatar = upload
            .as_ref()
            .map(|u| u.relative_path.clone())
            .unwrap_or_default();

        let result = match fields.into_new_user(avatar) {
            Ok(new_user) => self.repo.create(&new_user).await.map_err(db_error),
            Err(e) => Err(e),
        };

        match result {
            Ok(model) => {
                tracing::info!(id = %model.id, "Created user");
                Ok(model.into())
            }
            Err(e) => {
                self.discard_upload(upload.as_ref()).await;
                Err(e)
            }
        }
    }

    pub async fn find_one(&self, id: &str) -> Result<UserProfile, AppError> {
        let id = parse_id(id)?;
        let user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or(AppError::NotFound)?;

        Ok(UserProfile {
            image_url: image_url(&self.public_base_url, &user.avatar).unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            email: user.email,
            is_active: user.is_active,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<UserListItem>, AppError> {
        let users = self.repo.find_all_newest_first().await.map_err(db_error)?;

        Ok(users
            .into_iter()
            .map(|model| {
                let user = User::from(model);
                UserListItem {
                    image_url: image_url(&self.public_base_url, &user.avatar),
                    user,
                }
            })
            .collect())
    }

    /// Applies a partial update. With a new upload, the previous file is
    /// deleted first and the record is written after; the two steps are not
    /// atomic.
    pub async fn update(
        &self,
        id: &str,
        fields: UserFields,
        upload: Option<StoredAvatar>,
    ) -> Result<User, AppError> {
        match self.apply_update(id, fields, upload.as_ref()).await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.discard_upload(upload.as_ref()).await;
                Err(e)
            }
        }
    }

    async fn apply_update(
        &self,
        id: &str,
        fields: UserFields,
        upload: Option<&StoredAvatar>,
    ) -> Result<User, AppError> {
        let id = parse_id(id)?;
        let mut patch = fields.into_patch()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or(AppError::NotFound)?;

        if let Some(upload) = upload {
            if !existing.avatar.is_empty() {
                self.storage.remove(&existing.avatar).await?;
            }
            patch.avatar = Some(upload.relative_path.clone());
        }

        let updated = self.repo.update(existing, &patch).await.map_err(db_error)?;
        tracing::info!(id = %updated.id, "Updated user");
        Ok(updated.into())
    }

    /// Deletes the avatar file, then the record.
    pub async fn delete(&self, id: &str) -> Result<DeleteResult, AppError> {
        let id = parse_id(id)?;
        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or(AppError::NotFound)?;

        if !existing.avatar.is_empty() {
            self.storage.remove(&existing.avatar).await?;
        }

        let deleted_count = self.repo.delete(id).await.map_err(db_error)?;
        tracing::info!(%id, deleted_count, "Deleted user");
        Ok(DeleteResult { deleted_count })
    }

    pub async fn email_exists(&self, email: Option<&str>) -> Result<EmailCheck, AppError> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Validation("email is required".to_string()))?;

        let exists = self.repo.exists_by_email(email).await.map_err(db_error)?;
        Ok(EmailCheck { exists })
    }

    async fn discard_upload(&self, upload: Option<&StoredAvatar>) {
        let Some(upload) = upload else { return };
        if let Err(e) = self.storage.remove(&upload.relative_path).await {
            tracing::warn!("Failed to discard upload {}: {}", upload.file_name, e);
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(raw.to_string()))
}

fn db_error(err: DbErr) -> AppError {
    tracing::warn!("Database error: {}", err);
    AppError::Database(err.to_string())
}
