use crate::application::UserService;
use crate::config::AppConfig;
use crate::infrastructure::db::{create_connection, run_migrations, UserRepository};
use crate::infrastructure::storage::AvatarStorage;
use sea_orm::{DatabaseConnection, DbErr};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<UserService>,
    pub storage: AvatarStorage,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect to the database: {0}")]
    Database(#[from] DbErr),

    #[error("Failed to prepare upload directory {path}: {source}")]
    UploadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl AppContext {
    /// Wires the services around an already open connection.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let storage = AvatarStorage::new(config.upload_dir.clone(), config.max_upload_bytes);
        let users = UserService::new(
            UserRepository::new(db),
            storage.clone(),
            config.public_base_url.clone(),
        );

        Self {
            users: Arc::new(users),
            storage,
            config: Arc::new(config),
        }
    }

    /// Opens the process-wide connection, creates the schema and the upload
    /// directory, then builds the context.
    pub async fn connect(config: AppConfig) -> Result<Self, StartupError> {
        let db = create_connection(&config.database_url).await?;
        run_migrations(&db).await?;
        tracing::info!("Database connected");

        let ctx = Self::new(db, config);
        ctx.storage
            .ensure_dir()
            .await
            .map_err(|source| StartupError::UploadDir {
                path: ctx.storage.root().to_path_buf(),
                source,
            })?;

        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_prepares_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("app.db").display()),
            port: 0,
            public_base_url: "http://localhost:3000".into(),
            upload_dir: dir.path().join("Storage/images"),
            public_dir: dir.path().join("public"),
            max_upload_bytes: 1024,
        };

        let ctx = AppContext::connect(config).await.unwrap();
        assert!(ctx.storage.root().is_dir());
        assert!(ctx.users.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_fails_on_bad_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: "nosuchdb://nowhere".into(),
            port: 0,
            public_base_url: "http://localhost:3000".into(),
            upload_dir: dir.path().join("images"),
            public_dir: dir.path().join("public"),
            max_upload_bytes: 1024,
        };
        assert!(matches!(
            AppContext::connect(config).await,
            Err(StartupError::Database(_))
        ));
    }
}
