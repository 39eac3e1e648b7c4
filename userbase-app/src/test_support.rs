use crate::infrastructure::db::{create_connection, run_migrations};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// A migrated SQLite database living in its own temporary directory.
pub struct TestDb {
    pub connection: DatabaseConnection,
    pub dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("users.db").display());
        let connection = create_connection(&url).await.unwrap();
        run_migrations(&connection).await.unwrap();
        Self { connection, dir }
    }
}
