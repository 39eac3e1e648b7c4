use super::entities::{user, User};
use crate::domain::{NewUser, UserPatch};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_user: &NewUser) -> Result<user::Model, DbErr> {
        let now = chrono::Utc::now();
        let active = user::ActiveModel {
            id: Set(Uuid::now_v7()),
            first_name: Set(new_user.first_name.clone()),
            last_name: Set(new_user.last_name.clone()),
            phone_number: Set(new_user.phone_number.clone()),
            email: Set(new_user.email.clone()),
            is_active: Set(new_user.is_active),
            avatar: Set(new_user.avatar.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(&self.db).await
    }

    /// Every user, most recently created first.
    pub async fn find_all_newest_first(&self) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
    }

    /// Writes only the fields present in `patch` over `existing`.
    pub async fn update(
        &self,
        existing: user::Model,
        patch: &UserPatch,
    ) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = existing.into();
        if let Some(first_name) = &patch.first_name {
            active.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            active.last_name = Set(last_name.clone());
        }
        if let Some(phone_number) = &patch.phone_number {
            active.phone_number = Set(phone_number.clone());
        }
        if let Some(email) = &patch.email {
            active.email = Set(email.clone());
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(avatar) = &patch.avatar {
            active.avatar = Set(avatar.clone());
        }
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await
    }

    /// Returns the number of rows removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = User::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, DbErr> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDb;

    fn new_user(first_name: &str, email: &str) -> NewUser {
        NewUser {
            first_name: first_name.into(),
            last_name: "Doe".into(),
            phone_number: "9876543210".into(),
            email: email.into(),
            is_active: true,
            avatar: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.connection.clone());

        let created = repo.create(&new_user("John", "john@example.com")).await.unwrap();
        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(repo.find_by_id(Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_all_is_newest_first() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.connection.clone());

        for name in ["first", "second", "third"] {
            repo.create(&new_user(name, &format!("{}@example.com", name)))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo
            .find_all_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.first_name)
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.connection.clone());
        let created = repo.create(&new_user("John", "john@example.com")).await.unwrap();

        let patch = UserPatch {
            phone_number: Some("111".into()),
            is_active: Some(false),
            ..Default::default()
        };
        let updated = repo.update(created.clone(), &patch).await.unwrap();

        assert_eq!(updated.phone_number, "111");
        assert!(!updated.is_active);
        assert_eq!(updated.first_name, created.first_name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_and_email_lookup() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.connection.clone());
        let created = repo.create(&new_user("John", "john@example.com")).await.unwrap();

        assert!(repo.exists_by_email("john@example.com").await.unwrap());
        assert!(!repo.exists_by_email("jane@example.com").await.unwrap());

        assert_eq!(repo.delete(created.id).await.unwrap(), 1);
        assert_eq!(repo.delete(created.id).await.unwrap(), 0);
        assert!(!repo.exists_by_email("john@example.com").await.unwrap());
    }
}
