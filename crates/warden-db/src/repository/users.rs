//! User operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;
use crate::store::UserStore;

const USER_COLUMNS: &str = "id, username, fullname, phone, email, password_hash, gender, bio, \
                            picture_id, role_id, created_at, updated_at";

#[async_trait]
impl UserStore for Database {
    async fn get_user_by_username(&self, username: &str) -> Result<User, DbError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("User '{}'", username)))?;

        Ok(User::try_from(&row)?)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, DbError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("User {}", id)))?;

        Ok(User::try_from(&row)?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Uniqueness and the role reference are enforced by the schema, so a
        // concurrent insert of the same username loses here, not earlier.
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, fullname, phone, email, password_hash, gender, bio,
                               picture_id, role_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.fullname)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.gender)
        .bind(&user.bio)
        .bind(user.picture_id)
        .bind(user.role_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;

        let id: i64 = result.get("id");
        debug!("Inserted user {} with id {}", user.username, id);

        Ok(User {
            id,
            username: user.username,
            fullname: user.fullname,
            phone: user.phone,
            email: user.email,
            password_hash: user.password_hash,
            gender: user.gender,
            bio: user.bio,
            picture_id: user.picture_id,
            role_id: user.role_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRole;
    use crate::repository::test_support::open_temp_db;
    use crate::store::RoleStore;

    fn new_user(username: &str, email: &str, role_id: i64) -> NewUser {
        NewUser {
            username: username.to_string(),
            fullname: "Alice Liddell".to_string(),
            phone: "12345678901".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            gender: None,
            bio: None,
            picture_id: None,
            role_id,
        }
    }

    async fn seed_role(db: &Database) -> i64 {
        db.create_role(NewRole {
            name: "member".to_string(),
            desc: "Regular member".to_string(),
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let (db, _dir) = open_temp_db().await;
        let role_id = seed_role(&db).await;

        let created = db.create_user(new_user("alice", "a@x.com", role_id)).await.unwrap();
        assert!(created.id > 0);

        let by_name = db.get_user_by_username("alice").await.unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.email, "a@x.com");
        assert_eq!(by_name.role_id, role_id);
        assert!(by_name.gender.is_none());

        let by_id = db.get_user_by_id(created.id).await.unwrap();
        assert_eq!(by_id.username, "alice");
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let (db, _dir) = open_temp_db().await;

        let err = db.get_user_by_username("nobody").await.unwrap_err();
        assert!(err.is_not_found());

        let err = db.get_user_by_id(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_by_schema() {
        let (db, _dir) = open_temp_db().await;
        let role_id = seed_role(&db).await;

        db.create_user(new_user("alice", "a@x.com", role_id)).await.unwrap();
        let err = db
            .create_user(new_user("alice", "other@x.com", role_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(ref column) if column == "username"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_schema() {
        let (db, _dir) = open_temp_db().await;
        let role_id = seed_role(&db).await;

        db.create_user(new_user("alice", "a@x.com", role_id)).await.unwrap();
        let err = db.create_user(new_user("bob", "a@x.com", role_id)).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(ref column) if column == "email"));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let (db, _dir) = open_temp_db().await;

        let err = db.create_user(new_user("alice", "a@x.com", 99)).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidReference(_)));
        assert!(db.get_user_by_username("alice").await.unwrap_err().is_not_found());
    }
}
