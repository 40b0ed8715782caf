//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub phone: String,
    pub email: String,
    /// Argon2 PHC string, never the plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub picture_id: Option<i64>,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub desc: String,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub picture_id: Option<i64>,
    pub role_id: i64,
}

/// New role (for insertion)
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub desc: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            fullname: row.try_get("fullname")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            gender: row.try_get("gender")?,
            bio: row.try_get("bio")?,
            picture_id: row.try_get("picture_id")?,
            role_id: row.try_get("role_id")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Role {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            desc: row.try_get("description")?,
        })
    }
}
