//! Response DTOs for the identity API
//!
//! Request payloads are the `warden-core` request types, deserialized
//! directly.

use serde::Serialize;
use warden_db::User;

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// User response (without password)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub phone: String,
    pub email: String,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub picture_id: Option<i64>,
    pub role_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            fullname: u.fullname,
            phone: u.phone,
            email: u.email,
            gender: u.gender,
            bio: u.bio,
            picture_id: u.picture_id,
            role_id: u.role_id,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}
