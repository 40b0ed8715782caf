//! In-memory store
//!
//! A deterministic stand-in for [`Database`](crate::Database) that enforces
//! the same constraints: unique username, unique email, unique role name and
//! an existing role for every user. Ids start at 1 and increase by one.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::DbError;
use crate::models::{NewRole, NewUser, Role, User};
use crate::store::{RoleStore, UserStore};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    roles: Vec<Role>,
}

/// In-memory implementation of [`UserStore`] and [`RoleStore`]
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted users
    pub fn user_count(&self) -> usize {
        self.inner.lock().users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user_by_username(&self, username: &str) -> Result<User, DbError> {
        self.inner
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("User '{}'", username)))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, DbError> {
        self.inner
            .lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("User {}", id)))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        // Check and insert under one lock, like a single INSERT statement.
        let mut inner = self.inner.lock();

        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(DbError::Duplicate("username".to_string()));
        }
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(DbError::Duplicate("email".to_string()));
        }
        if !inner.roles.iter().any(|r| r.id == user.role_id) {
            return Err(DbError::InvalidReference(format!(
                "Role {} does not exist",
                user.role_id
            )));
        }

        let now = Utc::now();
        let created = User {
            id: inner.users.len() as i64 + 1,
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
        };
        inner.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn get_role_by_name(&self, name: &str) -> Result<Role, DbError> {
        self.inner
            .lock()
            .roles
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("Role '{}'", name)))
    }

    async fn get_role_by_id(&self, id: i64) -> Result<Role, DbError> {
        self.inner
            .lock()
            .roles
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("Role {}", id)))
    }

    async fn create_role(&self, role: NewRole) -> Result<Role, DbError> {
        let mut inner = self.inner.lock();

        if inner.roles.iter().any(|r| r.name == role.name) {
            return Err(DbError::Duplicate("name".to_string()));
        }

        let created = Role {
            id: inner.roles.len() as i64 + 1,
            name: role.name,
            desc: role.desc,
        };
        inner.roles.push(created.clone());
        Ok(created)
    }

    async fn has_roles(&self) -> Result<bool, DbError> {
        Ok(!self.inner.lock().roles.is_empty())
    }
}
