//! Store traits
//!
//! The flows in `warden-core` only see these two traits, so the SQLite
//! [`Database`](crate::Database) and the [`MemoryStore`](crate::MemoryStore)
//! are interchangeable.

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewRole, NewUser, Role, User};

/// Persistence for user records
///
/// Lookups resolve to at most one record and return [`DbError::NotFound`]
/// when nothing matches.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<User, DbError>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: i64) -> Result<User, DbError>;

    /// Insert a new user, assigning its id and timestamps
    ///
    /// Fails with [`DbError::Duplicate`] when the username or email is
    /// already taken and [`DbError::InvalidReference`] when the role does
    /// not exist.
    async fn create_user(&self, user: NewUser) -> Result<User, DbError>;
}

/// Persistence for role records
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Get a role by name
    async fn get_role_by_name(&self, name: &str) -> Result<Role, DbError>;

    /// Get a role by ID
    async fn get_role_by_id(&self, id: i64) -> Result<Role, DbError>;

    /// Insert a new role. Fails with [`DbError::Duplicate`] on a taken name.
    async fn create_role(&self, role: NewRole) -> Result<Role, DbError>;

    /// Whether at least one role exists. Also serves as a store liveness check.
    async fn has_roles(&self) -> Result<bool, DbError>;
}
