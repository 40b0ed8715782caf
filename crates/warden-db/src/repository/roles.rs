//! Role operations

use async_trait::async_trait;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewRole, Role};
use crate::repository::Database;
use crate::store::RoleStore;

#[async_trait]
impl RoleStore for Database {
    async fn get_role_by_name(&self, name: &str) -> Result<Role, DbError> {
        let row = sqlx::query("SELECT id, name, description FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Role '{}'", name)))?;

        Ok(Role::try_from(&row)?)
    }

    async fn get_role_by_id(&self, id: i64) -> Result<Role, DbError> {
        let row = sqlx::query("SELECT id, name, description FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Role {}", id)))?;

        Ok(Role::try_from(&row)?)
    }

    async fn create_role(&self, role: NewRole) -> Result<Role, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO roles (name, description)
            VALUES (?, ?)
            RETURNING id
            "#,
        )
        .bind(&role.name)
        .bind(&role.desc)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(Role {
            id: result.get("id"),
            name: role.name,
            desc: role.desc,
        })
    }

    async fn has_roles(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM roles")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}
