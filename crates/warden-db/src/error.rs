//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint rejected the write. Carries the offending column.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// A foreign key did not resolve at write time.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

impl DbError {
    /// Classify an error returned by an INSERT.
    ///
    /// Constraint violations are surfaced as their own kinds so callers can
    /// tell a lost uniqueness race apart from an I/O failure.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DbError::Duplicate(constraint_column(db_err.message()).to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DbError::InvalidReference(db_err.message().to_string());
            }
        }
        DbError::Connection(err)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}

/// Extract the column from a SQLite constraint message such as
/// `UNIQUE constraint failed: users.email`.
fn constraint_column(message: &str) -> &str {
    message
        .rsplit_once('.')
        .map(|(_, column)| column.trim())
        .unwrap_or(message)
}
