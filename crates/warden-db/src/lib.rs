//! Warden Database Layer
//!
//! This crate provides the persistence contracts for Warden (the
//! [`UserStore`] and [`RoleStore`] traits) together with a SQLite
//! implementation via sqlx and an in-memory implementation for tests.

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use memory::MemoryStore;
pub use models::*;
pub use repository::Database;
pub use store::{RoleStore, UserStore};
