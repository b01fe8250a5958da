// Storage abstraction over the ad/user repository.
//
// One trait, two backends selected at startup: an in-memory map store for
// tests and single-process deployments, and a PostgreSQL store behind a
// diesel-async pool. Absent records surface as `Ok(None)` / `Ok(false)`,
// never as errors; `StorageError` is reserved for backend failures.

pub mod memory;
pub mod postgres;

pub use memory::MemStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Ad, NewAd, NewUser, UpdateAdRequest, User};

#[derive(Error, Debug)]
pub enum StorageError {
    /// Unique-column violation; the payload names the offending column.
    #[error("duplicate value for {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("connection pool error: {0}")]
    Pool(String),
}

impl From<diesel::result::Error> for StorageError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match &err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                // Constraint names follow the users_<column>_key convention
                let column = match info.constraint_name() {
                    Some(name) if name.contains("npub") => "npub",
                    Some(name) if name.contains("username") => "username",
                    _ => "unique column",
                };
                StorageError::Duplicate(column.to_string())
            },
            _ => StorageError::Database(err.to_string()),
        }
    }
}

/// Repository contract shared by all backends.
#[async_trait]
pub trait Storage: Send + Sync {
    // User methods
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError>;
    async fn user(&self, id: i32) -> Result<Option<User>, StorageError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    async fn user_by_npub(&self, npub: &str) -> Result<Option<User>, StorageError>;

    // Ad methods
    async fn create_ad(&self, ad: NewAd) -> Result<Ad, StorageError>;
    async fn ad(&self, id: i32) -> Result<Option<Ad>, StorageError>;
    async fn ads_by_user(&self, user_id: i32) -> Result<Vec<Ad>, StorageError>;
    async fn all_ads(&self) -> Result<Vec<Ad>, StorageError>;
    async fn update_ad(
        &self,
        id: i32,
        changes: UpdateAdRequest,
    ) -> Result<Option<Ad>, StorageError>;
    async fn delete_ad(&self, id: i32) -> Result<bool, StorageError>;
    async fn increment_impressions(&self, id: i32) -> Result<Option<Ad>, StorageError>;
    async fn increment_clicks(&self, id: i32) -> Result<Option<Ad>, StorageError>;

    /// Backend liveness probe for the /health endpoint.
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Backend name reported by /health.
    fn backend_name(&self) -> &'static str;
}
