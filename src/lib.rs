// Library exports for the Nostr Adboard backend

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use app::{build_router, AppState};
pub use app_config::{AppConfig, StorageBackend, CONFIG};
pub use db::DieselPool;
pub use identity::{
    generate_key_pair, verify_key_pair, ApiClient, KeyPair, SessionManager,
};
pub use models::{Ad, User};
pub use storage::{MemStorage, PgStorage, Storage, StorageError};
pub use utils::ApiError;
