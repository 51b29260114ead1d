pub mod file;
pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::credential::Credential;
use crate::model::session::Session;

/// Store failures are fatal for the current render: there is no safe default
/// to fall back to when the backend is unreachable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Key-value credential store, keyed by 10-digit phone number. Backed by a
/// local JSON document or a remote database; callers must not assume which.
/// Each write is a single-record atomic upsert.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, phone: &str) -> Result<Option<Credential>, StoreError>;
    async fn upsert(&self, credential: &Credential) -> Result<(), StoreError>;
}

/// Key-value session store: create / get / delete only.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), StoreError>;
    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError>;
    async fn delete(&self, token: &str) -> Result<(), StoreError>;
}
