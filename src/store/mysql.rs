use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use super::{CredentialStore, SessionStore, StoreError};
use crate::model::credential::Credential;
use crate::model::session::Session;

/// Remote credential store on the shared MySQL instance.
///
/// Queries are bound at runtime so the crate builds without a live database;
/// the schema is one row per phone:
///
/// ```sql
/// CREATE TABLE users (
///     phone      VARCHAR(10) PRIMARY KEY,
///     name       VARCHAR(255) NOT NULL,
///     password   VARCHAR(255) NULL
/// );
/// ```
pub struct MySqlCredentialStore {
    pool: MySqlPool,
}

impl MySqlCredentialStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    phone: String,
    name: String,
    password: Option<String>,
}

#[async_trait]
impl CredentialStore for MySqlCredentialStore {
    async fn get(&self, phone: &str) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT phone, name, password
            FROM users
            WHERE phone = ?
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Credential {
            phone: r.phone,
            name: r.name,
            password_hash: r.password,
        }))
    }

    async fn upsert(&self, credential: &Credential) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (phone, name, password)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE name = VALUES(name), password = VALUES(password)
            "#,
        )
        .bind(&credential.phone)
        .bind(&credential.name)
        .bind(&credential.password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Session records on the same instance:
///
/// ```sql
/// CREATE TABLE sessions (
///     token      VARCHAR(36) PRIMARY KEY,
///     phone      VARCHAR(10) NOT NULL,
///     created_at TIMESTAMP NOT NULL
/// );
/// ```
pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    phone: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn create(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, phone, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&session.token)
        .bind(&session.phone)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, phone, created_at
            FROM sessions
            WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Session {
            token: r.token,
            phone: r.phone,
            created_at: r.created_at,
        }))
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
