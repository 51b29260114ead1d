use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CredentialStore, SessionStore, StoreError};
use crate::model::credential::Credential;
use crate::model::session::Session;

/// Reads a JSON document that maps keys to entries. A missing file is an
/// empty store (first run), not an error.
fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<HashMap<String, T>, StoreError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = std::fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(serde_json::from_str(&raw)?)
}

/// Rewrites the whole document atomically: temp file in the same directory,
/// then rename over the original.
fn write_doc<T: Serialize>(path: &Path, doc: &HashMap<String, T>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Per-phone entry as persisted on disk; mirrors the remote document shape,
/// so a dump of the remote store drops straight in.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialDoc {
    name: String,
    password: Option<String>,
}

pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, phone: &str) -> Result<Option<Credential>, StoreError> {
        let _guard = self.lock.lock().expect("credential store lock poisoned");
        let doc: HashMap<String, CredentialDoc> = read_doc(&self.path)?;
        Ok(doc.get(phone).map(|entry| Credential {
            phone: phone.to_string(),
            name: entry.name.clone(),
            password_hash: entry.password.clone(),
        }))
    }

    async fn upsert(&self, credential: &Credential) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("credential store lock poisoned");
        let mut doc: HashMap<String, CredentialDoc> = read_doc(&self.path)?;
        doc.insert(
            credential.phone.clone(),
            CredentialDoc {
                name: credential.name.clone(),
                password: credential.password_hash.clone(),
            },
        );
        write_doc(&self.path, &doc)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionDoc {
    phone: String,
    created_at: DateTime<Utc>,
}

pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn create(&self, session: &Session) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("session store lock poisoned");
        let mut doc: HashMap<String, SessionDoc> = read_doc(&self.path)?;
        doc.insert(
            session.token.clone(),
            SessionDoc {
                phone: session.phone.clone(),
                created_at: session.created_at,
            },
        );
        write_doc(&self.path, &doc)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let _guard = self.lock.lock().expect("session store lock poisoned");
        let doc: HashMap<String, SessionDoc> = read_doc(&self.path)?;
        Ok(doc.get(token).map(|entry| Session {
            token: token.to_string(),
            phone: entry.phone.clone(),
            created_at: entry.created_at,
        }))
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("session store lock poisoned");
        let mut doc: HashMap<String, SessionDoc> = read_doc(&self.path)?;
        if doc.remove(token).is_some() {
            write_doc(&self.path, &doc)?;
        }
        Ok(())
    }
}
