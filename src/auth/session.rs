use chrono::Utc;
use uuid::Uuid;

use crate::model::credential::Credential;
use crate::model::session::Session;
use crate::store::{CredentialStore, SessionStore, StoreError};

/// Mints a fresh session for the phone. Tokens are UUIDv4; other concurrent
/// sessions of the same user are left alone.
pub async fn create(store: &dyn SessionStore, phone: &str) -> Result<Session, StoreError> {
    let session = Session {
        token: Uuid::new_v4().to_string(),
        phone: phone.to_string(),
        created_at: Utc::now(),
    };
    store.create(&session).await?;
    Ok(session)
}

/// Resolves a token back to its credential.
///
/// Returns `None` for an unknown token, and also when the session's phone no
/// longer exists in the credential store — in that case the orphaned session
/// is deleted on the way out.
pub async fn restore(
    sessions: &dyn SessionStore,
    credentials: &dyn CredentialStore,
    token: &str,
) -> Result<Option<Credential>, StoreError> {
    let Some(session) = sessions.get(token).await? else {
        return Ok(None);
    };

    match credentials.get(&session.phone).await? {
        Some(credential) => Ok(Some(credential)),
        None => {
            sessions.delete(token).await?;
            Ok(None)
        }
    }
}

/// Deletes the session. Idempotent.
pub async fn destroy(store: &dyn SessionStore, token: &str) -> Result<(), StoreError> {
    store.delete(token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::file::{FileCredentialStore, FileSessionStore};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hrboard-{name}-{}.json", Uuid::new_v4()))
    }

    #[actix_web::test]
    async fn restore_round_trip() {
        let users_path = temp_path("users");
        let sessions_path = temp_path("sessions");
        let credentials = FileCredentialStore::new(&users_path);
        let sessions = FileSessionStore::new(&sessions_path);

        credentials
            .upsert(&Credential {
                phone: "0812345678".to_string(),
                name: "Somboon".to_string(),
                password_hash: Some("$argon2id$hash".to_string()),
            })
            .await
            .unwrap();

        let session = create(&sessions, "0812345678").await.unwrap();

        let restored = restore(&sessions, &credentials, &session.token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.name, "Somboon");

        // a second login mints a different token
        let second = create(&sessions, "0812345678").await.unwrap();
        assert_ne!(session.token, second.token);

        // deleted token no longer restores
        destroy(&sessions, &session.token).await.unwrap();
        assert!(
            restore(&sessions, &credentials, &session.token)
                .await
                .unwrap()
                .is_none()
        );

        // unknown token never restores
        assert!(
            restore(&sessions, &credentials, "not-a-token")
                .await
                .unwrap()
                .is_none()
        );

        std::fs::remove_file(&users_path).ok();
        std::fs::remove_file(&sessions_path).ok();
    }

    #[actix_web::test]
    async fn orphaned_session_is_purged() {
        let users_path = temp_path("users");
        let sessions_path = temp_path("sessions");
        let credentials = FileCredentialStore::new(&users_path);
        let sessions = FileSessionStore::new(&sessions_path);

        // session exists but its phone was never (or no longer is) in the
        // credential store
        let session = create(&sessions, "0800000000").await.unwrap();
        assert!(
            restore(&sessions, &credentials, &session.token)
                .await
                .unwrap()
                .is_none()
        );
        assert!(sessions.get(&session.token).await.unwrap().is_none());

        std::fs::remove_file(&users_path).ok();
        std::fs::remove_file(&sessions_path).ok();
    }
}
