use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-side session, keyed by an opaque token the client holds.
///
/// The session store owns the lifetime: created on login, deleted on logout.
/// Tokens are UUIDv4 and never reused; each successful login mints a fresh
/// one without touching the user's other sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}
