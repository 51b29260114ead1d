use serde::{Deserialize, Serialize};

/// One entry of the credential store, keyed by a 10-digit phone number.
///
/// `password_hash == None` means the employee has not set a password yet and
/// must be routed to the set-password step on their first login. Legacy
/// documents encode the unset state as the literal string `"null"` or an
/// empty string; `hash()` folds those into `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub phone: String,
    pub name: String,
    #[serde(rename = "password")]
    pub password_hash: Option<String>,
}

impl Credential {
    /// The stored hash, or `None` when no password has been set.
    pub fn hash(&self) -> Option<&str> {
        match self.password_hash.as_deref() {
            None | Some("") | Some("null") => None,
            Some(h) => Some(h),
        }
    }
}

/// A 10-digit phone number, the primary key of the credential store.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_null_markers_mean_unset() {
        let mut cred = Credential {
            phone: "0812345678".into(),
            name: "Somboon".into(),
            password_hash: None,
        };
        assert_eq!(cred.hash(), None);

        cred.password_hash = Some("null".into());
        assert_eq!(cred.hash(), None);

        cred.password_hash = Some(String::new());
        assert_eq!(cred.hash(), None);

        cred.password_hash = Some("$argon2id$...".into());
        assert_eq!(cred.hash(), Some("$argon2id$..."));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("0812345678"));
        assert!(!is_valid_phone("081234567"));
        assert!(!is_valid_phone("08123456789"));
        assert!(!is_valid_phone("08123456a8"));
    }
}
