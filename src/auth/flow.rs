//! The authentication state machine.
//!
//! Each function here is a pure guard evaluation: given the relevant
//! credential snapshots and the submitted form, it either names the next UI
//! step plus the store effect to apply, or returns the error to show inline.
//! A guard failure never changes state and never touches a store; the
//! handlers in [`super::handlers`] are the only place effects are applied.

use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;
use utoipa::ToSchema;

use super::password::verify_password;
use crate::model::credential::Credential;

/// The UI steps a client can be on. Responses name the next step so the
/// client does not duplicate the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthStep {
    Login,
    SetPassword,
    ChangePassword,
    ForgotPassword,
    Dashboard,
}

/// Store effect a successful transition asks for. Each maps to exactly one
/// single-record write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    CreateSession,
    StoreHash { phone: String, hash: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub next: AuthStep,
    pub effect: Effect,
}

/// Inline-reported guard failures. State stays unchanged for all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("phone number must be 10 digits")]
    InvalidPhone,
    #[error("phone number not found")]
    UnknownPhone,
    #[error("incorrect password")]
    WrongPassword,
    #[error("incorrect current password")]
    WrongCurrentPassword,
    #[error("new password must not be empty")]
    EmptyNewPassword,
    #[error("new password and confirmation do not match")]
    PasswordMismatch,
    #[error("a password is already set for this phone number")]
    PasswordAlreadySet,
    #[error("employee phone number not found")]
    UnknownTargetPhone,
    #[error("administrator phone number not found")]
    UnknownAdminPhone,
    #[error("not the administrator")]
    NotAdministrator,
    #[error("incorrect administrator password")]
    WrongAdminPassword,
}

fn validate_new_password(new: &str, confirm: &str) -> Result<(), FlowError> {
    if new.is_empty() {
        return Err(FlowError::EmptyNewPassword);
    }
    if new != confirm {
        return Err(FlowError::PasswordMismatch);
    }
    Ok(())
}

/// `login` step, submit phone + password.
///
/// An unset hash routes to the set-password step without ever attempting
/// verification — a lifecycle state, not an error.
pub fn login(credential: Option<&Credential>, password: &str) -> Result<FlowOutcome, FlowError> {
    let credential = credential.ok_or(FlowError::UnknownPhone)?;

    match credential.hash() {
        None => Ok(FlowOutcome {
            next: AuthStep::SetPassword,
            effect: Effect::None,
        }),
        Some(hash) if verify_password(password, hash) => Ok(FlowOutcome {
            next: AuthStep::Dashboard,
            effect: Effect::CreateSession,
        }),
        Some(_) => Err(FlowError::WrongPassword),
    }
}

/// `set_password` step, first-login password creation. Only valid while the
/// stored hash is unset; on success the client returns to `login`.
pub fn set_password(
    credential: Option<&Credential>,
    new: &str,
    confirm: &str,
    hash: impl FnOnce(&str) -> String,
) -> Result<FlowOutcome, FlowError> {
    let credential = credential.ok_or(FlowError::UnknownPhone)?;
    if credential.hash().is_some() {
        return Err(FlowError::PasswordAlreadySet);
    }
    validate_new_password(new, confirm)?;

    Ok(FlowOutcome {
        next: AuthStep::Login,
        effect: Effect::StoreHash {
            phone: credential.phone.clone(),
            hash: hash(new),
        },
    })
}

/// `change_password` step, from the dashboard. Requires the current password
/// to verify; on success the client returns to `dashboard`.
pub fn change_password(
    credential: &Credential,
    current: &str,
    new: &str,
    confirm: &str,
    hash: impl FnOnce(&str) -> String,
) -> Result<FlowOutcome, FlowError> {
    let stored = credential.hash().ok_or(FlowError::WrongCurrentPassword)?;
    if !verify_password(current, stored) {
        return Err(FlowError::WrongCurrentPassword);
    }
    validate_new_password(new, confirm)?;

    Ok(FlowOutcome {
        next: AuthStep::Dashboard,
        effect: Effect::StoreHash {
            phone: credential.phone.clone(),
            hash: hash(new),
        },
    })
}

/// `forgot_password` step: an admin-assisted reset. Guards run in the
/// original order — target exists, admin exists, admin is the single
/// configured administrator, admin password verifies, new password valid.
/// Any failing guard leaves the target's hash untouched.
#[allow(clippy::too_many_arguments)]
pub fn reset_password(
    target: Option<&Credential>,
    admin: Option<&Credential>,
    configured_admin_phone: &str,
    admin_phone: &str,
    admin_password: &str,
    new: &str,
    confirm: &str,
    hash: impl FnOnce(&str) -> String,
) -> Result<FlowOutcome, FlowError> {
    let target = target.ok_or(FlowError::UnknownTargetPhone)?;
    let admin = admin.ok_or(FlowError::UnknownAdminPhone)?;
    if admin_phone != configured_admin_phone {
        return Err(FlowError::NotAdministrator);
    }
    let admin_hash = admin.hash().ok_or(FlowError::WrongAdminPassword)?;
    if !verify_password(admin_password, admin_hash) {
        return Err(FlowError::WrongAdminPassword);
    }
    validate_new_password(new, confirm)?;

    Ok(FlowOutcome {
        next: AuthStep::Login,
        effect: Effect::StoreHash {
            phone: target.phone.clone(),
            hash: hash(new),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    const ADMIN_PHONE: &str = "0899999999";

    fn cred(phone: &str, name: &str, hash: Option<String>) -> Credential {
        Credential {
            phone: phone.to_string(),
            name: name.to_string(),
            password_hash: hash,
        }
    }

    fn fake_hash(p: &str) -> String {
        format!("hashed:{p}")
    }

    #[test]
    fn unknown_phone_stays_at_login() {
        assert_eq!(login(None, "whatever"), Err(FlowError::UnknownPhone));
    }

    #[test]
    fn unset_hash_routes_to_set_password_without_verification() {
        for stored in [None, Some("null".to_string()), Some(String::new())] {
            let c = cred("0812345678", "Somboon", stored);
            let outcome = login(Some(&c), "anything at all").unwrap();
            assert_eq!(outcome.next, AuthStep::SetPassword);
            assert_eq!(outcome.effect, Effect::None);
        }
    }

    #[test]
    fn wrong_password_stays_at_login_with_no_session() {
        let c = cred("0812345678", "Somboon", Some(hash_password("right")));
        assert_eq!(login(Some(&c), "wrong"), Err(FlowError::WrongPassword));
    }

    #[test]
    fn correct_password_reaches_dashboard_and_creates_session() {
        let c = cred("0812345678", "Somboon", Some(hash_password("right")));
        let outcome = login(Some(&c), "right").unwrap();
        assert_eq!(outcome.next, AuthStep::Dashboard);
        assert_eq!(outcome.effect, Effect::CreateSession);
    }

    #[test]
    fn set_password_validates_and_returns_to_login() {
        let c = cred("0812345678", "Somboon", None);

        assert_eq!(
            set_password(Some(&c), "", "", fake_hash),
            Err(FlowError::EmptyNewPassword)
        );
        assert_eq!(
            set_password(Some(&c), "a", "b", fake_hash),
            Err(FlowError::PasswordMismatch)
        );

        let outcome = set_password(Some(&c), "new", "new", fake_hash).unwrap();
        assert_eq!(outcome.next, AuthStep::Login);
        assert_eq!(
            outcome.effect,
            Effect::StoreHash {
                phone: "0812345678".to_string(),
                hash: "hashed:new".to_string()
            }
        );
    }

    #[test]
    fn set_password_rejected_once_a_hash_exists() {
        let c = cred("0812345678", "Somboon", Some(hash_password("set")));
        assert_eq!(
            set_password(Some(&c), "new", "new", fake_hash),
            Err(FlowError::PasswordAlreadySet)
        );
    }

    #[test]
    fn change_password_requires_current_to_verify() {
        let c = cred("0812345678", "Somboon", Some(hash_password("old")));

        assert_eq!(
            change_password(&c, "not-old", "new", "new", fake_hash),
            Err(FlowError::WrongCurrentPassword)
        );
        assert_eq!(
            change_password(&c, "old", "", "", fake_hash),
            Err(FlowError::EmptyNewPassword)
        );
        assert_eq!(
            change_password(&c, "old", "new", "other", fake_hash),
            Err(FlowError::PasswordMismatch)
        );

        let outcome = change_password(&c, "old", "new", "new", fake_hash).unwrap();
        assert_eq!(outcome.next, AuthStep::Dashboard);
    }

    #[test]
    fn reset_blocked_by_each_failing_guard() {
        let target = cred("0812345678", "Somboon", Some(hash_password("old")));
        let admin = cred(ADMIN_PHONE, "Admin", Some(hash_password("admin-pw")));

        // target unknown
        assert_eq!(
            reset_password(
                None,
                Some(&admin),
                ADMIN_PHONE,
                ADMIN_PHONE,
                "admin-pw",
                "new",
                "new",
                fake_hash
            ),
            Err(FlowError::UnknownTargetPhone)
        );

        // admin unknown
        assert_eq!(
            reset_password(
                Some(&target),
                None,
                ADMIN_PHONE,
                ADMIN_PHONE,
                "admin-pw",
                "new",
                "new",
                fake_hash
            ),
            Err(FlowError::UnknownAdminPhone)
        );

        // submitted admin phone is a known user but not THE administrator
        let other = cred("0811111111", "Other", Some(hash_password("pw")));
        assert_eq!(
            reset_password(
                Some(&target),
                Some(&other),
                ADMIN_PHONE,
                "0811111111",
                "pw",
                "new",
                "new",
                fake_hash
            ),
            Err(FlowError::NotAdministrator)
        );

        // wrong admin password
        assert_eq!(
            reset_password(
                Some(&target),
                Some(&admin),
                ADMIN_PHONE,
                ADMIN_PHONE,
                "wrong",
                "new",
                "new",
                fake_hash
            ),
            Err(FlowError::WrongAdminPassword)
        );

        // empty / mismatched new password
        assert_eq!(
            reset_password(
                Some(&target),
                Some(&admin),
                ADMIN_PHONE,
                ADMIN_PHONE,
                "admin-pw",
                "",
                "",
                fake_hash
            ),
            Err(FlowError::EmptyNewPassword)
        );
        assert_eq!(
            reset_password(
                Some(&target),
                Some(&admin),
                ADMIN_PHONE,
                ADMIN_PHONE,
                "admin-pw",
                "new",
                "other",
                fake_hash
            ),
            Err(FlowError::PasswordMismatch)
        );
    }

    #[test]
    fn reset_succeeds_when_every_guard_passes() {
        let target = cred("0812345678", "Somboon", Some(hash_password("old")));
        let admin = cred(ADMIN_PHONE, "Admin", Some(hash_password("admin-pw")));

        let outcome = reset_password(
            Some(&target),
            Some(&admin),
            ADMIN_PHONE,
            ADMIN_PHONE,
            "admin-pw",
            "new",
            "new",
            fake_hash,
        )
        .unwrap();

        assert_eq!(outcome.next, AuthStep::Login);
        assert_eq!(
            outcome.effect,
            Effect::StoreHash {
                phone: "0812345678".to_string(),
                hash: "hashed:new".to_string()
            }
        );
    }
}
