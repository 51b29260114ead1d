use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::extractor::{AuthUser, bearer_token};
use crate::auth::flow::{self, AuthStep, Effect};
use crate::auth::password::hash_password;
use crate::auth::session;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::credential::{Credential, is_valid_phone};
use crate::store::{CredentialStore, SessionStore};

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "0812345678")]
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SetPasswordReq {
    #[schema(example = "0812345678")]
    pub phone: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangePasswordReq {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ForgotPasswordReq {
    /// Phone of the employee whose password is being reset.
    #[schema(example = "0812345678")]
    pub phone: String,
    #[schema(example = "0899999999")]
    pub admin_phone: String,
    pub admin_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Every auth response names the UI step the client should show next, so the
/// transition rules live on the server only.
#[derive(Serialize, ToSchema)]
pub struct StepResponse {
    pub step: AuthStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StepResponse {
    fn step(step: AuthStep) -> Self {
        Self {
            step,
            message: None,
            session_token: None,
            name: None,
        }
    }

    fn with_message(step: AuthStep, message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::step(step)
        }
    }
}

async fn persist_hash(
    credentials: &dyn CredentialStore,
    mut credential: Credential,
    hash: String,
) -> Result<(), ApiError> {
    credential.password_hash = Some(hash);
    credentials.upsert(&credential).await?;
    Ok(())
}

/// Login with phone + password.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Next step: dashboard with a fresh session token, or set_password on first login", body = StepResponse),
        (status = 400, description = "Malformed phone number"),
        (status = 401, description = "Unknown phone or wrong password"),
        (status = 500, description = "Credential store unreachable")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip_all, fields(phone = %body.phone))]
pub async fn login(
    body: web::Json<LoginReq>,
    credentials: web::Data<dyn CredentialStore>,
    sessions: web::Data<dyn SessionStore>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if !is_valid_phone(&body.phone) {
        return Err(flow::FlowError::InvalidPhone.into());
    }

    let credential = credentials.get(&body.phone).await?;
    let outcome = flow::login(credential.as_ref(), &body.password)?;

    match outcome.effect {
        Effect::CreateSession => {
            debug!("Password verified, creating session");
            let session = session::create(sessions.get_ref(), &body.phone).await?;
            info!("Login successful");
            Ok(HttpResponse::Ok().json(StepResponse {
                session_token: Some(session.token),
                name: credential.map(|c| c.name),
                ..StepResponse::step(outcome.next)
            }))
        }
        _ => {
            info!("No password set yet, routing to set_password");
            Ok(HttpResponse::Ok().json(StepResponse::with_message(
                outcome.next,
                "please set a password before your first login",
            )))
        }
    }
}

/// First-login password creation. Rejected once a password exists.
#[utoipa::path(
    post,
    path = "/auth/set-password",
    request_body = SetPasswordReq,
    responses(
        (status = 200, description = "Password stored; next step is login", body = StepResponse),
        (status = 400, description = "Malformed phone, empty or mismatched password, or one is already set"),
        (status = 401, description = "Unknown phone"),
        (status = 500, description = "Credential store unreachable")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_set_password", skip_all, fields(phone = %body.phone))]
pub async fn set_password(
    body: web::Json<SetPasswordReq>,
    credentials: web::Data<dyn CredentialStore>,
) -> Result<HttpResponse, ApiError> {
    if !is_valid_phone(&body.phone) {
        return Err(flow::FlowError::InvalidPhone.into());
    }

    let credential = credentials.get(&body.phone).await?;
    let outcome = flow::set_password(
        credential.as_ref(),
        &body.new_password,
        &body.confirm_password,
        hash_password,
    )?;

    if let Effect::StoreHash { hash, .. } = outcome.effect
        && let Some(credential) = credential
    {
        persist_hash(credentials.get_ref(), credential, hash).await?;
    }

    info!("Initial password stored");
    Ok(HttpResponse::Ok().json(StepResponse::with_message(
        outcome.next,
        "password saved, please log in",
    )))
}

/// Change the password of the logged-in employee.
//
// utoipa needs a literal path, so this documents the route under
// `config::DEFAULT_API_PREFIX`; an `API_PREFIX` override is not reflected here.
#[utoipa::path(
    put,
    path = "/api/password",
    request_body = ChangePasswordReq,
    responses(
        (status = 200, description = "Password updated; client stays on the dashboard", body = StepResponse),
        (status = 400, description = "Empty or mismatched new password"),
        (status = 401, description = "Missing/expired session or wrong current password"),
        (status = 500, description = "Store unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(name = "auth_change_password", skip_all, fields(phone = %auth.phone))]
pub async fn change_password(
    auth: AuthUser,
    body: web::Json<ChangePasswordReq>,
    credentials: web::Data<dyn CredentialStore>,
) -> Result<HttpResponse, ApiError> {
    let credential = credentials
        .get(&auth.phone)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("session no longer valid".to_string()))?;

    let outcome = flow::change_password(
        &credential,
        &body.current_password,
        &body.new_password,
        &body.confirm_password,
        hash_password,
    )?;

    if let Effect::StoreHash { hash, .. } = outcome.effect {
        persist_hash(credentials.get_ref(), credential, hash).await?;
    }

    info!("Password changed");
    Ok(HttpResponse::Ok().json(StepResponse::with_message(outcome.next, "password changed")))
}

/// Admin-assisted password reset for an employee who lost theirs.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordReq,
    responses(
        (status = 200, description = "Password reset; next step is login", body = StepResponse),
        (status = 400, description = "Malformed or unknown target/admin phone, non-administrator, or invalid new password"),
        (status = 401, description = "Wrong administrator password"),
        (status = 500, description = "Credential store unreachable")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_forgot_password", skip_all, fields(phone = %body.phone))]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordReq>,
    credentials: web::Data<dyn CredentialStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    if !is_valid_phone(&body.phone) || !is_valid_phone(&body.admin_phone) {
        return Err(flow::FlowError::InvalidPhone.into());
    }

    let target = credentials.get(&body.phone).await?;
    let admin = credentials.get(&body.admin_phone).await?;

    let outcome = flow::reset_password(
        target.as_ref(),
        admin.as_ref(),
        &config.admin_phone,
        &body.admin_phone,
        &body.admin_password,
        &body.new_password,
        &body.confirm_password,
        hash_password,
    )?;

    if let Effect::StoreHash { hash, .. } = outcome.effect
        && let Some(target) = target
    {
        persist_hash(credentials.get_ref(), target, hash).await?;
    }

    info!("Password reset by administrator");
    Ok(HttpResponse::Ok().json(StepResponse::with_message(
        outcome.next,
        "password reset, please log in",
    )))
}

/// Restores identity from a stored session token on page entry.
///
/// Always 200: the body names the step to show. A missing, unknown, or
/// orphaned token means `login`, and the client should drop its stored copy.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current step for this client", body = StepResponse),
        (status = 500, description = "Store unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn restore_session(
    req: HttpRequest,
    credentials: web::Data<dyn CredentialStore>,
    sessions: web::Data<dyn SessionStore>,
) -> Result<HttpResponse, ApiError> {
    let Some(token) = bearer_token(&req) else {
        return Ok(HttpResponse::Ok().json(StepResponse::step(AuthStep::Login)));
    };

    match session::restore(sessions.get_ref(), credentials.get_ref(), &token).await? {
        Some(credential) => Ok(HttpResponse::Ok().json(StepResponse {
            session_token: Some(token),
            name: Some(credential.name),
            ..StepResponse::step(AuthStep::Dashboard)
        })),
        None => Ok(HttpResponse::Ok().json(StepResponse::with_message(
            AuthStep::Login,
            "session expired, please log in again",
        ))),
    }
}

/// Logout: deletes the presented session. Idempotent, succeeds even when no
/// valid token is presented.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session deleted (or none existed)"),
        (status = 500, description = "Session store unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<dyn SessionStore>,
) -> Result<HttpResponse, ApiError> {
    if let Some(token) = bearer_token(&req) {
        session::destroy(sessions.get_ref(), &token).await?;
        info!("Session deleted");
    }
    Ok(HttpResponse::NoContent().finish())
}
