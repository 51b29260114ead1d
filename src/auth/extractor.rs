use actix_web::{
    FromRequest, HttpRequest,
    dev::Payload,
    error::{ErrorInternalServerError, ErrorUnauthorized},
    web::Data,
};
use futures::future::LocalBoxFuture;

use crate::auth::session;
use crate::error::ApiError;
use crate::store::{CredentialStore, SessionStore};

/// The authenticated employee behind a request, resolved from the bearer
/// session token through the session and credential stores.
pub struct AuthUser {
    pub phone: String,
    pub name: String,
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let token = bearer_token(&req).ok_or_else(|| ErrorUnauthorized("Missing token"))?;

            let sessions = req
                .app_data::<Data<dyn SessionStore>>()
                .ok_or_else(|| ErrorInternalServerError("Session store missing"))?;
            let credentials = req
                .app_data::<Data<dyn CredentialStore>>()
                .ok_or_else(|| ErrorInternalServerError("Credential store missing"))?;

            let credential = session::restore(sessions.get_ref(), credentials.get_ref(), &token)
                .await
                .map_err(|e| actix_web::Error::from(ApiError::Store(e)))?
                .ok_or_else(|| ErrorUnauthorized("Invalid or expired session"))?;

            Ok(AuthUser {
                phone: credential.phone,
                name: credential.name,
            })
        })
    }
}
