// src/middleware/auth_extractor.rs - session cookie -> current user
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{dev::Payload, web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::services::auth_services::{AuthService, SESSION_COOKIE};
use crate::AppState;

/// The logged-in user of the current request.
///
/// Use `Option<AuthenticatedUser>` in handlers that also serve anonymous visitors.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

/// Request extension set when the session cookie can no longer be honoured
/// (bad signature, expired or the user is gone). See `session_cleanup`.
#[derive(Debug, Clone, Copy)]
pub struct StaleSession;

fn reject_stale(req: &HttpRequest, reason: &'static str) -> Error {
    req.extensions_mut().insert(StaleSession);
    ErrorUnauthorized(reason)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let (Some(auth), Some(state)) = (
                req.app_data::<web::Data<AuthService>>().cloned(),
                req.app_data::<web::Data<AppState>>().cloned(),
            ) else {
                log::error!("AuthService or AppState is not registered as app data");
                return Err(ErrorInternalServerError("auth not configured"));
            };

            let Some(cookie) = req.cookie(SESSION_COOKIE) else {
                return Err(ErrorUnauthorized("Missing session"));
            };

            let claims = match auth.verify_session(cookie.value()) {
                Ok(claims) => claims,
                Err(e) => {
                    log::debug!("rejected session cookie: {}", e);
                    return Err(reject_stale(&req, "Invalid session"));
                }
            };
            let Ok(user_id) = claims.sub.parse::<i64>() else {
                return Err(reject_stale(&req, "Invalid session"));
            };

            // the token only proves who the user was when it was signed
            match state.store.find_user_by_id(user_id).await {
                Ok(Some(user)) => Ok(AuthenticatedUser {
                    user_id: user.id,
                    username: user.username,
                }),
                Ok(None) => {
                    log::info!("session for unknown user {} dropped", user_id);
                    Err(reject_stale(&req, "Unknown user"))
                }
                Err(e) => {
                    log::error!("failed to load session user {}: {}", user_id, e);
                    Err(ErrorInternalServerError("session lookup failed"))
                }
            }
        })
    }
}
