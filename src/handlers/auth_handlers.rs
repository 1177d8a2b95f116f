use actix_web::{get, post, route, web, HttpResponse};

use super::{html, see_other, see_other_with_cookie};
use crate::dtos::auth::{LoginIn, RegisterIn};
use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::user::User;
use crate::services::auth_services::AuthService;
use crate::views::auth::{login_page, register_page};
use crate::AppState;

/// Redirect to the timeline carrying a fresh session cookie for `user`.
fn start_session(svc: &AuthService, user: &User) -> Result<HttpResponse, AppError> {
    let token = svc.issue_session(user)?;
    Ok(see_other_with_cookie("/", svc.session_cookie(token)))
}

/// GET /login
#[get("/login")]
pub async fn login_form(user: Option<AuthenticatedUser>) -> HttpResponse {
    if user.is_some() {
        return see_other("/");
    }
    html(login_page(None, ""))
}

/// POST /login
#[post("/login")]
pub async fn login(
    app_state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    form: web::Form<LoginIn>,
) -> Result<HttpResponse, AppError> {
    let input = form.into_inner();
    let username = input.username.clone();

    match svc.login(app_state.store.as_ref(), input).await {
        Ok(user) => start_session(&svc, &user),
        Err(AppError::Auth(message)) => Ok(html(login_page(Some(&message), &username))),
        Err(e) => Err(e),
    }
}

/// GET|POST /logout
#[route("/logout", method = "GET", method = "POST")]
pub async fn logout(svc: web::Data<AuthService>) -> HttpResponse {
    see_other_with_cookie("/", svc.clear_session_cookie())
}

/// GET /register
#[get("/register")]
pub async fn register_form(user: Option<AuthenticatedUser>) -> HttpResponse {
    if user.is_some() {
        return see_other("/");
    }
    html(register_page(None, "", ""))
}

/// POST /register
/// Creates the account and logs the new user in.
#[post("/register")]
pub async fn register(
    app_state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    form: web::Form<RegisterIn>,
) -> Result<HttpResponse, AppError> {
    let input = form.into_inner();
    let (username, email) = (input.username.clone(), input.email.clone());

    match svc.register(app_state.store.as_ref(), input).await {
        Ok(user) => start_session(&svc, &user),
        Err(AppError::Validation(message)) | Err(AppError::Conflict(message)) => {
            Ok(html(register_page(Some(&message), &username, &email)))
        }
        Err(e) => Err(e),
    }
}
