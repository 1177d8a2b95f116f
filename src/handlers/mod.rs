pub mod auth_handlers;
pub mod post_handlers;
pub mod social_handlers;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::views;

/// Registers every route of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(post_handlers::index)
        .service(post_handlers::new_post_form)
        .service(post_handlers::create_post)
        .service(post_handlers::edit_post)
        .service(post_handlers::toggle_like)
        .service(social_handlers::profile)
        .service(social_handlers::following)
        .service(social_handlers::follow)
        .service(social_handlers::unfollow)
        .service(auth_handlers::login_form)
        .service(auth_handlers::login)
        .service(auth_handlers::logout)
        .service(auth_handlers::register_form)
        .service(auth_handlers::register);
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body)
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn see_other_with_cookie(location: &str, cookie: Cookie<'_>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

/// Renders `NotFound` as an HTML page; everything else goes through `ResponseError`.
pub(crate) fn page_error(err: AppError, user: Option<&AuthenticatedUser>) -> Result<HttpResponse, AppError> {
    match err {
        AppError::NotFound(detail) => Ok(HttpResponse::NotFound()
            .content_type(mime::TEXT_HTML_UTF_8)
            .body(views::not_found_page(user, &detail))),
        other => Err(other),
    }
}
