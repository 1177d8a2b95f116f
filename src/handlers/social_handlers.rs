// src/handlers/social_handlers.rs - profiles, following feed, follow / unfollow
use actix_web::{get, post, web, HttpResponse};

use super::{html, page_error, see_other};
use crate::dtos::social_dtos::FollowForm;
use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::pagination::PageQuery;
use crate::services::social_services::SocialService;
use crate::views::posts::following_page;
use crate::views::profile::profile_page;
use crate::AppState;

/// GET /users/{id}
#[get("/users/{id}")]
pub async fn profile(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let viewer = user.as_ref().map(|u| u.user_id);

    match SocialService::profile(
        app_state.store.as_ref(),
        viewer,
        path.into_inner(),
        query.page.as_deref(),
    )
    .await
    {
        Ok(profile) => Ok(html(profile_page(&profile, user.as_ref()))),
        Err(e) => page_error(e, user.as_ref()),
    }
}

/// GET /following
/// Posts from the users the session user follows.
#[get("/following")]
pub async fn following(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = user else {
        return Ok(see_other("/login"));
    };

    let page =
        SocialService::following_feed(app_state.store.as_ref(), user.user_id, query.page.as_deref())
            .await?;
    Ok(html(following_page(&page, &user)))
}

/// POST /follow
#[post("/follow")]
pub async fn follow(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    form: web::Form<FollowForm>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = user else {
        return Ok(see_other("/login"));
    };

    match SocialService::follow(app_state.store.as_ref(), user.user_id, &form.userfollow).await {
        Ok(target) => Ok(see_other(&format!("/users/{}", target.id))),
        Err(e) => page_error(e, Some(&user)),
    }
}

/// POST /unfollow
#[post("/unfollow")]
pub async fn unfollow(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    form: web::Form<FollowForm>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = user else {
        return Ok(see_other("/login"));
    };

    match SocialService::unfollow(app_state.store.as_ref(), user.user_id, &form.userfollow).await {
        Ok(target) => Ok(see_other(&format!("/users/{}", target.id))),
        Err(e) => page_error(e, Some(&user)),
    }
}
