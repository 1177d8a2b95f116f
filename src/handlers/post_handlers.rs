// src/handlers/post_handlers.rs - timeline, new post, edit and like
use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse, ResponseError};

use super::{html, see_other};
use crate::dtos::post_dtos::{EditPostIn, EditPostOut, LikeOut, NewPostForm};
use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::pagination::PageQuery;
use crate::services::like_services::LikeService;
use crate::services::post_services::PostService;
use crate::views::posts::{index_page, new_post_page};
use crate::AppState;

const NOT_AUTHENTICATED: &str = "User not authenticated";

/// GET /
/// All posts, newest first.
#[get("/")]
pub async fn index(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let viewer = user.as_ref().map(|u| u.user_id);
    let page = PostService::list_posts(app_state.store.as_ref(), viewer, query.page.as_deref()).await?;
    Ok(html(index_page(&page, user.as_ref())))
}

/// GET /new
#[get("/new")]
pub async fn new_post_form(user: Option<AuthenticatedUser>) -> HttpResponse {
    match user {
        Some(user) => html(new_post_page(&user, None, "")),
        None => see_other("/login"),
    }
}

/// POST /new
#[post("/new")]
pub async fn create_post(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    form: web::Form<NewPostForm>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = user else {
        return Ok(see_other("/login"));
    };

    match PostService::create_post(app_state.store.as_ref(), user.user_id, &form.content).await {
        Ok(_) => Ok(see_other("/")),
        Err(AppError::Validation(message)) => Ok(HttpResponse::BadRequest()
            .content_type(mime::TEXT_HTML_UTF_8)
            .body(new_post_page(&user, Some(&message), &form.content))),
        Err(e) => Err(e),
    }
}

/// POST /posts/{id}/edit
/// JSON in, JSON out. Only the author may edit.
#[post("/posts/{id}/edit")]
pub async fn edit_post(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    path: web::Path<i64>,
    body: web::Json<EditPostIn>,
) -> HttpResponse {
    let Some(user) = user else {
        return HttpResponse::Unauthorized().json(EditPostOut {
            message: NOT_AUTHENTICATED.to_string(),
            data: None,
        });
    };
    let post_id = path.into_inner();

    match PostService::edit_post(app_state.store.as_ref(), user.user_id, post_id, &body.content).await {
        Ok(post) => HttpResponse::Ok().json(EditPostOut {
            message: "Post updated successfully!".to_string(),
            data: Some(post.content),
        }),
        Err(e) => {
            if e.status_code().is_server_error() {
                log::error!("failed to edit post {}: {}", post_id, e);
            }
            HttpResponse::build(e.status_code()).json(EditPostOut {
                message: e.public_message(),
                data: None,
            })
        }
    }
}

/// POST /posts/{id}/like
/// Likes or unlikes the post for the session user.
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    path: web::Path<i64>,
) -> HttpResponse {
    let Some(user) = user else {
        return HttpResponse::Unauthorized().json(LikeOut::failure(NOT_AUTHENTICATED));
    };
    let post_id = path.into_inner();

    match LikeService::toggle_like(app_state.store.as_ref(), user.user_id, post_id).await {
        Ok(toggle) => HttpResponse::Ok().json(LikeOut {
            success: true,
            like_count: Some(toggle.like_count),
            action: Some(toggle.action.as_str().to_string()),
            message: None,
        }),
        Err(e) => {
            let status = e.status_code();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                log::error!("failed to toggle like on post {}: {}", post_id, e);
            }
            HttpResponse::build(status).json(LikeOut::failure(&e.public_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::handlers::configure;
    use crate::handlers::test_support::{app_data, location, sign_up};
    use crate::models::post::PostFilter;

    #[actix_web::test]
    async fn new_post_requires_login() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/new")
            .set_form([("content", "hello")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        assert_eq!(state.store.count_posts(PostFilter::All).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn timeline_lists_new_posts_first() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;
        let alice = sign_up(&state, &auth, "alice").await;

        for content in ["hi", "bye"] {
            let req = test::TestRequest::post()
                .uri("/new")
                .cookie(alice.clone())
                .set_form([("content", content)])
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&resp), "/");
        }

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

        let bye = body.find("bye").expect("bye rendered");
        let hi = body.find(">hi<").expect("hi rendered");
        assert!(bye < hi);
    }

    #[actix_web::test]
    async fn overlong_post_rerenders_form() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;
        let alice = sign_up(&state, &auth, "alice").await;

        let long = "x".repeat(141);
        let req = test::TestRequest::post()
            .uri("/new")
            .cookie(alice)
            .set_form([("content", long.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.count_posts(PostFilter::All).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn like_toggles_and_reports_count() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;
        let _alice = sign_up(&state, &auth, "alice").await;
        let bob = sign_up(&state, &auth, "bob").await;
        let post = state.store.create_post(1, "bye".into()).await.unwrap();
        let uri = format!("/posts/{}/like", post.id);

        let req = test::TestRequest::post().uri(&uri).cookie(bob.clone()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"success": true, "like_count": 1, "action": "liked"}));

        let req = test::TestRequest::post().uri(&uri).cookie(bob).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"success": true, "like_count": 0, "action": "unliked"}));
    }

    #[actix_web::test]
    async fn like_without_session_fails() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/posts/1/like").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "message": "User not authenticated"}));
    }

    #[actix_web::test]
    async fn like_on_missing_post_is_404() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;
        let alice = sign_up(&state, &auth, "alice").await;

        let req = test::TestRequest::post().uri("/posts/99/like").cookie(alice).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
    }

    #[actix_web::test]
    async fn edit_returns_new_content_for_the_author_only() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new().app_data(state.clone()).app_data(auth.clone()).configure(configure),
        )
        .await;
        let alice = sign_up(&state, &auth, "alice").await;
        let bob = sign_up(&state, &auth, "bob").await;
        let post = state.store.create_post(1, "draft".into()).await.unwrap();
        let uri = format!("/posts/{}/edit", post.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .cookie(alice)
            .set_json(json!({"content": "final"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"message": "Post updated successfully!", "data": "final"}));

        let req = test::TestRequest::post()
            .uri(&uri)
            .cookie(bob)
            .set_json(json!({"content": "hijacked"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({"content": "anonymous"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let stored = state.store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "final");
    }
}
