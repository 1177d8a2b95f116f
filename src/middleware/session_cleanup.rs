// src/middleware/session_cleanup.rs - expire session cookies the extractor refused
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpMessage};

use super::auth_extractor::StaleSession;
use crate::services::auth_services::{AuthService, SESSION_COOKIE};

/// Attaches a removal cookie when `AuthenticatedUser` flagged the session as
/// stale, unless the handler already set a fresh session cookie.
pub async fn clear_stale_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let mut res = next.call(req).await?;

    let stale = res.request().extensions().get::<StaleSession>().is_some();
    if !stale {
        return Ok(res);
    }

    let replaced = res
        .response()
        .cookies()
        .any(|c| c.name() == SESSION_COOKIE);
    if replaced {
        return Ok(res);
    }

    if let Some(auth) = res.request().app_data::<web::Data<AuthService>>().cloned() {
        res.response_mut().add_cookie(&auth.clear_session_cookie())?;
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::{test, App};
    use chrono::Utc;

    use super::*;
    use crate::handlers::configure;
    use crate::handlers::test_support::{app_data, location, session_cookie, sign_up};
    use crate::models::post::PostFilter;
    use crate::models::user::User;

    fn ghost() -> User {
        User {
            id: 77,
            username: "ghost".into(),
            email: String::new(),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn token_for_missing_user_is_anonymous_and_cleared() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new()
                .wrap(from_fn(clear_stale_session))
                .app_data(state.clone())
                .app_data(auth.clone())
                .configure(configure),
        )
        .await;
        let cookie = auth.session_cookie(auth.issue_session(&ghost()).unwrap());

        let req = test::TestRequest::post()
            .uri("/new")
            .cookie(cookie.clone())
            .set_form([("content", "hello")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        let removal = session_cookie(&resp).expect("removal cookie");
        assert_eq!(removal.value(), "");
        assert_eq!(state.store.count_posts(PostFilter::All).await.unwrap(), 0);

        let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(session_cookie(&resp).expect("removal cookie").value(), "");
    }

    #[actix_web::test]
    async fn tampered_token_is_cleared() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new()
                .wrap(from_fn(clear_stale_session))
                .app_data(state.clone())
                .app_data(auth.clone())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/following")
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(session_cookie(&resp).expect("removal cookie").value(), "");
    }

    #[actix_web::test]
    async fn live_session_is_left_alone() {
        let (state, auth) = app_data();
        let app = test::init_service(
            App::new()
                .wrap(from_fn(clear_stale_session))
                .app_data(state.clone())
                .app_data(auth.clone())
                .configure(configure),
        )
        .await;
        let alice = sign_up(&state, &auth, "alice").await;

        let req = test::TestRequest::post()
            .uri("/new")
            .cookie(alice)
            .set_form([("content", "hello")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        assert!(session_cookie(&resp).is_none());
        assert_eq!(state.store.count_posts(PostFilter::All).await.unwrap(), 1);
    }
}
