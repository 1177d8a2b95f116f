// src/services/social_services.rs - follow graph, profiles and the following feed
use crate::dtos::social_dtos::ProfileOut;
use crate::error::{AppError, AppResult};
use crate::models::post::{PostFilter, PostView};
use crate::models::user::{User, UserSummary};
use crate::pagination::Page;
use crate::repositories::Store;
use crate::services::post_services::PostService;

pub struct SocialService;

impl SocialService {
    async fn user_by_username(store: &dyn Store, username: &str) -> AppResult<User> {
        store
            .find_user_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user named {}", username.trim())))
    }

    /// Makes `follower_id` follow the user named `target_username` and returns
    /// that user. Following twice, or following yourself, changes nothing.
    pub async fn follow(
        store: &dyn Store,
        follower_id: i64,
        target_username: &str,
    ) -> AppResult<User> {
        let target = Self::user_by_username(store, target_username).await?;

        if target.id == follower_id {
            log::debug!("user {} tried to follow themselves", follower_id);
            return Ok(target);
        }

        if store.follow(follower_id, target.id).await? {
            log::info!("user {} now follows {}", follower_id, target.id);
        }
        Ok(target)
    }

    pub async fn unfollow(
        store: &dyn Store,
        follower_id: i64,
        target_username: &str,
    ) -> AppResult<User> {
        let target = Self::user_by_username(store, target_username).await?;

        if store.unfollow(follower_id, target.id).await? {
            log::info!("user {} unfollowed {}", follower_id, target.id);
        }
        Ok(target)
    }

    pub async fn profile(
        store: &dyn Store,
        viewer: Option<i64>,
        user_id: i64,
        raw_page: Option<&str>,
    ) -> AppResult<ProfileOut> {
        let profile_user = store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let posts =
            PostService::page(store, PostFilter::ByAuthor(user_id), viewer, raw_page).await?;
        let followers = store.followers(user_id).await?;
        let following = store.following(user_id).await?;

        let is_following = match viewer {
            Some(viewer_id) => store.is_following(viewer_id, user_id).await?,
            None => false,
        };

        Ok(ProfileOut {
            profile_user: UserSummary::from(&profile_user),
            posts,
            followers,
            following,
            is_following,
        })
    }

    /// Posts by everyone `user_id` follows.
    pub async fn following_feed(
        store: &dyn Store,
        user_id: i64,
        raw_page: Option<&str>,
    ) -> AppResult<Page<PostView>> {
        PostService::page(store, PostFilter::FollowedBy(user_id), Some(user_id), raw_page).await
    }
}
