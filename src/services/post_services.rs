// src/services/post_services.rs - timeline, posting and editing
use crate::error::{AppError, AppResult};
use crate::models::post::{validate_content, Post, PostFilter, PostView};
use crate::pagination::{self, Page};
use crate::repositories::Store;

pub struct PostService;

impl PostService {
    /// One page of posts matching `filter`, newest first.
    pub async fn page(
        store: &dyn Store,
        filter: PostFilter,
        viewer: Option<i64>,
        raw_page: Option<&str>,
    ) -> AppResult<Page<PostView>> {
        let total = store.count_posts(filter).await?;
        let window = pagination::window(raw_page, total);
        let items = store
            .list_posts(filter, viewer, window.limit, window.offset)
            .await?;
        Ok(Page::new(items, window, total))
    }

    /// The timeline: every post.
    pub async fn list_posts(
        store: &dyn Store,
        viewer: Option<i64>,
        raw_page: Option<&str>,
    ) -> AppResult<Page<PostView>> {
        Self::page(store, PostFilter::All, viewer, raw_page).await
    }

    pub async fn create_post(store: &dyn Store, user_id: i64, content: &str) -> AppResult<Post> {
        let content = validate_content(content).map_err(AppError::Validation)?;
        let post = store.create_post(user_id, content).await?;
        log::info!("user {} created post {}", user_id, post.id);
        Ok(post)
    }

    /// Replaces the content of a post owned by `user_id`.
    pub async fn edit_post(
        store: &dyn Store,
        user_id: i64,
        post_id: i64,
        content: &str,
    ) -> AppResult<Post> {
        let post = store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

        if post.user_id != user_id {
            log::warn!("user {} tried to edit post {} of user {}", user_id, post_id, post.user_id);
            return Err(AppError::Forbidden("You can only edit your own posts".into()));
        }

        let content = validate_content(content).map_err(AppError::Validation)?;
        store
            .update_post_content(post_id, content)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }
}
