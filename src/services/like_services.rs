// src/services/like_services.rs
use crate::error::{AppError, AppResult};
use crate::models::like::LikeToggle;
use crate::repositories::{Store, StoreError};

pub struct LikeService;

impl LikeService {
    /// Likes the post for `user_id`, or takes the like back if it already exists.
    pub async fn toggle_like(store: &dyn Store, user_id: i64, post_id: i64) -> AppResult<LikeToggle> {
        match store.toggle_like(user_id, post_id).await {
            Ok(toggle) => {
                log::debug!(
                    "user {} {} post {} (now {} likes)",
                    user_id,
                    toggle.action.as_str(),
                    post_id,
                    toggle.like_count
                );
                Ok(toggle)
            }
            Err(StoreError::NotFound(_)) => Err(AppError::NotFound("Post not found".into())),
            Err(e) => Err(e.into()),
        }
    }
}
