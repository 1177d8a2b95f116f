//! Persistence for users, posts, follows and likes.
//!
//! Handlers and services only see the [`Store`] trait. `PostgresStore` is the
//! production backend; `MemoryStore` backs the tests and `STORE_BACKEND=memory`.

pub mod memory_repository;
pub mod postgres_repository;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::models::like::LikeToggle;
use crate::models::post::{Post, PostFilter, PostView};
use crate::models::user::{NewUser, User, UserSummary};

pub use memory_repository::MemoryStore;
pub use postgres_repository::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("row not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait Store: Send + Sync {
    /// Inserts a user. Fails with `UniqueViolation` when the username is taken.
    fn create_user(&self, new_user: NewUser) -> BoxFuture<'_, StoreResult<User>>;

    fn find_user_by_id(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Option<User>>>;

    fn find_user_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>>;

    fn create_post(&self, user_id: i64, content: String) -> BoxFuture<'_, StoreResult<Post>>;

    fn find_post(&self, post_id: i64) -> BoxFuture<'_, StoreResult<Option<Post>>>;

    /// Overwrites the content of a post, returning the updated row if it exists.
    fn update_post_content(
        &self,
        post_id: i64,
        content: String,
    ) -> BoxFuture<'_, StoreResult<Option<Post>>>;

    fn count_posts(&self, filter: PostFilter) -> BoxFuture<'_, StoreResult<i64>>;

    /// Newest-first page of posts. `viewer` decides the `liked` flag.
    fn list_posts(
        &self,
        filter: PostFilter,
        viewer: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> BoxFuture<'_, StoreResult<Vec<PostView>>>;

    /// Returns true if a new follow row was written.
    fn follow(&self, follower_id: i64, followed_id: i64) -> BoxFuture<'_, StoreResult<bool>>;

    /// Returns true if a follow row was removed.
    fn unfollow(&self, follower_id: i64, followed_id: i64) -> BoxFuture<'_, StoreResult<bool>>;

    fn is_following(&self, follower_id: i64, followed_id: i64)
        -> BoxFuture<'_, StoreResult<bool>>;

    /// Users following `user_id`.
    fn followers(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Vec<UserSummary>>>;

    /// Users that `user_id` follows.
    fn following(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Vec<UserSummary>>>;

    /// Likes the post if `user_id` has not liked it yet, unlikes it otherwise.
    /// Fails with `NotFound` when the post does not exist.
    fn toggle_like(&self, user_id: i64, post_id: i64) -> BoxFuture<'_, StoreResult<LikeToggle>>;
}
