// src/repositories/postgres_repository.rs - Store backed by deadpool-postgres

use deadpool_postgres::Pool;
use futures::future::BoxFuture;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use super::{Store, StoreError, StoreResult};
use crate::models::like::{LikeAction, LikeToggle};
use crate::models::post::{Post, PostFilter, PostView};
use crate::models::user::{NewUser, User, UserSummary};

const SCHEMA: &str = include_str!("schema.sql");

const POST_VIEW_SELECT: &str = "
    SELECT p.id, p.user_id, u.username, p.content, p.created_at,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
           EXISTS (SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1) AS liked
    FROM posts p
    JOIN users u ON u.id = p.user_id";

#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates the tables if they do not exist yet.
    pub async fn migrate(&self) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        log::info!("database schema is up to date");
        Ok(())
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        date_joined: row.get("date_joined"),
    }
}

fn post_from_row(row: &Row) -> Post {
    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

fn post_view_from_row(row: &Row) -> PostView {
    PostView {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        like_count: row.get("like_count"),
        liked: row.get("liked"),
    }
}

fn summary_from_row(row: &Row) -> UserSummary {
    UserSummary {
        id: row.get("id"),
        username: row.get("username"),
    }
}

/// WHERE clause for a filter, with its argument bound at `$idx`.
fn filter_clause(filter: &PostFilter, idx: usize) -> String {
    match filter {
        PostFilter::All => String::new(),
        PostFilter::ByAuthor(_) => format!(" WHERE p.user_id = ${}", idx),
        PostFilter::FollowedBy(_) => format!(
            " WHERE p.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ${})",
            idx
        ),
    }
}

fn filter_arg(filter: &PostFilter) -> Option<i64> {
    match filter {
        PostFilter::All => None,
        PostFilter::ByAuthor(id) | PostFilter::FollowedBy(id) => Some(*id),
    }
}

impl Store for PostgresStore {
    fn create_user(&self, new_user: NewUser) -> BoxFuture<'_, StoreResult<User>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let result = client
                .query_one(
                    "INSERT INTO users (username, email, password_hash)
                     VALUES ($1, $2, $3)
                     RETURNING id, username, email, password_hash, date_joined",
                    &[&new_user.username, &new_user.email, &new_user.password_hash],
                )
                .await;

            match result {
                Ok(row) => Ok(user_from_row(&row)),
                Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                    Err(StoreError::UniqueViolation(format!("username {}", new_user.username)))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn find_user_by_id(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Option<User>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let row = client
                .query_opt(
                    "SELECT id, username, email, password_hash, date_joined FROM users WHERE id = $1",
                    &[&user_id],
                )
                .await?;
            Ok(row.as_ref().map(user_from_row))
        })
    }

    fn find_user_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let row = client
                .query_opt(
                    "SELECT id, username, email, password_hash, date_joined FROM users WHERE username = $1",
                    &[&username],
                )
                .await?;
            Ok(row.as_ref().map(user_from_row))
        })
    }

    fn create_post(&self, user_id: i64, content: String) -> BoxFuture<'_, StoreResult<Post>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let row = client
                .query_one(
                    "INSERT INTO posts (user_id, content) VALUES ($1, $2)
                     RETURNING id, user_id, content, created_at",
                    &[&user_id, &content],
                )
                .await?;
            Ok(post_from_row(&row))
        })
    }

    fn find_post(&self, post_id: i64) -> BoxFuture<'_, StoreResult<Option<Post>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let row = client
                .query_opt(
                    "SELECT id, user_id, content, created_at FROM posts WHERE id = $1",
                    &[&post_id],
                )
                .await?;
            Ok(row.as_ref().map(post_from_row))
        })
    }

    fn update_post_content(
        &self,
        post_id: i64,
        content: String,
    ) -> BoxFuture<'_, StoreResult<Option<Post>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let row = client
                .query_opt(
                    "UPDATE posts SET content = $2 WHERE id = $1
                     RETURNING id, user_id, content, created_at",
                    &[&post_id, &content],
                )
                .await?;
            Ok(row.as_ref().map(post_from_row))
        })
    }

    fn count_posts(&self, filter: PostFilter) -> BoxFuture<'_, StoreResult<i64>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let sql = format!("SELECT COUNT(*) FROM posts p{}", filter_clause(&filter, 1));
            let arg = filter_arg(&filter);
            let row = match arg.as_ref() {
                Some(id) => client.query_one(sql.as_str(), &[id]).await?,
                None => client.query_one(sql.as_str(), &[]).await?,
            };
            Ok(row.get(0))
        })
    }

    fn list_posts(
        &self,
        filter: PostFilter,
        viewer: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> BoxFuture<'_, StoreResult<Vec<PostView>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let arg = filter_arg(&filter);

            let mut params: Vec<&(dyn ToSql + Sync)> = vec![&viewer, &limit, &offset];
            if let Some(id) = arg.as_ref() {
                params.push(id);
            }

            let sql = format!(
                "{}{} ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3",
                POST_VIEW_SELECT,
                filter_clause(&filter, 4)
            );

            let rows = client.query(sql.as_str(), &params).await?;
            Ok(rows.iter().map(post_view_from_row).collect())
        })
    }

    fn follow(&self, follower_id: i64, followed_id: i64) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let inserted = client
                .execute(
                    "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)
                     ON CONFLICT (follower_id, followed_id) DO NOTHING",
                    &[&follower_id, &followed_id],
                )
                .await?;
            Ok(inserted > 0)
        })
    }

    fn unfollow(&self, follower_id: i64, followed_id: i64) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let deleted = client
                .execute(
                    "DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2",
                    &[&follower_id, &followed_id],
                )
                .await?;
            Ok(deleted > 0)
        })
    }

    fn is_following(
        &self,
        follower_id: i64,
        followed_id: i64,
    ) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let row = client
                .query_one(
                    "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
                    &[&follower_id, &followed_id],
                )
                .await?;
            Ok(row.get(0))
        })
    }

    fn followers(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Vec<UserSummary>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let rows = client
                .query(
                    "SELECT u.id, u.username FROM follows f
                     JOIN users u ON u.id = f.follower_id
                     WHERE f.followed_id = $1
                     ORDER BY u.username",
                    &[&user_id],
                )
                .await?;
            Ok(rows.iter().map(summary_from_row).collect())
        })
    }

    fn following(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Vec<UserSummary>>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let rows = client
                .query(
                    "SELECT u.id, u.username FROM follows f
                     JOIN users u ON u.id = f.followed_id
                     WHERE f.follower_id = $1
                     ORDER BY u.username",
                    &[&user_id],
                )
                .await?;
            Ok(rows.iter().map(summary_from_row).collect())
        })
    }

    fn toggle_like(&self, user_id: i64, post_id: i64) -> BoxFuture<'_, StoreResult<LikeToggle>> {
        Box::pin(async move {
            let mut client = self.pool.get().await?;
            let tx = client.transaction().await?;

            // lock the post row so concurrent toggles on it serialize
            let post = tx
                .query_opt("SELECT id FROM posts WHERE id = $1 FOR UPDATE", &[&post_id])
                .await?;
            if post.is_none() {
                return Err(StoreError::NotFound(format!("post {}", post_id)));
            }

            let removed = tx
                .execute(
                    "DELETE FROM likes WHERE user_id = $1 AND post_id = $2",
                    &[&user_id, &post_id],
                )
                .await?;

            let action = if removed > 0 {
                LikeAction::Unliked
            } else {
                tx.execute(
                    "INSERT INTO likes (user_id, post_id) VALUES ($1, $2)
                     ON CONFLICT (user_id, post_id) DO NOTHING",
                    &[&user_id, &post_id],
                )
                .await?;
                LikeAction::Liked
            };

            let row = tx
                .query_one("SELECT COUNT(*) FROM likes WHERE post_id = $1", &[&post_id])
                .await?;
            let like_count: i64 = row.get(0);

            tx.commit().await?;

            Ok(LikeToggle { action, like_count })
        })
    }
}
