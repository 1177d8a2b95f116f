// src/repositories/memory_repository.rs - in-process Store for tests and local runs

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use futures::future::{self, BoxFuture, FutureExt};

use super::{Store, StoreError, StoreResult};
use crate::models::follow::Follow;
use crate::models::like::{Like, LikeAction, LikeToggle};
use crate::models::post::{Post, PostFilter, PostView};
use crate::models::user::{NewUser, User, UserSummary};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    follows: Vec<Follow>,
    likes: Vec<Like>,
    next_user_id: i64,
    next_post_id: i64,
}

impl Tables {
    fn user(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn matches(&self, post: &Post, filter: &PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::ByAuthor(author) => post.user_id == *author,
            PostFilter::FollowedBy(follower) => self
                .follows
                .iter()
                .any(|f| f.follower_id == *follower && f.followed_id == post.user_id),
        }
    }

    fn like_count(&self, post_id: i64) -> i64 {
        self.likes.iter().filter(|l| l.post_id == post_id).count() as i64
    }

    fn summaries<F>(&self, select: F) -> Vec<UserSummary>
    where
        F: Fn(&Follow) -> Option<i64>,
    {
        let mut out: Vec<UserSummary> = self
            .follows
            .iter()
            .filter_map(&select)
            .filter_map(|id| self.user(id).map(UserSummary::from))
            .collect();
        out.sort_by(|a, b| a.username.cmp(&b.username));
        out
    }
}

/// Store that keeps every table in a `Vec` behind a mutex.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ready<T: Send + 'static>(value: StoreResult<T>) -> BoxFuture<'static, StoreResult<T>> {
        future::ready(value).boxed()
    }
}

impl Store for MemoryStore {
    fn create_user(&self, new_user: NewUser) -> BoxFuture<'_, StoreResult<User>> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.username == new_user.username) {
            return Self::ready(Err(StoreError::UniqueViolation(format!(
                "username {}",
                new_user.username
            ))));
        }

        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            date_joined: Utc::now(),
        };
        t.users.push(user.clone());
        Self::ready(Ok(user))
    }

    fn find_user_by_id(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Option<User>>> {
        let t = self.lock();
        Self::ready(Ok(t.user(user_id).cloned()))
    }

    fn find_user_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>> {
        let t = self.lock();
        let user = t.users.iter().find(|u| u.username == username).cloned();
        Self::ready(Ok(user))
    }

    fn create_post(&self, user_id: i64, content: String) -> BoxFuture<'_, StoreResult<Post>> {
        let mut t = self.lock();
        if t.user(user_id).is_none() {
            return Self::ready(Err(StoreError::NotFound(format!("user {}", user_id))));
        }

        t.next_post_id += 1;
        let post = Post {
            id: t.next_post_id,
            user_id,
            content,
            created_at: Utc::now(),
        };
        t.posts.push(post.clone());
        Self::ready(Ok(post))
    }

    fn find_post(&self, post_id: i64) -> BoxFuture<'_, StoreResult<Option<Post>>> {
        let t = self.lock();
        Self::ready(Ok(t.posts.iter().find(|p| p.id == post_id).cloned()))
    }

    fn update_post_content(
        &self,
        post_id: i64,
        content: String,
    ) -> BoxFuture<'_, StoreResult<Option<Post>>> {
        let mut t = self.lock();
        let updated = t.posts.iter_mut().find(|p| p.id == post_id).map(|p| {
            p.content = content;
            p.clone()
        });
        Self::ready(Ok(updated))
    }

    fn count_posts(&self, filter: PostFilter) -> BoxFuture<'_, StoreResult<i64>> {
        let t = self.lock();
        let count = t.posts.iter().filter(|p| t.matches(p, &filter)).count() as i64;
        Self::ready(Ok(count))
    }

    fn list_posts(
        &self,
        filter: PostFilter,
        viewer: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> BoxFuture<'_, StoreResult<Vec<PostView>>> {
        let t = self.lock();
        let mut posts: Vec<&Post> = t.posts.iter().filter(|p| t.matches(p, &filter)).collect();
        // ids grow with insertion, so they break ties between equal timestamps
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let views = posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|p| PostView {
                id: p.id,
                user_id: p.user_id,
                username: t.user(p.user_id).map(|u| u.username.clone()).unwrap_or_default(),
                content: p.content.clone(),
                created_at: p.created_at,
                like_count: t.like_count(p.id),
                liked: viewer
                    .map(|v| t.likes.iter().any(|l| l.user_id == v && l.post_id == p.id))
                    .unwrap_or(false),
            })
            .collect();
        Self::ready(Ok(views))
    }

    fn follow(&self, follower_id: i64, followed_id: i64) -> BoxFuture<'_, StoreResult<bool>> {
        let mut t = self.lock();
        let edge = Follow {
            follower_id,
            followed_id,
        };
        if t.follows.contains(&edge) {
            return Self::ready(Ok(false));
        }
        t.follows.push(edge);
        Self::ready(Ok(true))
    }

    fn unfollow(&self, follower_id: i64, followed_id: i64) -> BoxFuture<'_, StoreResult<bool>> {
        let mut t = self.lock();
        let before = t.follows.len();
        t.follows
            .retain(|f| !(f.follower_id == follower_id && f.followed_id == followed_id));
        Self::ready(Ok(t.follows.len() < before))
    }

    fn is_following(
        &self,
        follower_id: i64,
        followed_id: i64,
    ) -> BoxFuture<'_, StoreResult<bool>> {
        let t = self.lock();
        let edge = Follow {
            follower_id,
            followed_id,
        };
        Self::ready(Ok(t.follows.contains(&edge)))
    }

    fn followers(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Vec<UserSummary>>> {
        let t = self.lock();
        let out = t.summaries(|f| (f.followed_id == user_id).then_some(f.follower_id));
        Self::ready(Ok(out))
    }

    fn following(&self, user_id: i64) -> BoxFuture<'_, StoreResult<Vec<UserSummary>>> {
        let t = self.lock();
        let out = t.summaries(|f| (f.follower_id == user_id).then_some(f.followed_id));
        Self::ready(Ok(out))
    }

    fn toggle_like(&self, user_id: i64, post_id: i64) -> BoxFuture<'_, StoreResult<LikeToggle>> {
        let mut t = self.lock();
        if !t.posts.iter().any(|p| p.id == post_id) {
            return Self::ready(Err(StoreError::NotFound(format!("post {}", post_id))));
        }

        let like = Like { user_id, post_id };
        let action = if t.likes.contains(&like) {
            t.likes.retain(|l| *l != like);
            LikeAction::Unliked
        } else {
            t.likes.push(like);
            LikeAction::Liked
        };

        let like_count = t.like_count(post_id);
        Self::ready(Ok(LikeToggle { action, like_count }))
    }
}
