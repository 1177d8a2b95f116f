use chrono::{DateTime, Utc};

pub const MAX_POST_LENGTH: usize = 140;

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post as shown in listings: joined with its author and like data.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    /// Whether the viewing user has liked this post. Always false for anonymous viewers.
    pub liked: bool,
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    ByAuthor(i64),
    /// Posts by anyone the given user follows.
    FollowedBy(i64),
}

/// Checks post content and returns it trimmed of surrounding whitespace.
pub fn validate_content(content: &str) -> Result<String, String> {
    let content = content.trim();

    if content.is_empty() {
        return Err("Post cannot be empty.".to_string());
    }

    if content.chars().count() > MAX_POST_LENGTH {
        return Err(format!(
            "Post must be at most {} characters.",
            MAX_POST_LENGTH
        ));
    }

    Ok(content.to_string())
}
