#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Like {
    pub user_id: i64,
    pub post_id: i64,
}

/// What a toggle did to the (user, post) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Unliked,
}

impl LikeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeAction::Liked => "liked",
            LikeAction::Unliked => "unliked",
        }
    }
}

/// Result of toggling a like, with the post's like count after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub action: LikeAction,
    pub like_count: i64,
}
