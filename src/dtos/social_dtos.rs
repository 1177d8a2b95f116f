use serde::Deserialize;

use crate::models::post::PostView;
use crate::models::user::UserSummary;
use crate::pagination::Page;

/// Form body of `POST /follow` and `POST /unfollow`.
#[derive(Debug, Deserialize)]
pub struct FollowForm {
    pub userfollow: String,
}

/// Everything the profile page shows.
#[derive(Debug)]
pub struct ProfileOut {
    pub profile_user: UserSummary,
    pub posts: Page<PostView>,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
    pub is_following: bool,
}
