use std::fmt::Write;

use super::posts::post_list;
use super::{escape, layout};
use crate::dtos::social_dtos::ProfileOut;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::user::UserSummary;

fn user_list(title: &str, users: &[UserSummary]) -> String {
    let mut html = format!(
        r#"<section class="user-list"><h4>{} ({})</h4><ul>"#,
        title,
        users.len()
    );
    for user in users {
        let _ = write!(
            html,
            r#"<li><a href="/users/{}">{}</a></li>"#,
            user.id,
            escape(&user.username)
        );
    }
    html.push_str("</ul></section>");
    html
}

/// Follow / unfollow button. Hidden on your own profile and for visitors.
fn follow_form(profile: &ProfileOut, viewer: Option<&AuthenticatedUser>) -> String {
    let Some(viewer) = viewer else {
        return String::new();
    };
    if viewer.user_id == profile.profile_user.id {
        return String::new();
    }

    let (action, label) = if profile.is_following {
        ("/unfollow", "Unfollow")
    } else {
        ("/follow", "Follow")
    };

    format!(
        r#"<form action="{action}" method="post">
<input type="hidden" name="userfollow" value="{username}">
<input type="submit" value="{label}">
</form>"#,
        username = escape(&profile.profile_user.username),
    )
}

pub fn profile_page(profile: &ProfileOut, viewer: Option<&AuthenticatedUser>) -> String {
    let base_path = format!("/users/{}", profile.profile_user.id);
    let body = format!(
        r#"<h2>{username}</h2>
{follow}
<div class="graph">
{followers}
{following}
</div>
{posts}"#,
        username = escape(&profile.profile_user.username),
        follow = follow_form(profile, viewer),
        followers = user_list("Followers", &profile.followers),
        following = user_list("Following", &profile.following),
        posts = post_list(&profile.posts, viewer, &base_path),
    );
    layout(&profile.profile_user.username, viewer, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{window, Page};

    fn profile(is_following: bool) -> ProfileOut {
        ProfileOut {
            profile_user: UserSummary { id: 2, username: "bob".into() },
            posts: Page::new(Vec::new(), window(None, 0), 0),
            followers: vec![UserSummary { id: 1, username: "alice".into() }],
            following: Vec::new(),
            is_following,
        }
    }

    #[test]
    fn shows_the_matching_follow_button() {
        let alice = AuthenticatedUser { user_id: 1, username: "alice".into() };

        let html = profile_page(&profile(false), Some(&alice));
        assert!(html.contains(r#"action="/follow""#));

        let html = profile_page(&profile(true), Some(&alice));
        assert!(html.contains(r#"action="/unfollow""#));
        assert!(html.contains("Followers (1)"));
    }

    #[test]
    fn no_follow_button_for_visitors_or_self() {
        let bob = AuthenticatedUser { user_id: 2, username: "bob".into() };
        assert!(!profile_page(&profile(false), Some(&bob)).contains("userfollow"));
        assert!(!profile_page(&profile(false), None).contains("userfollow"));
    }
}
