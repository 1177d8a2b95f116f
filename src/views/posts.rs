use std::fmt::Write;

use super::{escape, layout, message};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::post::{PostView, MAX_POST_LENGTH};
use crate::pagination::Page;

fn post_card(post: &PostView, viewer: Option<&AuthenticatedUser>) -> String {
    let own = viewer.map(|u| u.user_id == post.user_id).unwrap_or(false);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<article class="post" id="post-{id}">
<h5><a href="/users/{user_id}">{username}</a></h5>
<p class="content">{content}</p>
<p class="date">{date}</p>"#,
        id = post.id,
        user_id = post.user_id,
        username = escape(&post.username),
        content = escape(&post.content),
        date = post.created_at.format("%b %-d %Y, %-I:%M %p"),
    );

    if viewer.is_some() {
        let _ = write!(
            html,
            r#"<button class="like{liked}" data-like="{id}">&#9829; <span class="like-count">{count}</span></button>"#,
            liked = if post.liked { " liked" } else { "" },
            id = post.id,
            count = post.like_count,
        );
    } else {
        let _ = write!(
            html,
            r#"<span class="like">&#9829; <span class="like-count">{}</span></span>"#,
            post.like_count
        );
    }

    if own {
        let _ = write!(html, r#" <button class="edit" data-edit="{}">Edit</button>"#, post.id);
    }

    html.push_str("</article>\n");
    html
}

/// Previous / next links for a paginated listing rooted at `base_path`.
pub fn pager<T>(page: &Page<T>, base_path: &str) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="pagination"><ul>"#);
    if let Some(prev) = page.previous_page_number() {
        let _ = write!(html, r#"<li><a href="{base_path}?page=1">&laquo; first</a></li>"#);
        let _ = write!(html, r#"<li><a href="{base_path}?page={prev}">previous</a></li>"#);
    }
    let _ = write!(
        html,
        r#"<li class="current">Page {} of {}</li>"#,
        page.number, page.num_pages
    );
    if let Some(next) = page.next_page_number() {
        let _ = write!(html, r#"<li><a href="{base_path}?page={next}">next</a></li>"#);
        let _ = write!(
            html,
            r#"<li><a href="{base_path}?page={}">last &raquo;</a></li>"#,
            page.num_pages
        );
    }
    html.push_str("</ul></nav>");
    html
}

/// Post list followed by its pager.
pub fn post_list(page: &Page<PostView>, viewer: Option<&AuthenticatedUser>, base_path: &str) -> String {
    let mut html = String::new();
    if page.items.is_empty() {
        html.push_str(r#"<p class="empty">No posts yet.</p>"#);
    }
    for post in &page.items {
        html.push_str(&post_card(post, viewer));
    }
    html.push_str(&pager(page, base_path));
    html
}

pub fn index_page(page: &Page<PostView>, viewer: Option<&AuthenticatedUser>) -> String {
    let body = format!("<h2>All Posts</h2>\n{}", post_list(page, viewer, "/"));
    layout("All Posts", viewer, &body)
}

pub fn following_page(page: &Page<PostView>, viewer: &AuthenticatedUser) -> String {
    let body = format!(
        "<h2>Following</h2>\n{}",
        post_list(page, Some(viewer), "/following")
    );
    layout("Following", Some(viewer), &body)
}

pub fn new_post_page(viewer: &AuthenticatedUser, error: Option<&str>, content: &str) -> String {
    let body = format!(
        r#"<h2>New Post</h2>
{message}
<form action="/new" method="post">
<textarea name="content" maxlength="{max}" required autofocus>{content}</textarea>
<input type="submit" value="Post">
</form>"#,
        message = message(error),
        max = MAX_POST_LENGTH,
        content = escape(content),
    );
    layout("New Post", Some(viewer), &body)
}
