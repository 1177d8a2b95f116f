//! Server-rendered HTML pages.
//!
//! Every function returns a complete document or fragment as a `String`.
//! User-supplied text must go through [`escape`] before it is interpolated.

pub mod auth;
pub mod posts;
pub mod profile;

use std::fmt::Write;

use crate::middleware::auth_extractor::AuthenticatedUser;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

const SCRIPT: &str = r#"
document.addEventListener('click', async (event) => {
  const like = event.target.closest('[data-like]');
  if (like) {
    const res = await fetch(`/posts/${like.dataset.like}/like`, { method: 'POST' });
    const body = await res.json();
    if (body.success) {
      like.querySelector('.like-count').textContent = body.like_count;
      like.classList.toggle('liked', body.action === 'liked');
    }
    return;
  }
  const edit = event.target.closest('[data-edit]');
  if (edit) {
    const post = document.getElementById(`post-${edit.dataset.edit}`);
    const content = post.querySelector('.content');
    const updated = prompt('Edit post', content.textContent);
    if (updated === null) return;
    const res = await fetch(`/posts/${edit.dataset.edit}/edit`, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ content: updated }),
    });
    const body = await res.json();
    if (res.ok) content.textContent = body.data;
    else alert(body.message);
  }
});
"#;

fn nav(user: Option<&AuthenticatedUser>) -> String {
    let mut html = String::from(r#"<nav><a class="brand" href="/">Network</a><ul>"#);
    match user {
        Some(user) => {
            let _ = write!(
                html,
                r#"<li><a href="/users/{}"><strong>{}</strong></a></li>
<li><a href="/">All Posts</a></li>
<li><a href="/following">Following</a></li>
<li><a href="/new">New Post</a></li>
<li><a href="/logout">Log Out</a></li>"#,
                user.user_id,
                escape(&user.username)
            );
        }
        None => {
            html.push_str(
                r#"<li><a href="/">All Posts</a></li>
<li><a href="/login">Log In</a></li>
<li><a href="/register">Register</a></li>"#,
            );
        }
    }
    html.push_str("</ul></nav>");
    html
}

/// Wraps a page body in the shared document shell.
pub fn layout(title: &str, user: Option<&AuthenticatedUser>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Network</title>
</head>
<body>
{nav}
<main>
{body}
</main>
<script>{script}</script>
</body>
</html>"#,
        title = escape(title),
        nav = nav(user),
        body = body,
        script = SCRIPT,
    )
}

/// Error banner shown above forms.
pub fn message(message: Option<&str>) -> String {
    match message {
        Some(m) => format!(r#"<div class="alert">{}</div>"#, escape(m)),
        None => String::new(),
    }
}

/// Page shown for a missing user or post.
pub fn not_found_page(user: Option<&AuthenticatedUser>, detail: &str) -> String {
    let body = format!(
        r#"<h2>Not Found</h2>
<p>{}</p>
<a href="/">Back to all posts</a>"#,
        escape(detail)
    );
    layout("Not Found", user, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn nav_depends_on_session() {
        let user = AuthenticatedUser {
            user_id: 3,
            username: "alice".into(),
        };
        let html = layout("Home", Some(&user), "");
        assert!(html.contains(r#"href="/users/3""#));
        assert!(html.contains("Log Out"));

        let anon = layout("Home", None, "");
        assert!(anon.contains("Register"));
        assert!(!anon.contains("Log Out"));
    }
}
