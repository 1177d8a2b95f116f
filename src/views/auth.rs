use super::{escape, layout, message};

pub fn login_page(error: Option<&str>, username: &str) -> String {
    let body = format!(
        r#"<h2>Login</h2>
{message}
<form action="/login" method="post">
<input autofocus type="text" name="username" placeholder="Username" value="{username}">
<input type="password" name="password" placeholder="Password">
<input type="submit" value="Login">
</form>
Don't have an account? <a href="/register">Register here.</a>"#,
        message = message(error),
        username = escape(username),
    );
    layout("Login", None, &body)
}

pub fn register_page(error: Option<&str>, username: &str, email: &str) -> String {
    let body = format!(
        r#"<h2>Register</h2>
{message}
<form action="/register" method="post">
<input autofocus type="text" name="username" placeholder="Username" value="{username}">
<input type="email" name="email" placeholder="Email Address" value="{email}">
<input type="password" name="password" placeholder="Password">
<input type="password" name="confirmation" placeholder="Confirm Password">
<input type="submit" value="Register">
</form>
Already have an account? <a href="/login">Log In here.</a>"#,
        message = message(error),
        username = escape(username),
        email = escape(email),
    );
    layout("Register", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_echo_escaped_input_and_message() {
        let html = register_page(Some("Passwords must match."), "al\"ice", "a@b.c");
        assert!(html.contains("Passwords must match."));
        assert!(html.contains(r#"value="al&quot;ice""#));

        let html = login_page(None, "");
        assert!(!html.contains("class=\"alert\""));
    }
}
