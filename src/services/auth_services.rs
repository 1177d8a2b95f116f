// src/services/auth_services.rs - accounts, passwords and session tokens
use actix_web::cookie::{time, Cookie, SameSite};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dtos::auth::{LoginIn, RegisterIn};
use crate::error::{AppError, AppResult};
use crate::models::user::{NewUser, User};
use crate::repositories::{Store, StoreError};

pub const SESSION_COOKIE: &str = "network_session";

pub const INVALID_CREDENTIALS: &str = "Invalid username and/or password.";

// column widths of `users.username` and `users.email`
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;

fn looks_like_email(s: &str) -> bool {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

/// Claims carried by the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// user id
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
    cookie_secure: bool,
    hasher: Argon2<'static>,
}

impl AuthService {
    pub fn new(secret: &str, session_ttl_hours: i64, cookie_secure: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl: Duration::hours(session_ttl_hours),
            cookie_secure,
            hasher: Argon2::default(),
        }
    }

    /// Same service with the cheapest argon2 parameters, so tests stay fast.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let params = argon2::Params::new(8, 1, 1, None).expect("valid argon2 params");
        Self {
            hasher: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
            ..Self::new("test-secret-test-secret", 1, false)
        }
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Password(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .hasher
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Creates an account. The caller starts the session.
    pub async fn register(&self, store: &dyn Store, input: RegisterIn) -> AppResult<User> {
        let username = input.username.trim();

        if username.is_empty() {
            return Err(AppError::Validation("Username is required.".into()));
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Username must be at most {} characters.",
                MAX_USERNAME_LENGTH
            )));
        }
        if input.password.is_empty() {
            return Err(AppError::Validation("Password is required.".into()));
        }
        if input.password != input.confirmation {
            return Err(AppError::Validation("Passwords must match.".into()));
        }
        // email is optional, but must be well formed when given
        let email = input.email.trim();
        if email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(AppError::Validation(format!(
                "Email must be at most {} characters.",
                MAX_EMAIL_LENGTH
            )));
        }
        if !email.is_empty() && !looks_like_email(email) {
            return Err(AppError::Validation("Enter a valid email address.".into()));
        }

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.hash_password(&input.password)?,
        };

        match store.create_user(new_user).await {
            Ok(user) => {
                log::info!("registered user {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(StoreError::UniqueViolation(_)) => {
                Err(AppError::Conflict("Username already taken.".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, store: &dyn Store, input: LoginIn) -> AppResult<User> {
        let user = store.find_user_by_username(input.username.trim()).await?;

        match user {
            Some(user) if self.verify_password(&input.password, &user.password_hash) => {
                log::info!("user {} logged in", user.id);
                Ok(user)
            }
            _ => {
                log::warn!("failed login for username {:?}", input.username);
                Err(AppError::Auth(INVALID_CREDENTIALS.into()))
            }
        }
    }

    pub fn issue_session(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.session_ttl.num_seconds()))
            .finish()
    }

    /// Cookie that overwrites and expires the session cookie.
    pub fn clear_session_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn register_in(username: &str, password: &str, confirmation: &str) -> RegisterIn {
        RegisterIn {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[actix_web::test]
    async fn mismatched_passwords_create_no_user() {
        let svc = AuthService::for_tests();
        let store = MemoryStore::new();

        let err = svc
            .register(&store, register_in("alice", "secret", "other"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "Passwords must match."));
        assert!(store.find_user_by_username("alice").await.unwrap().is_none());
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("alice@example.com"));
        assert!(!looks_like_email("alice@"));
        assert!(!looks_like_email("not an email"));
    }

    #[actix_web::test]
    async fn malformed_email_is_rejected_but_blank_is_fine() {
        let svc = AuthService::for_tests();
        let store = MemoryStore::new();

        let mut input = register_in("alice", "secret", "secret");
        input.email = "alice-at-example".into();
        let err = svc.register(&store, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut input = register_in("alice", "secret", "secret");
        input.email = String::new();
        assert!(svc.register(&store, input).await.is_ok());
    }

    #[actix_web::test]
    async fn overlong_username_or_email_is_a_validation_error() {
        let svc = AuthService::for_tests();
        let store = MemoryStore::new();

        let long_name = "a".repeat(MAX_USERNAME_LENGTH + 1);
        let err = svc
            .register(&store, register_in(&long_name, "secret", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Username")));

        let mut input = register_in("alice", "secret", "secret");
        input.email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH));
        let err = svc.register(&store, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Email")));

        let exact = "b".repeat(MAX_USERNAME_LENGTH);
        let mut input = register_in(&exact, "secret", "secret");
        input.email = String::new();
        assert!(svc.register(&store, input).await.is_ok());
    }

    #[actix_web::test]
    async fn duplicate_username_is_a_conflict() {
        let svc = AuthService::for_tests();
        let store = MemoryStore::new();

        let first = svc
            .register(&store, register_in("alice", "secret", "secret"))
            .await
            .unwrap();
        let err = svc
            .register(&store, register_in("alice", "other", "other"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let stored = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }

    #[actix_web::test]
    async fn login_checks_the_password() {
        let svc = AuthService::for_tests();
        let store = MemoryStore::new();
        svc.register(&store, register_in("alice", "secret", "secret"))
            .await
            .unwrap();

        let ok = svc
            .login(
                &store,
                LoginIn {
                    username: "alice".into(),
                    password: "secret".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(ok.username, "alice");

        for (username, password) in [("alice", "wrong"), ("nobody", "secret")] {
            let err = svc
                .login(
                    &store,
                    LoginIn {
                        username: username.into(),
                        password: password.into(),
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.public_message(), INVALID_CREDENTIALS);
        }
    }

    #[actix_web::test]
    async fn session_token_round_trip() {
        let svc = AuthService::for_tests();
        let store = MemoryStore::new();
        let user = svc
            .register(&store, register_in("alice", "secret", "secret"))
            .await
            .unwrap();

        let token = svc.issue_session(&user).unwrap();
        let claims = svc.verify_session(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "alice");

        let other = AuthService::new("a-completely-different-secret", 1, false);
        assert!(other.verify_session(&token).is_err());
        assert!(svc.verify_session("not.a.token").is_err());
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let svc = AuthService::for_tests();
        let cookie = svc.clear_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
