pub mod auth_dtos;
pub mod post_dtos;
pub mod social_dtos;
// short alias, `crate::dtos::auth::LoginIn`
pub use auth_dtos as auth;
