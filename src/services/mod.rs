pub mod auth_services;
pub mod like_services;
pub mod post_services;
pub mod social_services;
