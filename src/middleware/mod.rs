pub mod auth_extractor;
pub mod session_cleanup;
