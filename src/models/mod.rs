pub mod user;
pub mod post;
pub mod follow;
pub mod like;
