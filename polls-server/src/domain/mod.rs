pub mod comment;
pub mod error;
pub mod post;
pub mod ranking;
pub mod user;
