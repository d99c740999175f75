pub mod auth;
pub mod comment;
pub mod index;
pub mod post;
