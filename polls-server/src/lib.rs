//! Blog with categories, comments and trending-category ranking, served as a
//! JSON API.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
