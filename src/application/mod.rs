//! Application services: read paths, admin writes, auth and seeding.

pub mod admin;
pub mod auth;
pub mod blog;
pub mod destinations;
pub mod error;
pub mod jobs;
pub mod pagination;
pub mod projection;
pub mod repos;
pub mod seeding;
