//! Travel content backend: destinations, geography, blog posts and
//! authentication served over a cache-aside read path.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
