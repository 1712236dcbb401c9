//! Infrastructure adapters and runtime bootstrap.

pub mod countries;
pub mod db;
pub mod error;
pub mod http;
pub mod telemetry;
