mod commands;
mod service;
pub mod types;

pub use service::*;
pub use types::{AdminDestinationError, CreateDestinationCommand, UpdateDestinationCommand};
