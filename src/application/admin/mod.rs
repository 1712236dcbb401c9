//! Application services for the administrative surface.

pub mod destinations;

pub use destinations::{
    AdminDestinationError, AdminDestinationService, CreateDestinationCommand,
    UpdateDestinationCommand,
};
