pub mod boards;
pub mod error;
pub mod tasks;
pub mod users;

pub use error::ServiceError;
