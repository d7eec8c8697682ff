pub mod model;
pub mod service;

pub use model::{BoardMember, LoginPayload, SignupPayload, User};
pub use service::*;
