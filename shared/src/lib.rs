pub mod auth;
pub mod state;

pub use state::AppState;
