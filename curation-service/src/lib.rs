pub mod clients;
pub mod config;
pub mod models;
pub mod service;
pub mod state;

pub use config::ServiceConfig;
pub use service::{build_router, create_app};
pub use state::{AppState, SessionHandle};
