pub mod app;
mod deserializers;
pub mod error;
mod extractors;
mod routes;

pub use app::{app, run_server, AppState};
pub use error::ApiError;
