//! HTTP API: country, policy, diagnostics and the stubbed webhook routes.

pub mod handlers;
pub mod params;
pub mod routes;

pub use handlers::{AppState, Diagnose};
pub use routes::create_router;
