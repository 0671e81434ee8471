//! HTTP API for the booking wizard, self-service lookup and staff
//! dashboard.
//!
//! `api_router()` returns a composable `Router` with all routes nested
//! under `/api/`; `start_api_server()` binds and serves it.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerInfo};
pub use types::ApiContext;
