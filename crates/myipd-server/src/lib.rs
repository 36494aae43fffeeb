// ABOUTME: HTTP server for myipd: authenticates clients and reports the host's public addresses.
// ABOUTME: Uses Axum with shared state holding the reloadable stores and the address resolver.

pub mod api;
pub mod app_state;
pub mod client_addr;
pub mod config;
pub mod resolver;
pub mod routes;
pub mod testing;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ServerConfig};
pub use resolver::{AddressLookup, HttpLookup, LookupError, resolve};
pub use routes::create_router;
