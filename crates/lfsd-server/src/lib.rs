//! Admin HTTP surface for lfsd.
//!
//! Serves the `/mgmt` pages: configuration, object listing, user
//! management and an on-demand metadata refresh. Every route sits behind
//! HTTP Basic auth against the configured admin identity, and the whole
//! surface answers 404 when no admin identity is configured.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod render;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AdminAuth, AuthProvider, Credentials, Identity};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::LfsdServer;
pub use state::AppState;
