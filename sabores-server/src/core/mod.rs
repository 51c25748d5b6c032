//! Core module - server configuration, state and errors
//!
//! - [`Config`] - runtime configuration
//! - [`ServerState`] - shared service references
//! - [`Server`] - HTTP server
//! - [`ServerError`] - fatal lifecycle errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
