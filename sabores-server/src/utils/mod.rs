//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - API error type and response envelope
//! - [`logger`] - tracing setup
//! - [`validation`] - text length limits and checks

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};
