//! Utilities: error types, logging

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, ok, ok_with_message};

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
