//! REST API module.
//!
//! Contains all API routes and handlers for the signal feed.

mod companies;
mod pipeline;
mod signals;

pub use companies::*;
pub use pipeline::*;
pub use signals::*;

use axum::Json;

use crate::errors::AppError;

/// Handlers return plain JSON on success or the error envelope on failure.
pub type ApiResult<T> = Result<Json<T>, AppError>;
