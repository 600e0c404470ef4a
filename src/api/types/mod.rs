//! Shared API types: response envelope, errors and extractors

pub mod envelope;
pub mod error;
pub mod json;

pub use envelope::{ApiResponse, Pagination};
pub use error::ApiError;
pub use json::{Path, Query, ValidatedJson};
