//! Application services: payload validation and top-level error types.

pub mod error;
pub mod validate;
