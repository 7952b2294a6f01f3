//! Data Transfer Objects for the HTTP API.

pub mod request;
pub mod validation;

pub use request::*;
pub use validation::ValidatedPath;
