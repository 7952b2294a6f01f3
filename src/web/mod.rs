//! HTTP API module for staffmail.
//!
//! Authenticated JSON endpoints over the mail store, plus a health check
//! and the OpenAPI document.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
