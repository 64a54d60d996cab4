//! Web API module.
//!
//! Multipart upload endpoints, delete endpoints and static serving of the
//! upload tree.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
